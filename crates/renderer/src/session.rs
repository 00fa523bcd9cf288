//! Session lifecycle and the per-refresh frame procedure.
//!
//! A `Session` owns the backend (device, surface), the single live pipeline
//! and the frame loop driving it. Everything GPU-specific sits behind
//! `RenderBackend`, so the ordering rules here are exercised in tests with a
//! recording backend.

use std::future::Future;

use crate::compile::ShaderProgram;
use crate::error::RenderError;
use crate::frame_loop::{FrameLoop, FrameLoopHandle, LoopError};
use crate::gpu::ParameterUniforms;
use crate::params::{ParameterStore, VariantKey};

/// Result of presenting one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Presented,
    /// The surface was stale or timed out; nothing reached the screen.
    Skipped,
}

/// GPU operations a session performs. Implemented by `WgpuBackend`.
pub trait RenderBackend {
    type Pipeline;

    fn build_pipeline(
        &mut self,
        program: &ShaderProgram,
        variant: VariantKey,
        generation: u64,
    ) -> Result<Self::Pipeline, RenderError>;

    fn upload(&mut self, pipeline: &Self::Pipeline, uniforms: &ParameterUniforms);

    /// Clears, draws the fullscreen triangle, submits and presents.
    fn draw(&mut self, pipeline: &Self::Pipeline) -> Result<DrawOutcome, RenderError>;

    fn canvas_width(&self) -> u32;

    /// Device loss or an uncaptured GPU error reported since the last poll.
    fn poll_fault(&mut self) -> Option<RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session is {0:?}; expected {1:?}")]
    WrongPhase(SessionPhase, SessionPhase),
    #[error(transparent)]
    Loop(#[from] LoopError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What a refresh callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn { next: FrameLoopHandle },
    Skipped { next: FrameLoopHandle },
    /// The variant changed; the pipeline was rebuilt and a new loop started.
    /// Nothing was drawn on this refresh.
    Rebuilt {
        variant: VariantKey,
        next: FrameLoopHandle,
    },
    /// The handle did not belong to the running loop; nothing happened.
    Stale,
}

impl FrameOutcome {
    /// Whether the refresh ran an iteration of the live loop. Rebuilds and
    /// skipped presents count; stale refreshes do not.
    pub fn is_tick(&self) -> bool {
        !matches!(self, FrameOutcome::Stale)
    }

    pub fn next(&self) -> Option<FrameLoopHandle> {
        match self {
            FrameOutcome::Drawn { next }
            | FrameOutcome::Skipped { next }
            | FrameOutcome::Rebuilt { next, .. } => Some(*next),
            FrameOutcome::Stale => None,
        }
    }
}

struct ActivePipeline<P> {
    variant: VariantKey,
    state: P,
}

pub struct Session<B: RenderBackend> {
    // Declared before `backend` so the pipeline is released before the device.
    pipeline: Option<ActivePipeline<B::Pipeline>>,
    backend: Option<B>,
    program: ShaderProgram,
    params: ParameterStore,
    phase: SessionPhase,
    frame_loop: FrameLoop,
    generation: u64,
}

impl<B: RenderBackend> Session<B> {
    pub fn new(program: ShaderProgram, params: ParameterStore) -> Self {
        Self {
            pipeline: None,
            backend: None,
            program,
            params,
            phase: SessionPhase::Uninitialized,
            frame_loop: FrameLoop::new(0),
            generation: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frame_loop
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// Variant of the live pipeline, if one exists.
    pub fn active_variant(&self) -> Option<VariantKey> {
        self.pipeline.as_ref().map(|active| active.variant)
    }

    /// Awaits `acquire` for the backend and builds the initial pipeline.
    ///
    /// The session is `Initializing` while the future is pending and ends up
    /// `Ready` or `Failed`. Only an uninitialized session may be initialized.
    pub async fn initialize<F>(&mut self, acquire: F) -> Result<(), SessionError>
    where
        F: Future<Output = Result<B, RenderError>>,
    {
        if self.phase != SessionPhase::Uninitialized {
            return Err(SessionError::WrongPhase(
                self.phase,
                SessionPhase::Uninitialized,
            ));
        }
        self.phase = SessionPhase::Initializing;

        let program = &self.program;
        let params = &self.params;
        let generation = self.generation;
        let result = async move {
            let mut backend = acquire.await?;
            let variant = program.variant_for(&params.get());
            let state = backend.build_pipeline(program, variant, generation)?;
            Ok::<_, RenderError>((backend, ActivePipeline { variant, state }))
        }
        .await;

        match result {
            Ok((backend, active)) => {
                tracing::info!(variant = %active.variant, "session ready");
                self.backend = Some(backend);
                self.pipeline = Some(active);
                self.phase = SessionPhase::Ready;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "session initialization failed");
                self.phase = SessionPhase::Failed;
                Err(err.into())
            }
        }
    }

    /// Starts the frame loop. Requires a ready session and an idle loop.
    pub fn start(&mut self) -> Result<FrameLoopHandle, SessionError> {
        if self.phase != SessionPhase::Ready {
            return Err(SessionError::WrongPhase(self.phase, SessionPhase::Ready));
        }
        Ok(self.frame_loop.start()?)
    }

    /// Runs one frame iteration for `handle`.
    ///
    /// Order: device fault check, handle check, parameter snapshot, variant
    /// reconcile, upload, draw, schedule. Any error is fatal: the loop is
    /// cancelled, the session becomes `Failed`, and the error is returned
    /// exactly once. Later calls return `Stale`.
    pub fn on_refresh(&mut self, handle: FrameLoopHandle) -> Result<FrameOutcome, RenderError> {
        if self.phase != SessionPhase::Ready {
            return Ok(FrameOutcome::Stale);
        }
        let Some(backend) = self.backend.as_mut() else {
            return Ok(FrameOutcome::Stale);
        };
        if let Some(err) = backend.poll_fault() {
            return Err(self.fail(err));
        }
        if !self.frame_loop.begin(handle) {
            return Ok(FrameOutcome::Stale);
        }

        let params = self.params.get();
        let variant = self.program.variant_for(&params);
        let active_variant = self.pipeline.as_ref().map(|active| active.variant);
        if active_variant != Some(variant) {
            return match self.rebuild(variant) {
                Ok(next) => Ok(FrameOutcome::Rebuilt { variant, next }),
                Err(err) => Err(self.fail(err)),
            };
        }

        let uniforms =
            ParameterUniforms::pack(&params, backend.canvas_width(), self.program.layout());
        let drawn = match self.pipeline.as_ref() {
            Some(active) => {
                backend.upload(&active.state, &uniforms);
                backend.draw(&active.state)
            }
            None => return Ok(FrameOutcome::Stale),
        };
        let drawn = match drawn {
            Ok(drawn) => drawn,
            Err(err) => return Err(self.fail(err)),
        };

        match (self.frame_loop.schedule_next(), drawn) {
            (Some(next), DrawOutcome::Presented) => Ok(FrameOutcome::Drawn { next }),
            (Some(next), DrawOutcome::Skipped) => Ok(FrameOutcome::Skipped { next }),
            (None, _) => Ok(FrameOutcome::Stale),
        }
    }

    /// Stops the frame loop. No further uploads or draws happen for any
    /// handle issued so far.
    pub fn cancel(&mut self) {
        self.frame_loop.cancel();
    }

    /// Cancels the loop and releases the pipeline ahead of the device.
    pub fn teardown(&mut self) {
        self.frame_loop.cancel();
        self.pipeline = None;
    }

    // Cancel, dispose the old pipeline, build the replacement, then start a
    // fresh loop. The old loop's handles are rejected from here on.
    fn rebuild(&mut self, variant: VariantKey) -> Result<FrameLoopHandle, RenderError> {
        let previous = self.active_variant();
        self.frame_loop.cancel();
        self.pipeline = None;
        self.generation += 1;

        let Some(backend) = self.backend.as_mut() else {
            return Err(RenderError::Surface("backend released".into()));
        };
        let state = backend.build_pipeline(&self.program, variant, self.generation)?;
        self.pipeline = Some(ActivePipeline { variant, state });

        let (frame_loop, next) = FrameLoop::started(self.generation);
        self.frame_loop = frame_loop;
        tracing::info!(
            from = ?previous,
            to = %variant,
            generation = self.generation,
            "shader variant switched"
        );
        Ok(next)
    }

    fn fail(&mut self, err: RenderError) -> RenderError {
        tracing::error!(error = %err, "render session failed");
        self.frame_loop.cancel();
        self.pipeline = None;
        self.phase = SessionPhase::Failed;
        err
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::future::ready;
    use std::rc::Rc;

    use super::*;
    use crate::gpu::{DeviceLostEvent, UniformLayout};
    use crate::params::{Param, RenderParameters};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Build { variant: VariantKey, generation: u64 },
        Upload { generation: u64, bytes: Vec<u8> },
        Draw { generation: u64 },
    }

    struct MockPipeline {
        generation: u64,
        live: Rc<Cell<usize>>,
    }

    impl Drop for MockPipeline {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    #[derive(Default, Clone)]
    struct Recorder {
        calls: Rc<RefCell<Vec<Call>>>,
        live: Rc<Cell<usize>>,
        max_live_at_build: Rc<Cell<usize>>,
        fault: Rc<RefCell<Option<RenderError>>>,
        fail_builds_from: Rc<Cell<Option<u64>>>,
        skip_draws: Rc<Cell<bool>>,
    }

    impl Recorder {
        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn draws(&self) -> usize {
            self.calls()
                .iter()
                .filter(|call| matches!(call, Call::Draw { .. }))
                .count()
        }

        fn lose_device(&self) {
            let event = DeviceLostEvent {
                reason: "Unknown".into(),
                message: "driver reset".into(),
            };
            *self.fault.borrow_mut() = Some(event.into());
        }

        fn raise_uncaptured(&self, message: &str) {
            *self.fault.borrow_mut() = Some(RenderError::Uncaptured(message.into()));
        }

        fn builds(&self) -> Vec<VariantKey> {
            self.calls()
                .iter()
                .filter_map(|call| match call {
                    Call::Build { variant, .. } => Some(*variant),
                    _ => None,
                })
                .collect()
        }
    }

    struct MockBackend {
        recorder: Recorder,
    }

    impl RenderBackend for MockBackend {
        type Pipeline = MockPipeline;

        fn build_pipeline(
            &mut self,
            _program: &ShaderProgram,
            variant: VariantKey,
            generation: u64,
        ) -> Result<MockPipeline, RenderError> {
            let live = &self.recorder.live;
            let peak = &self.recorder.max_live_at_build;
            peak.set(peak.get().max(live.get()));
            self.recorder
                .calls
                .borrow_mut()
                .push(Call::Build { variant, generation });
            if self
                .recorder
                .fail_builds_from
                .get()
                .is_some_and(|from| generation >= from)
            {
                return Err(RenderError::shader("mock", "bad shader"));
            }
            live.set(live.get() + 1);
            Ok(MockPipeline {
                generation,
                live: live.clone(),
            })
        }

        fn upload(&mut self, pipeline: &MockPipeline, uniforms: &ParameterUniforms) {
            self.recorder.calls.borrow_mut().push(Call::Upload {
                generation: pipeline.generation,
                bytes: uniforms.as_bytes().to_vec(),
            });
        }

        fn draw(&mut self, pipeline: &MockPipeline) -> Result<DrawOutcome, RenderError> {
            self.recorder.calls.borrow_mut().push(Call::Draw {
                generation: pipeline.generation,
            });
            if self.recorder.skip_draws.get() {
                Ok(DrawOutcome::Skipped)
            } else {
                Ok(DrawOutcome::Presented)
            }
        }

        fn canvas_width(&self) -> u32 {
            640
        }

        fn poll_fault(&mut self) -> Option<RenderError> {
            self.recorder.fault.borrow_mut().take()
        }
    }

    fn ready_session(
        layout: UniformLayout,
        initial: RenderParameters,
    ) -> (Session<MockBackend>, ParameterStore, Recorder) {
        let store = ParameterStore::new(initial);
        let recorder = Recorder::default();
        let mut session = Session::new(ShaderProgram::new(layout), store.clone());
        let backend = MockBackend {
            recorder: recorder.clone(),
        };
        pollster::block_on(session.initialize(ready(Ok(backend)))).unwrap();
        (session, store, recorder)
    }

    fn le_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn first_frame_uploads_defaults_then_draws() {
        let (mut session, _, recorder) =
            ready_session(UniformLayout::WithStress, RenderParameters::default());
        let handle = session.start().unwrap();
        let outcome = session.on_refresh(handle).unwrap();
        assert!(matches!(outcome, FrameOutcome::Drawn { .. }));
        assert_eq!(
            recorder.calls(),
            vec![
                Call::Build {
                    variant: VariantKey::Standard,
                    generation: 0
                },
                Call::Upload {
                    generation: 0,
                    bytes: le_bytes(&[0.5, 0.2, 1.0, 640.0, 0.0]),
                },
                Call::Draw { generation: 0 },
            ]
        );
    }

    #[test]
    fn basic_layout_uploads_four_values() {
        let (mut session, _, recorder) =
            ready_session(UniformLayout::Basic, RenderParameters::default());
        let handle = session.start().unwrap();
        session.on_refresh(handle).unwrap();
        assert!(recorder.calls().contains(&Call::Upload {
            generation: 0,
            bytes: le_bytes(&[0.5, 0.2, 1.0, 640.0]),
        }));
    }

    #[test]
    fn later_writes_win_before_the_next_frame() {
        let (mut session, store, recorder) =
            ready_session(UniformLayout::Basic, RenderParameters::default());
        let handle = session.start().unwrap();
        store.update(|p| p.with(Param::Mu, 0.1));
        store.update(|p| p.with(Param::Mu, 0.3));
        store.update(|p| p.with(Param::Sigma, 0.05));
        session.on_refresh(handle).unwrap();
        assert!(recorder.calls().contains(&Call::Upload {
            generation: 0,
            bytes: le_bytes(&[0.3, 0.05, 1.0, 640.0]),
        }));
    }

    #[test]
    fn uploads_always_precede_their_draw() {
        let (mut session, store, recorder) =
            ready_session(UniformLayout::Basic, RenderParameters::default());
        let mut handle = session.start().unwrap();
        for step in 0..5 {
            store.update(|p| p.nudge(Param::Frequency, step));
            handle = session.on_refresh(handle).unwrap().next().unwrap();
        }
        let calls = recorder.calls();
        for (index, call) in calls.iter().enumerate() {
            if let Call::Draw { generation } = call {
                assert!(matches!(
                    calls[index - 1],
                    Call::Upload { generation: g, .. } if g == *generation
                ));
            }
        }
        assert_eq!(recorder.draws(), 5);
    }

    #[test]
    fn raising_stress_rebuilds_without_drawing_that_refresh() {
        let (mut session, store, recorder) =
            ready_session(UniformLayout::WithStress, RenderParameters::default());
        let handle = session.start().unwrap();
        let handle = session.on_refresh(handle).unwrap().next().unwrap();

        store.update(|p| p.with(Param::StressLevel, 3.0));
        let outcome = session.on_refresh(handle).unwrap();
        let FrameOutcome::Rebuilt { variant, next } = outcome else {
            panic!("expected rebuild, got {outcome:?}");
        };
        assert_eq!(variant, VariantKey::Stress);
        assert_eq!(next.generation(), 1);
        assert_eq!(recorder.draws(), 1);

        // The old loop's handle is dead; the new loop draws with stress = 3.
        assert_eq!(session.on_refresh(handle).unwrap(), FrameOutcome::Stale);
        session.on_refresh(next).unwrap();
        let calls = recorder.calls();
        assert_eq!(
            calls[calls.len() - 2],
            Call::Upload {
                generation: 1,
                bytes: le_bytes(&[0.5, 0.2, 1.0, 640.0, 3.0]),
            }
        );
        assert_eq!(calls[calls.len() - 1], Call::Draw { generation: 1 });
    }

    #[test]
    fn old_pipeline_is_released_before_the_new_one_is_built() {
        let (mut session, store, recorder) =
            ready_session(UniformLayout::WithStress, RenderParameters::default());
        let mut handle = session.start().unwrap();
        for level in [2.0, 0.0, 5.0, 0.0] {
            store.update(|p| p.with(Param::StressLevel, level));
            handle = session.on_refresh(handle).unwrap().next().unwrap();
            handle = session.on_refresh(handle).unwrap().next().unwrap();
        }
        assert_eq!(
            recorder.builds(),
            vec![
                VariantKey::Standard,
                VariantKey::Stress,
                VariantKey::Standard,
                VariantKey::Stress,
                VariantKey::Standard,
            ]
        );
        assert_eq!(recorder.max_live_at_build.get(), 0);
        assert_eq!(recorder.live.get(), 1);
        session.teardown();
        assert_eq!(recorder.live.get(), 0);
    }

    #[test]
    fn same_variant_changes_do_not_rebuild() {
        let (mut session, store, recorder) =
            ready_session(UniformLayout::WithStress, RenderParameters::default());
        let mut handle = session.start().unwrap();
        store.update(|p| p.with(Param::StressLevel, 1.0));
        handle = session.on_refresh(handle).unwrap().next().unwrap();
        for level in [2.0, 7.0, 20.0] {
            store.update(|p| p.with(Param::StressLevel, level));
            let outcome = session.on_refresh(handle).unwrap();
            assert!(matches!(outcome, FrameOutcome::Drawn { .. }));
            handle = outcome.next().unwrap();
        }
        assert_eq!(
            recorder.builds(),
            vec![VariantKey::Standard, VariantKey::Stress]
        );
    }

    #[test]
    fn basic_program_never_rebuilds_for_stress() {
        let (mut session, store, recorder) =
            ready_session(UniformLayout::Basic, RenderParameters::default());
        let handle = session.start().unwrap();
        store.update(|p| p.with(Param::StressLevel, 9.0));
        let outcome = session.on_refresh(handle).unwrap();
        assert!(matches!(outcome, FrameOutcome::Drawn { .. }));
        assert_eq!(recorder.draws(), 1);
    }

    #[test]
    fn cancel_stops_all_further_work() {
        let (mut session, _, recorder) =
            ready_session(UniformLayout::Basic, RenderParameters::default());
        let handle = session.start().unwrap();
        let next = session.on_refresh(handle).unwrap().next().unwrap();
        let before = recorder.calls().len();
        session.cancel();
        assert_eq!(session.on_refresh(next).unwrap(), FrameOutcome::Stale);
        assert_eq!(recorder.calls().len(), before);
    }

    #[test]
    fn device_loss_is_reported_once_and_stops_drawing() {
        let (mut session, _, recorder) =
            ready_session(UniformLayout::Basic, RenderParameters::default());
        let handle = session.start().unwrap();
        let next = session.on_refresh(handle).unwrap().next().unwrap();
        recorder.lose_device();

        let err = session.on_refresh(next).unwrap_err();
        assert!(matches!(err, RenderError::DeviceLost { .. }));
        assert_eq!(session.phase(), SessionPhase::Failed);

        recorder.lose_device();
        assert_eq!(session.on_refresh(next).unwrap(), FrameOutcome::Stale);
        assert_eq!(recorder.draws(), 1);
        assert_eq!(recorder.live.get(), 0);
    }

    #[test]
    fn uncaptured_gpu_error_ends_the_session_once() {
        let (mut session, _, recorder) =
            ready_session(UniformLayout::WithStress, RenderParameters::default());
        let handle = session.start().unwrap();
        let next = session.on_refresh(handle).unwrap().next().unwrap();
        recorder.raise_uncaptured("Validation Error: buffer destroyed");

        let err = session.on_refresh(next).unwrap_err();
        assert!(matches!(err, RenderError::Uncaptured(ref message) if message.contains("buffer")));
        assert_eq!(session.phase(), SessionPhase::Failed);
        assert!(!session.frame_loop().is_running());
        assert_eq!(recorder.live.get(), 0);

        recorder.raise_uncaptured("Validation Error: again");
        assert_eq!(session.on_refresh(next).unwrap(), FrameOutcome::Stale);
        assert_eq!(session.on_refresh(handle).unwrap(), FrameOutcome::Stale);
        assert_eq!(recorder.draws(), 1);
    }

    #[test]
    fn failed_rebuild_is_fatal() {
        let (mut session, store, recorder) =
            ready_session(UniformLayout::WithStress, RenderParameters::default());
        recorder.fail_builds_from.set(Some(1));
        let handle = session.start().unwrap();
        store.update(|p| p.with(Param::StressLevel, 1.0));
        let err = session.on_refresh(handle).unwrap_err();
        assert!(matches!(err, RenderError::ShaderCompilation { .. }));
        assert_eq!(session.phase(), SessionPhase::Failed);
        assert!(!session.frame_loop().is_running());
    }

    #[test]
    fn skipped_frames_keep_the_loop_running() {
        let (mut session, _, recorder) =
            ready_session(UniformLayout::Basic, RenderParameters::default());
        recorder.skip_draws.set(true);
        let handle = session.start().unwrap();
        let outcome = session.on_refresh(handle).unwrap();
        assert!(matches!(outcome, FrameOutcome::Skipped { .. }));
        assert!(session.frame_loop().is_running());
    }

    #[test]
    fn every_accepted_refresh_is_a_tick() {
        let (mut session, store, recorder) =
            ready_session(UniformLayout::WithStress, RenderParameters::default());
        let handle = session.start().unwrap();
        let drawn = session.on_refresh(handle).unwrap();
        store.update(|p| p.with(Param::StressLevel, 2.0));
        let rebuilt = session.on_refresh(drawn.next().unwrap()).unwrap();
        recorder.skip_draws.set(true);
        let skipped = session.on_refresh(rebuilt.next().unwrap()).unwrap();
        let stale = session.on_refresh(handle).unwrap();

        assert!(matches!(rebuilt, FrameOutcome::Rebuilt { .. }));
        assert!(matches!(skipped, FrameOutcome::Skipped { .. }));
        assert!(drawn.is_tick() && rebuilt.is_tick() && skipped.is_tick());
        assert!(!stale.is_tick());
    }

    #[test]
    fn loop_cannot_start_before_ready() {
        let mut session: Session<MockBackend> = Session::new(
            ShaderProgram::new(UniformLayout::Basic),
            ParameterStore::default(),
        );
        assert!(matches!(
            session.start(),
            Err(SessionError::WrongPhase(SessionPhase::Uninitialized, SessionPhase::Ready))
        ));
    }

    #[test]
    fn failed_initialization_moves_to_failed() {
        let mut session: Session<MockBackend> = Session::new(
            ShaderProgram::new(UniformLayout::Basic),
            ParameterStore::default(),
        );
        let result = pollster::block_on(
            session.initialize(ready(Err(RenderError::AdapterUnavailable("none".into())))),
        );
        assert!(matches!(
            result,
            Err(SessionError::Render(RenderError::AdapterUnavailable(_)))
        ));
        assert_eq!(session.phase(), SessionPhase::Failed);
        assert!(session.start().is_err());
        assert!(session.backend().is_none());
    }

    #[test]
    fn initialize_builds_variant_for_initial_parameters() {
        let initial = RenderParameters::new(0.5, 0.2, 1.0, 4).unwrap();
        let (session, _, recorder) = ready_session(UniformLayout::WithStress, initial);
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.active_variant(), Some(VariantKey::Stress));
        assert_eq!(
            recorder.calls(),
            vec![Call::Build {
                variant: VariantKey::Stress,
                generation: 0
            }]
        );
    }

    #[test]
    fn initialize_twice_is_rejected() {
        let (mut session, _, recorder) =
            ready_session(UniformLayout::Basic, RenderParameters::default());
        let again = MockBackend { recorder };
        let result = pollster::block_on(session.initialize(ready(Ok(again))));
        assert!(matches!(
            result,
            Err(SessionError::WrongPhase(SessionPhase::Ready, SessionPhase::Uninitialized))
        ));
        assert_eq!(session.phase(), SessionPhase::Ready);
    }
}
