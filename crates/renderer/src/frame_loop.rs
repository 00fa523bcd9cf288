//! Cancellable per-refresh iteration tracking.
//!
//! A `FrameLoop` never draws anything itself; it only decides whether the
//! iteration a refresh signal is trying to run is still the one that was
//! scheduled. Each loop belongs to exactly one pipeline generation and is
//! replaced, not restarted, once cancelled.

/// Token for the single iteration currently scheduled on a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameLoopHandle {
    generation: u64,
    sequence: u64,
}

impl FrameLoopHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoopError {
    #[error("frame loop can only start from idle (currently {0:?})")]
    NotIdle(LoopState),
}

#[derive(Debug)]
pub struct FrameLoop {
    generation: u64,
    state: LoopState,
    scheduled: Option<FrameLoopHandle>,
    next_sequence: u64,
    completed: u64,
}

impl FrameLoop {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            state: LoopState::Idle,
            scheduled: None,
            next_sequence: 0,
            completed: 0,
        }
    }

    /// Creates a loop that is already running, with its first iteration scheduled.
    pub fn started(generation: u64) -> (Self, FrameLoopHandle) {
        let mut frame_loop = Self::new(generation);
        frame_loop.state = LoopState::Running;
        let handle = frame_loop.schedule();
        (frame_loop, handle)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Handle of the iteration waiting for the next refresh, if any.
    pub fn scheduled(&self) -> Option<FrameLoopHandle> {
        self.scheduled
    }

    /// Iterations accepted by `begin` over the loop's lifetime.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn start(&mut self) -> Result<FrameLoopHandle, LoopError> {
        if self.state != LoopState::Idle {
            return Err(LoopError::NotIdle(self.state));
        }
        self.state = LoopState::Running;
        Ok(self.schedule())
    }

    /// Claims the scheduled iteration. Returns false for stale handles or a
    /// loop that is no longer running; the caller must then do nothing.
    pub fn begin(&mut self, handle: FrameLoopHandle) -> bool {
        if self.state != LoopState::Running || self.scheduled != Some(handle) {
            return false;
        }
        self.scheduled = None;
        self.completed += 1;
        true
    }

    /// Schedules the iteration after the one just claimed.
    pub fn schedule_next(&mut self) -> Option<FrameLoopHandle> {
        if self.state != LoopState::Running {
            return None;
        }
        if let Some(handle) = self.scheduled {
            return Some(handle);
        }
        Some(self.schedule())
    }

    /// Stops the loop. Idempotent; `Cancelled` is terminal.
    pub fn cancel(&mut self) {
        if self.state != LoopState::Cancelled {
            tracing::debug!(
                generation = self.generation,
                completed = self.completed,
                "frame loop cancelled"
            );
        }
        self.state = LoopState::Cancelled;
        self.scheduled = None;
    }

    fn schedule(&mut self) -> FrameLoopHandle {
        let handle = FrameLoopHandle {
            generation: self.generation,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.scheduled = Some(handle);
        handle
    }
}
