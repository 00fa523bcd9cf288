use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use tracing::{error, info};

use crate::compile::ShaderProgram;
use crate::controls::{self, ControlAction};
use crate::error::RenderError;
use crate::fps::{FpsMonitor, FpsSample};
use crate::frame_loop::FrameLoopHandle;
use crate::gpu::{GpuDevice, SurfaceBinding, WgpuBackend};
use crate::params::ParameterStore;
use crate::session::Session;
use crate::types::RendererConfig;

const WINDOW_TITLE: &str = "gaussfield";

/// Opens the fixed-size window and drives the session from its redraw
/// events until the user quits or a fatal error occurs.
pub(crate) fn run_window(config: &RendererConfig, program: ShaderProgram) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let (width, height) = config.canvas_size;
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(width, height))
        .with_resizable(false)
        .build(&event_loop)
        .map_err(|err| RenderError::CanvasUnavailable(err.to_string()))?;
    let window = Arc::new(window);

    let params = ParameterStore::new(config.initial_parameters);
    let mut session: Session<WgpuBackend> = Session::new(program, params.clone());
    let power = config.power;
    let surface_window = window.clone();
    pollster::block_on(session.initialize(async move {
        let gpu = GpuDevice::acquire(power).await?;
        info!(adapter = %gpu.profile(), "GPU device acquired");
        let surface = SurfaceBinding::bind(&gpu, surface_window)?;
        Ok::<_, RenderError>(WgpuBackend::new(gpu, surface))
    }))?;

    let mut scheduled: Option<FrameLoopHandle> = Some(session.start()?);
    let mut fps = FpsMonitor::new(config.fps_interval, Instant::now());
    let mut fatal: Option<RenderError> = None;
    info!(demo = %config.demo, controls = %controls::help_text(), "rendering");
    window.request_redraw();

    let run_result = event_loop.run(|event, elwt| match event {
        Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                session.teardown();
                scheduled = None;
                elwt.exit();
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match controls::action_for_key(&event.logical_key) {
                    Some(ControlAction::Quit) => {
                        info!("escape pressed; shutting down");
                        session.teardown();
                        scheduled = None;
                        elwt.exit();
                    }
                    Some(ControlAction::Nudge { param, steps }) => {
                        controls::apply(&params, param, steps);
                    }
                    None => {}
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(handle) = scheduled.take() else {
                    return;
                };
                match session.on_refresh(handle) {
                    Ok(outcome) => {
                        if outcome.is_tick() {
                            fps.record_frame();
                        }
                        scheduled = outcome.next();
                        if scheduled.is_some() {
                            window.request_redraw();
                        }
                    }
                    Err(err) => {
                        error!(error = %err, "rendering stopped");
                        fatal = Some(err);
                        elwt.exit();
                    }
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            if let Some(sample) = fps.poll(now) {
                report_fps(&window, sample);
            }
            if scheduled.is_some() {
                elwt.set_control_flow(ControlFlow::WaitUntil(fps.next_deadline()));
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    });

    session.teardown();
    if let Some(err) = fatal {
        return Err(err.into());
    }
    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

fn report_fps(window: &Window, sample: FpsSample) {
    let fps = sample.per_second();
    info!(fps = fps.round(), frames = sample.frames, "frame rate");
    window.set_title(&format!("{WINDOW_TITLE} - {fps:.0} fps"));
}
