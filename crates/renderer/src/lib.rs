//! Renderer crate for gaussfield.
//!
//! Draws a parameterised fullscreen pattern with `wgpu` into a fixed-size
//! `winit` window, re-uploading the parameters every refresh and swapping
//! shader variants when the stress level crosses zero. The overall flow is:
//!
//! ```text
//!   gaussfield CLI
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ Session::initialize ──▶ winit event loop
//!                                                  │ RedrawRequested
//!                                                  ▼
//!                          Session::on_refresh ──▶ reconcile ─▶ upload ─▶ draw
//! ```
//!
//! `Session` holds the ordering rules and is generic over `RenderBackend`;
//! `gpu::WgpuBackend` is the real implementation.

mod compile;
mod controls;
mod error;
mod fps;
mod frame_loop;
pub mod gpu;
mod params;
mod session;
mod types;
mod window;

use anyhow::Result;

pub use compile::ShaderProgram;
pub use controls::{action_for_key, ControlAction};
pub use error::RenderError;
pub use fps::{FpsMonitor, FpsSample};
pub use frame_loop::{FrameLoop, FrameLoopHandle, LoopError, LoopState};
pub use params::{Param, ParamSpec, ParameterError, ParameterStore, RenderParameters, VariantKey};
pub use session::{
    DrawOutcome, FrameOutcome, RenderBackend, Session, SessionError, SessionPhase,
};
pub use types::{AdapterProfile, Demo, GpuPowerPreference, RendererConfig};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Runs the configured demo until the window closes.
    ///
    /// Returns the fatal error that ended the session, if any.
    pub fn run(&self) -> Result<()> {
        match self.config.demo.program() {
            Some(program) => window::run_window(&self.config, program),
            None => {
                let profile = probe(self.config.power)?;
                tracing::info!(adapter = %profile, "WebGPU-capable device available");
                Ok(())
            }
        }
    }
}

/// Acquires a device without opening a window and reports the adapter.
pub fn probe(power: GpuPowerPreference) -> Result<AdapterProfile, RenderError> {
    let gpu = pollster::block_on(gpu::GpuDevice::acquire(power))?;
    Ok(gpu.profile().clone())
}
