//! wgpu side of the renderer.
//!
//! - `context` acquires the adapter/device and binds the window surface.
//! - `pipeline` builds the pipeline, uniform buffer and bind group for one
//!   shader variant.
//! - `uniforms` packs parameters into the byte layout the shaders read.
//! - `backend` implements `RenderBackend` on top of the three.

mod backend;
mod context;
mod pipeline;
mod uniforms;

pub use backend::WgpuBackend;
pub use context::{DeviceLostEvent, GpuDevice, SurfaceBinding};
pub use pipeline::PipelineState;
pub use uniforms::{BasicUniforms, ParameterUniforms, StressUniforms, UniformLayout};
