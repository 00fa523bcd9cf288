use crate::compile::ShaderProgram;
use crate::error::RenderError;
use crate::params::VariantKey;
use crate::session::{DrawOutcome, RenderBackend};

use super::context::{GpuDevice, SurfaceBinding};
use super::pipeline::PipelineState;
use super::uniforms::ParameterUniforms;

/// `RenderBackend` backed by a real device and window surface.
pub struct WgpuBackend {
    surface: SurfaceBinding,
    gpu: GpuDevice,
}

impl WgpuBackend {
    pub fn new(gpu: GpuDevice, surface: SurfaceBinding) -> Self {
        Self { surface, gpu }
    }

    fn acquire_frame(&self) -> Result<Option<wgpu::SurfaceTexture>, RenderError> {
        match self.surface.current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated; reconfiguring");
                self.surface.reconfigure(&self.gpu.device);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timeout; skipping frame");
                Ok(None)
            }
            Err(err @ (wgpu::SurfaceError::OutOfMemory | wgpu::SurfaceError::Other)) => {
                Err(RenderError::Surface(err.to_string()))
            }
        }
    }
}

impl RenderBackend for WgpuBackend {
    type Pipeline = PipelineState;

    fn build_pipeline(
        &mut self,
        program: &ShaderProgram,
        variant: VariantKey,
        generation: u64,
    ) -> Result<PipelineState, RenderError> {
        PipelineState::build(
            &self.gpu.device,
            program,
            self.surface.format(),
            variant,
            generation,
        )
    }

    fn upload(&mut self, pipeline: &PipelineState, uniforms: &ParameterUniforms) {
        pipeline.upload(&self.gpu.queue, uniforms);
    }

    fn draw(&mut self, pipeline: &PipelineState) -> Result<DrawOutcome, RenderError> {
        let Some(frame) = self.acquire_frame()? else {
            return Ok(DrawOutcome::Skipped);
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pattern pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&pipeline.pipeline);
            render_pass.set_bind_group(0, &pipeline.bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }
        self.gpu.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(DrawOutcome::Presented)
    }

    fn canvas_width(&self) -> u32 {
        self.surface.width()
    }

    fn poll_fault(&mut self) -> Option<RenderError> {
        self.gpu.poll_fault()
    }
}
