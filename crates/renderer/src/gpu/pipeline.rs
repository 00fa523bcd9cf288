use std::borrow::Cow;

use crate::compile::{compile_module, ShaderProgram};
use crate::error::RenderError;
use crate::params::VariantKey;

use super::uniforms::{ParameterUniforms, UniformLayout};

/// Everything needed to draw one shader variant: pipeline, uniform buffer and
/// the bind group tying them together. Dropping it releases all three.
pub struct PipelineState {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    layout: UniformLayout,
    variant: VariantKey,
    generation: u64,
}

impl PipelineState {
    pub fn build(
        device: &wgpu::Device,
        program: &ShaderProgram,
        surface_format: wgpu::TextureFormat,
        variant: VariantKey,
        generation: u64,
    ) -> Result<Self, RenderError> {
        let layout = program.layout();
        let vertex_module = compile_module(
            device,
            "gaussfield vertex",
            Cow::Borrowed(program.vertex_source()),
        )?;
        let fragment_label = format!("gaussfield {variant} fragment");
        let fragment_module = compile_module(
            device,
            &fragment_label,
            Cow::Owned(program.fragment_source(variant)),
        )?;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parameter layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(layout.size()),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gaussfield pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        // Layout mismatches between the WGSL and the bind group surface here.
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gaussfield pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::shader(fragment_label, err.to_string()));
        }

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("parameter uniforms"),
            size: layout.size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("parameter bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        tracing::debug!(%variant, generation, ?layout, "built pipeline");

        Ok(Self {
            pipeline,
            bind_group,
            uniform_buffer,
            layout,
            variant,
            generation,
        })
    }

    /// Writes this frame's parameters into the uniform buffer.
    pub fn upload(&self, queue: &wgpu::Queue, uniforms: &ParameterUniforms) {
        debug_assert_eq!(uniforms.layout(), self.layout);
        queue.write_buffer(&self.uniform_buffer, 0, uniforms.as_bytes());
    }
}

impl Drop for PipelineState {
    fn drop(&mut self) {
        tracing::trace!(variant = %self.variant, generation = self.generation, "dropping pipeline");
    }
}
