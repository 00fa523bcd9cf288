use std::borrow::Cow;

use crate::error::RenderError;
use crate::gpu::UniformLayout;
use crate::params::{RenderParameters, VariantKey};

/// Shader sources for one demo: a shared fullscreen-triangle vertex stage
/// plus one fragment stage per variant the demo supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    layout: UniformLayout,
}

impl ShaderProgram {
    pub fn new(layout: UniformLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> UniformLayout {
        self.layout
    }

    /// Variant the program should run for `params`.
    ///
    /// Programs without a stress field only ever have the standard variant.
    pub fn variant_for(&self, params: &RenderParameters) -> VariantKey {
        if self.layout.has_stress() {
            params.variant_key()
        } else {
            VariantKey::Standard
        }
    }

    pub fn vertex_source(&self) -> &'static str {
        VERTEX_SHADER_WGSL
    }

    /// Assembles the fragment shader for `variant`.
    pub fn fragment_source(&self, variant: VariantKey) -> String {
        let params_struct = match self.layout {
            UniformLayout::Basic => PARAMS_BASIC_WGSL,
            UniformLayout::WithStress => PARAMS_WITH_STRESS_WGSL,
        };
        let entry = match (self.layout, variant) {
            (UniformLayout::WithStress, VariantKey::Stress) => FRAGMENT_MAIN_STRESS_WGSL,
            _ => FRAGMENT_MAIN_WGSL,
        };
        format!("{params_struct}\n{PATTERN_WGSL}\n{entry}")
    }
}

/// Compiles WGSL inside a validation error scope so a bad shader becomes a
/// `ShaderCompilation` error instead of an uncaptured device error.
pub(crate) fn compile_module(
    device: &wgpu::Device,
    label: &str,
    source: Cow<'static, str>,
) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source),
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(RenderError::shader(label, err.to_string()));
    }
    Ok(module)
}

/// Fullscreen triangle; no vertex buffer, three invocations.
const VERTEX_SHADER_WGSL: &str = r"@vertex
fn main(@builtin(vertex_index) vertex_index: u32) -> @builtin(position) vec4<f32> {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -3.0),
        vec2<f32>(3.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    return vec4<f32>(positions[vertex_index], 0.0, 1.0);
}
";

// Field order must match `BasicUniforms`.
const PARAMS_BASIC_WGSL: &str = r"struct Params {
    mu: f32,
    sigma: f32,
    frequency: f32,
    canvas_width: f32,
}

@group(0) @binding(0) var<uniform> params: Params;
";

// Field order must match `StressUniforms`.
const PARAMS_WITH_STRESS_WGSL: &str = r"struct Params {
    mu: f32,
    sigma: f32,
    frequency: f32,
    canvas_width: f32,
    stress_level: f32,
}

@group(0) @binding(0) var<uniform> params: Params;
";

/// Gaussian envelope centred on `mu` (in canvas widths) modulating a cosine
/// carrier of `frequency` cycles per canvas width.
const PATTERN_WGSL: &str = r"const TAU: f32 = 6.283185307;

fn pattern(frag_coord: vec4<f32>) -> vec3<f32> {
    let x = frag_coord.x / params.canvas_width;
    let y = frag_coord.y / params.canvas_width;
    let z = (x - params.mu) / params.sigma;
    let envelope = exp(-0.5 * z * z);
    let carrier = 0.5 + 0.5 * cos(TAU * params.frequency * (x - params.mu));
    let level = envelope * carrier;
    return vec3<f32>(level, level * 0.75 + 0.1 * y, 0.2 + 0.6 * envelope);
}
";

const FRAGMENT_MAIN_WGSL: &str = r"@fragment
fn main(@builtin(position) frag_coord: vec4<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(pattern(frag_coord), 1.0);
}
";

/// Burns `stress_level * 256` transcendental evaluations per pixel.
const FRAGMENT_MAIN_STRESS_WGSL: &str = r"@fragment
fn main(@builtin(position) frag_coord: vec4<f32>) -> @location(0) vec4<f32> {
    let iterations = u32(params.stress_level) * 256u;
    var acc = 0.0;
    for (var i = 0u; i < iterations; i = i + 1u) {
        acc = sin(acc + frag_coord.x * 0.001 * f32(i));
    }
    let color = pattern(frag_coord) + vec3<f32>(0.0001 * acc);
    return vec4<f32>(clamp(color, vec3<f32>(0.0), vec3<f32>(1.0)), 1.0);
}
";
