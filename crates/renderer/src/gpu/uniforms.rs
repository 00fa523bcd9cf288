use bytemuck::{Pod, Zeroable};

use crate::params::RenderParameters;

/// Byte layout of the parameter block a shader program expects.
///
/// Both layouts are tightly packed `f32`s in declaration order; the WGSL
/// structs in `shaders` mirror them field for field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformLayout {
    /// `[mu, sigma, frequency, canvas_width]`
    Basic,
    /// `[mu, sigma, frequency, canvas_width, stress_level]`
    WithStress,
}

impl UniformLayout {
    pub fn size(self) -> u64 {
        match self {
            UniformLayout::Basic => std::mem::size_of::<BasicUniforms>() as u64,
            UniformLayout::WithStress => std::mem::size_of::<StressUniforms>() as u64,
        }
    }

    pub fn has_stress(self) -> bool {
        matches!(self, UniformLayout::WithStress)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BasicUniforms {
    pub mu: f32,
    pub sigma: f32,
    pub frequency: f32,
    pub canvas_width: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StressUniforms {
    pub mu: f32,
    pub sigma: f32,
    pub frequency: f32,
    pub canvas_width: f32,
    pub stress_level: f32,
}

/// One frame's worth of uniform data, ready to be written to the GPU.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParameterUniforms {
    Basic(BasicUniforms),
    WithStress(StressUniforms),
}

impl ParameterUniforms {
    pub fn pack(params: &RenderParameters, canvas_width: u32, layout: UniformLayout) -> Self {
        let canvas_width = canvas_width as f32;
        match layout {
            UniformLayout::Basic => Self::Basic(BasicUniforms {
                mu: params.mu,
                sigma: params.sigma,
                frequency: params.frequency,
                canvas_width,
            }),
            UniformLayout::WithStress => Self::WithStress(StressUniforms {
                mu: params.mu,
                sigma: params.sigma,
                frequency: params.frequency,
                canvas_width,
                stress_level: params.stress_level as f32,
            }),
        }
    }

    pub fn layout(&self) -> UniformLayout {
        match self {
            Self::Basic(_) => UniformLayout::Basic,
            Self::WithStress(_) => UniformLayout::WithStress,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Basic(uniforms) => bytemuck::bytes_of(uniforms),
            Self::WithStress(uniforms) => bytemuck::bytes_of(uniforms),
        }
    }
}
