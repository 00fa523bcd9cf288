use std::fmt;
use std::time::Duration;

use crate::compile::ShaderProgram;
use crate::gpu::UniformLayout;
use crate::params::RenderParameters;

/// Which demo the renderer should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Demo {
    /// Acquire a device, report the adapter, and exit without drawing.
    Probe,
    /// Pattern with the four-value parameter block and a single shader.
    Basic,
    /// Pattern with a stress level that swaps between two shader variants.
    #[default]
    Stress,
}

impl Demo {
    /// Shader program the demo draws with; `None` for demos that never draw.
    pub fn program(self) -> Option<ShaderProgram> {
        match self {
            Demo::Probe => None,
            Demo::Basic => Some(ShaderProgram::new(UniformLayout::Basic)),
            Demo::Stress => Some(ShaderProgram::new(UniformLayout::WithStress)),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Demo::Probe => f.write_str("probe"),
            Demo::Basic => f.write_str("basic"),
            Demo::Stress => f.write_str("stress"),
        }
    }
}

/// Adapter selection hint forwarded to wgpu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    Low,
    #[default]
    High,
}

impl From<GpuPowerPreference> for wgpu::PowerPreference {
    fn from(value: GpuPowerPreference) -> Self {
        match value {
            GpuPowerPreference::Low => wgpu::PowerPreference::LowPower,
            GpuPowerPreference::High => wgpu::PowerPreference::HighPerformance,
        }
    }
}

/// Summary of the adapter a device was created on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
    pub driver: String,
    pub driver_info: String,
}

impl AdapterProfile {
    pub fn from_wgpu(info: &wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
            driver: info.driver.clone(),
            driver_info: info.driver_info.clone(),
        }
    }

    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
    }
}

impl fmt::Display for AdapterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}, {:?}", self.name, self.backend, self.device_type)?;
        if !self.driver.is_empty() {
            write!(f, ", {}", self.driver)?;
            if !self.driver_info.is_empty() {
                write!(f, " {}", self.driver_info)?;
            }
        }
        f.write_str(")")
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// Built by the binary from CLI flags and the optional config file; the
/// parameters are already validated by the time they land here.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub demo: Demo,
    /// Drawing surface size in physical pixels. The window is not resizable.
    pub canvas_size: (u32, u32),
    pub initial_parameters: RenderParameters,
    pub power: GpuPowerPreference,
    /// How often the frame rate is sampled and reported.
    pub fps_interval: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            demo: Demo::default(),
            canvas_size: (640, 480),
            initial_parameters: RenderParameters::default(),
            power: GpuPowerPreference::default(),
            fps_interval: Duration::from_secs(1),
        }
    }
}
