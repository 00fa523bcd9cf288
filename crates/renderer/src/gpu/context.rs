use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use winit::window::Window;

use crate::error::RenderError;
use crate::types::{AdapterProfile, GpuPowerPreference};

/// Notification forwarded from wgpu's device-lost callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLostEvent {
    pub reason: String,
    pub message: String,
}

impl From<DeviceLostEvent> for RenderError {
    fn from(event: DeviceLostEvent) -> Self {
        RenderError::DeviceLost {
            reason: event.reason,
            message: event.message,
        }
    }
}

/// Adapter, device and queue for one session.
pub struct GpuDevice {
    instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    profile: AdapterProfile,
    lost: Receiver<DeviceLostEvent>,
    uncaptured: Receiver<String>,
}

impl GpuDevice {
    /// Requests an adapter and device. Each failure mode maps to its own
    /// `RenderError` variant and nothing is retried.
    pub async fn acquire(power: GpuPowerPreference) -> Result<Self, RenderError> {
        if wgpu::Instance::enabled_backend_features().is_empty() {
            return Err(RenderError::Unsupported);
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: power.into(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| RenderError::AdapterUnavailable(err.to_string()))?;

        let profile = AdapterProfile::from_wgpu(&adapter.get_info());
        tracing::debug!(
            name = %profile.name,
            backend = ?profile.backend,
            device_type = ?profile.device_type,
            is_software = profile.is_software(),
            "selected GPU adapter"
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gaussfield device"),
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::default(),
            })
            .await
            .map_err(|err| RenderError::DeviceUnavailable(err.to_string()))?;

        let (sender, lost) = crossbeam_channel::bounded(1);
        install_lost_callback(&device, sender);
        let (sender, uncaptured) = crossbeam_channel::bounded(1);
        install_error_handler(&device, sender);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            profile,
            lost,
            uncaptured,
        })
    }

    pub fn profile(&self) -> &AdapterProfile {
        &self.profile
    }

    /// Returns the first fatal device event that has arrived, if any.
    /// Device loss takes precedence over uncaptured errors.
    pub fn poll_fault(&self) -> Option<RenderError> {
        if let Ok(event) = self.lost.try_recv() {
            return Some(event.into());
        }
        self.uncaptured.try_recv().ok().map(RenderError::Uncaptured)
    }
}

fn install_lost_callback(device: &wgpu::Device, sender: Sender<DeviceLostEvent>) {
    device.set_device_lost_callback(move |reason, message| {
        // Only the first notification matters; the session fails on it.
        let _ = sender.try_send(DeviceLostEvent {
            reason: format!("{reason:?}"),
            message,
        });
    });
}

// Replaces wgpu's default handler, which panics, so validation and
// out-of-memory errors outside an error scope reach the session instead.
fn install_error_handler(device: &wgpu::Device, sender: Sender<String>) {
    device.on_uncaptured_error(Box::new(move |error| {
        tracing::error!(%error, "uncaptured wgpu error");
        let _ = sender.try_send(error.to_string());
    }));
}

/// Presentable surface bound to the window, configured for the device.
pub struct SurfaceBinding {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl SurfaceBinding {
    pub fn bind(gpu: &GpuDevice, window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let surface = gpu
            .instance
            .create_surface(window)
            .map_err(|err| RenderError::CanvasUnavailable(err.to_string()))?;

        if !gpu.adapter.is_surface_supported(&surface) {
            return Err(RenderError::CanvasUnavailable(format!(
                "adapter {} cannot present to this window",
                gpu.profile.name
            )));
        }

        let caps = surface.get_capabilities(&gpu.adapter);
        let format = caps.formats.first().copied().ok_or_else(|| {
            RenderError::CanvasUnavailable("surface reports no supported formats".into())
        })?;
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::Opaque)
        {
            wgpu::CompositeAlphaMode::Opaque
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let max_dimension = gpu.adapter.limits().max_texture_dimension_2d;
        let width = size.width.max(1);
        let height = size.height.max(1);
        if width > max_dimension || height > max_dimension {
            return Err(RenderError::CanvasUnavailable(format!(
                "GPU max texture dimension is {max_dimension}, requested surface is {width}x{height}"
            )));
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &config);
        tracing::debug!(?format, width, height, "configured surface");

        Ok(Self { surface, config })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Re-applies the current configuration after the surface went stale.
    pub fn reconfigure(&self, device: &wgpu::Device) {
        self.surface.configure(device, &self.config);
    }

    pub fn current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }
}
