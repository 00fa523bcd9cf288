/// Session-fatal failures raised by the renderer.
///
/// None of these are retried. Initialisation errors surface from
/// `GpuDevice::acquire`, `SurfaceBinding::bind` and `PipelineState::build`;
/// `DeviceLost`, `Uncaptured` and `Surface` can surface from any later frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no GPU backend is available on this platform")]
    Unsupported,
    #[error("no suitable GPU adapter found: {0}")]
    AdapterUnavailable(String),
    #[error("failed to create GPU device: {0}")]
    DeviceUnavailable(String),
    #[error("drawing surface unavailable: {0}")]
    CanvasUnavailable(String),
    #[error("GPU device lost ({reason}): {message}")]
    DeviceLost { reason: String, message: String },
    #[error("uncaptured GPU error: {0}")]
    Uncaptured(String),
    #[error("shader compilation failed for {label}: {message}")]
    ShaderCompilation { label: String, message: String },
    #[error("unrecoverable surface error: {0}")]
    Surface(String),
}

impl RenderError {
    pub(crate) fn shader(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShaderCompilation {
            label: label.into(),
            message: message.into(),
        }
    }
}
