//! Turns parsed CLI input into a `RendererConfig` and launches the renderer.

use anyhow::{Context, Result};
use renderer::{Demo, Renderer};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::config;

pub fn run(args: &RunArgs) -> Result<()> {
    let config = config::resolve(args).context("invalid gaussfield configuration")?;
    let params = config.initial_parameters;
    tracing::info!(
        demo = %config.demo,
        mu = params.mu,
        sigma = params.sigma,
        frequency = params.frequency,
        stress = params.stress_level,
        power = ?config.power,
        "starting gaussfield"
    );
    Renderer::new(config).run()
}

/// Runs the probe demo regardless of `--demo`.
pub fn probe(args: &RunArgs) -> Result<()> {
    let mut config = config::resolve(args).context("invalid gaussfield configuration")?;
    config.demo = Demo::Probe;
    Renderer::new(config).run()
}

pub fn initialise_tracing() {
    let default_filter =
        "warn,gaussfield=info,renderer=info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error,winit=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
