use std::path::PathBuf;

use clap::{Parser, Subcommand};
use renderer::{Demo, GpuPowerPreference};

#[derive(Parser, Debug)]
#[command(
    name = "gaussfield",
    author,
    version,
    about = "Fullscreen Gaussian-envelope shader demo rendered with wgpu"
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Demo to run: `probe`, `basic`, or `stress` (default).
    #[arg(long, value_name = "DEMO", value_parser = parse_demo)]
    pub demo: Option<Demo>,

    /// Centre of the envelope, in canvas widths (0 to 1).
    #[arg(long, value_name = "VALUE", allow_negative_numbers = true)]
    pub mu: Option<f32>,

    /// Width of the envelope, in canvas widths (above 0, at most 0.5).
    #[arg(long, value_name = "VALUE", allow_negative_numbers = true)]
    pub sigma: Option<f32>,

    /// Carrier cycles per canvas width (whole number, 1 to 20).
    #[arg(long, value_name = "VALUE", allow_negative_numbers = true)]
    pub frequency: Option<f32>,

    /// Per-pixel busy-work multiplier (0 to 20); any value above 0 selects the stress shader.
    #[arg(long, value_name = "LEVEL")]
    pub stress: Option<u32>,

    /// GPU power preference: `low` or `high`.
    #[arg(long, value_name = "PREFERENCE", value_parser = parse_power)]
    pub power: Option<GpuPowerPreference>,

    /// TOML file supplying defaults for any option not given on the command line.
    #[arg(long, value_name = "FILE", env = "GAUSSFIELD_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Check for a usable GPU, print the adapter, and exit.
    Probe,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_demo(value: &str) -> Result<Demo, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("demo must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "probe" | "support" => Ok(Demo::Probe),
        "basic" => Ok(Demo::Basic),
        "stress" => Ok(Demo::Stress),
        other => Err(format!(
            "unknown demo '{other}'; expected probe, basic, or stress"
        )),
    }
}

pub fn parse_power(value: &str) -> Result<GpuPowerPreference, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("power preference must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "low" | "low-power" => Ok(GpuPowerPreference::Low),
        "high" | "high-performance" => Ok(GpuPowerPreference::High),
        other => Err(format!(
            "unknown power preference '{other}'; expected low or high"
        )),
    }
}
