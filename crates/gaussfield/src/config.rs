//! Optional TOML configuration and its merge with CLI flags.
//!
//! Precedence: CLI flag, then config file, then built-in default. The merged
//! parameters are validated here so a bad value is reported before any
//! window or GPU device exists.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use renderer::{Demo, GpuPowerPreference, ParameterError, RenderParameters, RendererConfig};
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::cli::{parse_demo, parse_power, RunArgs};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid parameter: {0}")]
    Parameter(#[from] ParameterError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Contents of a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, deserialize_with = "deserialize_demo_opt")]
    pub demo: Option<Demo>,
    pub mu: Option<f32>,
    pub sigma: Option<f32>,
    pub frequency: Option<f32>,
    pub stress: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_power_opt")]
    pub power: Option<GpuPowerPreference>,
    #[serde(default, deserialize_with = "deserialize_duration_opt")]
    pub fps_interval: Option<Duration>,
}

impl FileConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }
}

/// Loads the file named by `--config`, if any, and merges it with the flags.
pub fn resolve(args: &RunArgs) -> Result<RendererConfig, ConfigError> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    merge(args, &file)
}

pub fn merge(args: &RunArgs, file: &FileConfig) -> Result<RendererConfig, ConfigError> {
    let defaults = RendererConfig::default();
    let base = defaults.initial_parameters;

    let initial_parameters = RenderParameters::new(
        args.mu.or(file.mu).unwrap_or(base.mu),
        args.sigma.or(file.sigma).unwrap_or(base.sigma),
        args.frequency.or(file.frequency).unwrap_or(base.frequency),
        args.stress.or(file.stress).unwrap_or(base.stress_level),
    )?;

    let fps_interval = file.fps_interval.unwrap_or(defaults.fps_interval);
    if fps_interval.is_zero() {
        return Err(ConfigError::Invalid(
            "fps_interval must be greater than zero".to_string(),
        ));
    }

    Ok(RendererConfig {
        demo: args.demo.or(file.demo).unwrap_or(defaults.demo),
        canvas_size: defaults.canvas_size,
        initial_parameters,
        power: args.power.or(file.power).unwrap_or(defaults.power),
        fps_interval,
    })
}

fn deserialize_demo_opt<'de, D>(deserializer: D) -> Result<Option<Demo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    value
        .map(|value| parse_demo(&value).map_err(de::Error::custom))
        .transpose()
}

fn deserialize_power_opt<'de, D>(deserializer: D) -> Result<Option<GpuPowerPreference>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    value
        .map(|value| parse_power(&value).map_err(de::Error::custom))
        .transpose()
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs_f64(v)))
        }
    }

    deserializer.deserialize_any(Visitor)
}
