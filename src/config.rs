use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::audio::CaptureSource;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// "file" or "none"
    pub source: String,
    /// Recording replayed by the file source
    pub file_path: Option<String>,
    /// Interval between emitted fragments
    pub timeslice_ms: u64,
    /// Bytes per emitted fragment
    pub fragment_size: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: "none".to_string(),
            file_path: None,
            timeslice_ms: 250,
            fragment_size: 4096,
        }
    }
}

impl CaptureConfig {
    /// Resolve the configured capture source
    pub fn source(&self) -> Result<CaptureSource> {
        match self.source.as_str() {
            "file" => match &self.file_path {
                Some(path) => Ok(CaptureSource::File(PathBuf::from(path))),
                None => bail!("capture.source = \"file\" requires capture.file_path"),
            },
            "none" => Ok(CaptureSource::None),
            other => bail!("Unknown capture source: {}", other),
        }
    }
}

impl Config {
    /// Load from a config file, with `RECORDER__SECTION__KEY` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("RECORDER").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
