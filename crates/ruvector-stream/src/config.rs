//! Configuration for streaming ingestion

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Streaming ingestion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Target chunk size in characters (used by the bundled loader)
    pub chunk_size: usize,
    /// Process memory ceiling in MB
    pub max_memory_mb: u64,
    /// Token budget for a single stream
    pub token_limit: usize,
    /// Fraction of `token_limit` after which warnings are emitted
    pub token_warning_threshold: f64,
    /// Maximum number of results held between admission and drain
    pub max_buffer_size: usize,
    /// Memory ratio above which admission pauses
    pub pause_threshold: f64,
    /// Memory ratio below which admission may resume
    pub resume_threshold: f64,
    /// Relief check interval in milliseconds
    pub check_interval_ms: u64,
    /// Characters per estimated token
    pub chars_per_token: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            max_memory_mb: 512,
            token_limit: 100_000,
            token_warning_threshold: 0.8,
            max_buffer_size: 100,
            pause_threshold: 0.85,
            resume_threshold: 0.7,
            check_interval_ms: 1000,
            chars_per_token: 4,
        }
    }
}

impl StreamingConfig {
    /// Build the configuration bundled with a named preset
    pub fn preset(preset: StreamingPreset) -> Self {
        match preset {
            StreamingPreset::Light => Self {
                chunk_size: 500,
                max_memory_mb: 256,
                token_limit: 50_000,
                token_warning_threshold: 0.8,
                max_buffer_size: 50,
                pause_threshold: 0.8,
                resume_threshold: 0.6,
                check_interval_ms: 500,
                chars_per_token: 4,
            },
            StreamingPreset::Standard => Self::default(),
            StreamingPreset::Heavy => Self {
                chunk_size: 2000,
                max_memory_mb: 2048,
                token_limit: 500_000,
                token_warning_threshold: 0.9,
                max_buffer_size: 500,
                pause_threshold: 0.9,
                resume_threshold: 0.75,
                check_interval_ms: 2000,
                chars_per_token: 4,
            },
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Check value ranges and the pause/resume hysteresis band
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::config("chunk_size must be greater than 0"));
        }
        if self.max_memory_mb == 0 {
            return Err(Error::config("max_memory_mb must be greater than 0"));
        }
        if self.token_limit == 0 {
            return Err(Error::config("token_limit must be greater than 0"));
        }
        if self.max_buffer_size == 0 {
            return Err(Error::config("max_buffer_size must be greater than 0"));
        }
        if self.check_interval_ms == 0 {
            return Err(Error::config("check_interval_ms must be greater than 0"));
        }
        if self.chars_per_token == 0 {
            return Err(Error::config("chars_per_token must be greater than 0"));
        }
        for (name, value) in [
            ("token_warning_threshold", self.token_warning_threshold),
            ("pause_threshold", self.pause_threshold),
            ("resume_threshold", self.resume_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::config(format!(
                    "{} must be within (0, 1], got {}",
                    name, value
                )));
            }
        }
        self.backpressure().validate()
    }

    /// Relief check interval
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Token count above which the stream starts warning
    pub fn token_warning_level(&self) -> f64 {
        self.token_limit as f64 * self.token_warning_threshold
    }

    /// Controller settings derived from this config
    pub fn backpressure(&self) -> BackpressureConfig {
        BackpressureConfig {
            max_buffer_size: self.max_buffer_size,
            pause_threshold: self.pause_threshold,
            resume_threshold: self.resume_threshold,
            check_interval: self.check_interval(),
        }
    }
}

/// Settings consumed by `BackpressureController`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackpressureConfig {
    /// Buffer length at which admission pauses
    pub max_buffer_size: usize,
    /// Memory ratio above which admission pauses
    pub pause_threshold: f64,
    /// Memory ratio below which admission may resume
    pub resume_threshold: f64,
    /// How often a paused controller re-checks the resume condition
    pub check_interval: Duration,
}

impl BackpressureConfig {
    /// Check the buffer bound, the relief interval and the hysteresis band
    pub fn validate(&self) -> Result<()> {
        if self.max_buffer_size == 0 {
            return Err(Error::config("max_buffer_size must be greater than 0"));
        }
        if self.check_interval.is_zero() {
            return Err(Error::config("check_interval must be non-zero"));
        }
        for (name, value) in [
            ("pause_threshold", self.pause_threshold),
            ("resume_threshold", self.resume_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::config(format!(
                    "{} must be within (0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.pause_threshold <= self.resume_threshold {
            return Err(Error::config(format!(
                "pause_threshold ({}) must be greater than resume_threshold ({})",
                self.pause_threshold, self.resume_threshold
            )));
        }
        Ok(())
    }
}

impl Default for BackpressureConfig {
    fn default() -> Self {
        StreamingConfig::default().backpressure()
    }
}

/// Named configuration bundles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamingPreset {
    /// Small buffers and a low memory ceiling
    Light,
    /// The defaults
    #[default]
    Standard,
    /// Large buffers for big ingestion hosts
    Heavy,
}

impl FromStr for StreamingPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "standard" => Ok(Self::Standard),
            "heavy" => Ok(Self::Heavy),
            other => Err(Error::config(format!("Unknown streaming preset: {}", other))),
        }
    }
}
