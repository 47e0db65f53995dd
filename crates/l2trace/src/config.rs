//! Run configuration
//!
//! Loaded from an optional YAML file; command-line flags override it.

use l2trace_device::{defaults, Credentials, ParserConfig, SessionSettings};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{TraceError, TraceResult};

/// Settings shared by every hop of a trace.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    /// SSH port of every switch
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Per-session timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Multiplier applied to the one-second pause before each command
    #[serde(default = "default_delay_factor")]
    pub delay_factor: f64,

    /// Directory of parser templates that override the built-in ones
    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_ssh_port() -> u16 {
    defaults::SSH_PORT
}

fn default_timeout_secs() -> u64 {
    defaults::TIMEOUT.as_secs()
}

fn default_delay_factor() -> f64 {
    defaults::DELAY_FACTOR
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            ssh_port: default_ssh_port(),
            timeout_secs: default_timeout_secs(),
            delay_factor: default_delay_factor(),
            template_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl TraceConfig {
    /// Loads configuration from a YAML file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> TraceResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TraceError::invalid_config(
                path.display().to_string(),
                format!("failed to read config file: {}", e),
            )
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            TraceError::InvalidConfig { message, .. } => {
                TraceError::invalid_config(path.display().to_string(), message)
            }
            other => other,
        })
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml(content: &str) -> TraceResult<Self> {
        // An empty document is an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| {
            TraceError::invalid_config("config", format!("failed to parse config: {}", e))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates configuration.
    pub fn validate(&self) -> TraceResult<()> {
        if self.ssh_port == 0 {
            return Err(TraceError::invalid_config("ssh_port", "must be > 0"));
        }

        if self.timeout_secs == 0 {
            return Err(TraceError::invalid_config("timeout_secs", "must be > 0"));
        }

        if !self.delay_factor.is_finite() || self.delay_factor < 0.0 {
            return Err(TraceError::invalid_config(
                "delay_factor",
                format!("must be a non-negative number, got {}", self.delay_factor),
            ));
        }

        Ok(())
    }

    /// Session settings for every hop of the trace.
    pub fn session_settings(&self, credentials: Credentials) -> SessionSettings {
        SessionSettings::new(credentials)
            .with_port(self.ssh_port)
            .with_timeout(self.timeout())
            .with_delay_factor(self.delay_factor)
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            template_dir: self.template_dir.clone(),
        }
    }
}
