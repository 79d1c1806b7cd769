use crate::error::ExporterError;
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub smartctl: SmartctlConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    /// Prefix for every exported series
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmartctlConfig {
    /// Executable name or path, looked up through `PATH`
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Upper bound for a single smartctl invocation.
    ///
    /// `0` disables the limit: a hung smartctl then stalls the collection
    /// loop until it exits on its own.
    #[serde(default)]
    pub command_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: default_refresh_interval(),
            namespace: default_namespace(),
        }
    }
}

impl Default for SmartctlConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            command_timeout_seconds: 0,
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9809
}

fn default_refresh_interval() -> u64 {
    60
}

fn default_namespace() -> String {
    "smartctl".to_string()
}

fn default_binary() -> String {
    "smartctl".to_string()
}

impl Config {
    /// Load file and environment layers. Call [`Config::validate`] once
    /// command-line overrides are applied.
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SMARTCTL_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.metrics.refresh_interval_seconds == 0 {
            return Err(ExporterError::Config(
                "refresh interval must be at least 1 second".to_string(),
            ));
        }
        if self.metrics.namespace.is_empty() {
            return Err(ExporterError::Config(
                "metric namespace must not be empty".to_string(),
            ));
        }
        if self.smartctl.binary.is_empty() {
            return Err(ExporterError::Config(
                "smartctl binary must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Timeout for one smartctl invocation, `None` when disabled
    pub fn command_timeout(&self) -> Option<std::time::Duration> {
        match self.smartctl.command_timeout_seconds {
            0 => None,
            secs => Some(std::time::Duration::from_secs(secs)),
        }
    }
}
