//! smartctl Query Client
//!
//! Builds the argument vectors for every query the exporter issues and turns
//! raw [`CommandOutput`]s into typed results.
//!
//! Every query requests compact JSON (`--json=c`). A [`ExitClass::Fatal`]
//! invocation is logged with its full command line and raw output and returned
//! as [`ExporterError::Command`]; callers treat any `Err` as "no data".
//!
//! # Example
//!
//! ```no_run
//! use smartctl_exporter::smartctl::{SmartctlClient, SmartctlRunner};
//! use std::sync::Arc;
//!
//! # async fn example() -> smartctl_exporter::error::Result<()> {
//! let client = SmartctlClient::new(Arc::new(SmartctlRunner::new("smartctl", None)));
//! let scan = client.scan().await?;
//! for entry in scan.devices {
//!     println!("{} ({})", entry.name, entry.device_type);
//! }
//! # Ok(())
//! # }
//! ```

use super::runner::{CommandOutput, CommandRunner, ExitClass};
use super::types::{DeviceInfo, ScanResult};
use crate::error::{ExporterError, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

const JSON_COMPACT: &str = "--json=c";

/// Client for the smartctl command line tool
#[derive(Clone)]
pub struct SmartctlClient {
    runner: Arc<dyn CommandRunner>,
}

impl SmartctlClient {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// List attached devices (`--scan-open`)
    pub async fn scan(&self) -> Result<ScanResult> {
        self.query_json(&["--scan-open", JSON_COMPACT]).await
    }

    /// Identity of a plain device (`-i`)
    pub async fn device_info(&self, device: &str) -> Result<DeviceInfo> {
        self.query_json(&["-i", JSON_COMPACT, device]).await
    }

    /// Identity of a sub-device behind a RAID controller
    pub async fn passthrough_info(&self, bus_device: &str, selector: &str) -> Result<DeviceInfo> {
        self.query_json(&["-i", JSON_COMPACT, "-d", selector, bus_device])
            .await
    }

    /// Attributes and health (`-A -H`) as an untyped document.
    ///
    /// `selector` is the `-d` argument: the family type for plain devices or
    /// the `megaraid,N` id for pass-through devices.
    pub async fn smart_report(&self, device: &str, selector: &str) -> Result<serde_json::Value> {
        self.query_json(&["-A", "-H", "-d", selector, JSON_COMPACT, device])
            .await
    }

    /// Run a query and deserialize its JSON document
    async fn query_json<T>(&self, args: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let output = self.query(args).await?;
        output.json().map_err(|e| {
            warn!(
                "Failed to parse JSON from '{}': {}",
                self.command_line(args),
                e
            );
            ExporterError::Json(e)
        })
    }

    /// Run a query and reject unusable exit codes
    pub async fn query(&self, args: &[&str]) -> Result<CommandOutput> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let output = self.runner.run(&args).await;

        match output.class {
            ExitClass::Usable => Ok(output),
            ExitClass::Fatal => {
                let command = self.command_line(&args);
                warn!(
                    "Command '{}' returned exit code {:?}. Output: '{}'",
                    command,
                    output.exit_code,
                    output.text()
                );
                Err(ExporterError::Command {
                    command,
                    exit_code: output.exit_code,
                })
            }
        }
    }

    fn command_line<S: AsRef<str>>(&self, args: &[S]) -> String {
        let mut line = self.runner.program().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg.as_ref());
        }
        line
    }
}
