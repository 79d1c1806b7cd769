//! smartctl Process Runner
//!
//! Invokes the smartctl executable and classifies its exit status.
//!
//! smartctl reports SMART health conditions through bits of its exit code while
//! still printing a well-formed document, so a non-zero exit is domain data and
//! not necessarily a failure. [`classify`] keeps the accepted code set in one place.
//!
//! # Exit Codes
//!
//! | Code          | Class              |
//! |---------------|--------------------|
//! | 0, 2, 4, 6    | [`ExitClass::Usable`] |
//! | anything else | [`ExitClass::Fatal`]  |
//! | none (signal, spawn failure, timeout) | [`ExitClass::Fatal`] |

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Exit codes whose output must still be parsed
pub const USABLE_EXIT_CODES: [i32; 4] = [0, 2, 4, 6];

/// Classification of a smartctl exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    /// Output is well-formed and must be parsed
    Usable,
    /// Output is unusable for this invocation
    Fatal,
}

/// Classify an exit code. `None` means the process never produced one.
pub fn classify(exit_code: Option<i32>) -> ExitClass {
    match exit_code {
        Some(code) if USABLE_EXIT_CODES.contains(&code) => ExitClass::Usable,
        _ => ExitClass::Fatal,
    }
}

/// Captured result of one invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// stdout followed by stderr
    pub raw: Vec<u8>,
    pub exit_code: Option<i32>,
    pub class: ExitClass,
}

impl CommandOutput {
    pub fn new(raw: impl Into<Vec<u8>>, exit_code: Option<i32>) -> Self {
        Self {
            raw: raw.into(),
            exit_code,
            class: classify(exit_code),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.class == ExitClass::Usable
    }

    /// Lossy text form for log lines
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.raw).trim_end().to_string()
    }

    /// Deserialize the first JSON document in the output.
    ///
    /// Anything after the document (merged stderr) is ignored.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        let mut stream = serde_json::Deserializer::from_slice(&self.raw).into_iter::<T>();
        match stream.next() {
            Some(result) => result,
            None => serde_json::from_slice(&self.raw),
        }
    }
}

/// Seam to the external diagnostic process
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the tool with `args`. Never fails: spawn errors and timeouts are
    /// reported as a [`ExitClass::Fatal`] output.
    async fn run(&self, args: &[String]) -> CommandOutput;

    /// Program name used in log lines
    fn program(&self) -> &str;
}

/// Runs the real smartctl binary
pub struct SmartctlRunner {
    binary: String,
    timeout: Option<Duration>,
}

impl SmartctlRunner {
    pub fn new(binary: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

#[async_trait]
impl CommandRunner for SmartctlRunner {
    async fn run(&self, args: &[String]) -> CommandOutput {
        debug!("Running {} {}", self.binary, args.join(" "));

        let mut command = Command::new(&self.binary);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);
        let child = command.output();

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child).await {
                Ok(result) => result,
                Err(_) => {
                    return CommandOutput::new(
                        format!("timed out after {}s", limit.as_secs()),
                        None,
                    )
                }
            },
            None => child.await,
        };

        match result {
            Ok(output) => {
                let mut raw = output.stdout;
                raw.extend_from_slice(&output.stderr);
                CommandOutput::new(raw, output.status.code())
            }
            Err(e) => CommandOutput::new(format!("failed to spawn: {}", e), None),
        }
    }

    fn program(&self) -> &str {
        &self.binary
    }
}
