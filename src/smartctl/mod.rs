pub mod client;
pub mod runner;
pub mod types;

pub use client::SmartctlClient;
pub use runner::{classify, CommandOutput, CommandRunner, ExitClass, SmartctlRunner};
