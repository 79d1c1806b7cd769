//! smartctl Prometheus Exporter
//!
//! Polls `smartctl` on a fixed interval, flattens its JSON output into numeric
//! attributes per storage device and exposes them as labeled gauges.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  argv / --json=c   ┌───────────────────────────┐
//! │ smartctl │ ◄────────────────► │         Exporter          │
//! └──────────┘  exit code + JSON  │                           │
//!                                 │  ┌─────────┐ ┌─────────┐  │     HTTP      ┌────────────┐
//!                                 │  │Discovery│ │Extractor│  │ ◄───────────► │ Prometheus │
//!                                 │  └─────────┘ └─────────┘  │   /metrics    └────────────┘
//!                                 │  ┌─────────────────────┐  │
//!                                 │  │  Metrics registry   │  │
//!                                 │  └─────────────────────┘  │
//!                                 └───────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`smartctl`] - process runner, query client and JSON types
//! - [`device`] - device model and family dispatch table
//! - [`discovery`] - device discovery from `--scan-open`
//! - [`collectors`] - per-family attribute extractors and the flattener
//! - [`metrics`] - Prometheus registry and metric name sanitizing
//! - [`server`] - HTTP server and collection cycle
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use smartctl_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Supported Devices
//!
//! - ATA / SATA and USB bridges (`sat`, `usbjmicron`, `usbprolific`, `usbsunplus`)
//! - NVMe and NVMe bridges (`nvme`, `sntasmedia`, `sntjmicron`, `sntrealtek`)
//! - SCSI / SAS (`scsi`)
//! - Disks behind MegaRAID controllers (`megaraid,N`, `sat+megaraid,N`)

pub mod collectors;
pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod metrics;
pub mod server;
pub mod smartctl;
