//! Attribute Extractors
//!
//! One extractor per device family turns a smartctl `-A -H` document into a flat
//! [`Attributes`] map, which is then published for the device's label set.
//!
//! # Architecture
//!
//! Extractors follow a consistent pattern:
//! - Query smartctl through the [`SmartctlClient`] for the device's target and selector
//! - Parse the document with a pure `parse_*_report` function
//! - Return the attribute map, or an error that the caller turns into "no data"
//!
//! | Family     | Module       | Parsing                                 |
//! |------------|--------------|-----------------------------------------|
//! | ATA / SAT  | [`sat`]      | attribute table + raw values            |
//! | NVMe       | [`nvme`]     | flattened health information log        |
//! | SCSI       | [`scsi`]     | whole document flattened                |
//! | MegaRAID   | [`megaraid`] | ATA or SCSI path by reported protocol   |
//!
//! # Error Handling
//!
//! A failing device is logged and skipped for this pass. Other devices in the
//! same pass are unaffected.

use crate::device::{Device, DeviceFamily};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::smartctl::SmartctlClient;
use std::collections::BTreeMap;
use tracing::debug;

pub mod flatten;
pub mod megaraid;
pub mod nvme;
pub mod sat;
pub mod scsi;

pub use flatten::flatten;
pub use megaraid::{collect_megaraid_attributes, parse_megaraid_report};
pub use nvme::{collect_nvme_attributes, parse_nvme_report};
pub use sat::{collect_sat_attributes, parse_sat_report};
pub use scsi::{collect_scsi_attributes, parse_scsi_report};

/// Attribute key → value for one device and one pass
pub type Attributes = BTreeMap<String, f64>;

/// Shared context passed to the extractors
#[derive(Clone, Copy)]
pub struct CollectionContext<'a> {
    /// smartctl query client
    pub client: &'a SmartctlClient,
    /// Sink for the extracted attributes
    pub metrics: &'a MetricsCollector,
}

/// Outcome of collecting one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Attributes were extracted and published
    Success,
    /// Extraction failed (logged as warning where it arose)
    Failed,
    /// Device type has no extractor
    Skipped,
}

/// Run a query and publish its result.
///
/// - On success: hands the data to `process`, returns `CollectionStatus::Success`
/// - On error: logs at debug, returns `CollectionStatus::Failed`. The
///   warning was already emitted where the error arose.
///
/// # Examples
///
/// ```no_run
/// # use smartctl_exporter::collectors::*;
/// # use smartctl_exporter::device::Device;
/// async fn example(ctx: &CollectionContext<'_>, device: &Device) -> CollectionStatus {
///     collect_with_handler(
///         &device.name,
///         collect_sat_attributes(ctx.client, device),
///         |attributes| ctx.metrics.publish(device, &attributes),
///     )
///     .await
/// }
/// ```
pub async fn collect_with_handler<T, F, P, E>(
    name: &str,
    query_future: F,
    process: P,
) -> CollectionStatus
where
    F: std::future::Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
    P: FnOnce(T),
{
    match query_future.await {
        Ok(data) => {
            process(data);
            debug!("Updated metrics for {}", name);
            CollectionStatus::Success
        }
        Err(e) => {
            debug!("Failed to collect {}: {}", name, e);
            CollectionStatus::Failed
        }
    }
}

/// Run the extractor matching `family`
pub async fn extract_attributes(
    client: &SmartctlClient,
    device: &Device,
    family: DeviceFamily,
) -> Result<Attributes> {
    match family {
        DeviceFamily::Sat => collect_sat_attributes(client, device).await,
        DeviceFamily::Nvme => collect_nvme_attributes(client, device).await,
        DeviceFamily::Scsi => collect_scsi_attributes(client, device).await,
        DeviceFamily::MegaRaid => collect_megaraid_attributes(client, device).await,
    }
}

/// Extract and publish the attributes of one device
pub async fn collect_device_metrics(ctx: &CollectionContext<'_>, device: &Device) -> CollectionStatus {
    let Some(family) = device.family() else {
        debug!(
            "Skipping {}: no extractor for type {}",
            device.name, device.device_type
        );
        return CollectionStatus::Skipped;
    };

    collect_with_handler(
        &device.name,
        extract_attributes(ctx.client, device, family),
        |attributes| ctx.metrics.publish(device, &attributes),
    )
    .await
}
