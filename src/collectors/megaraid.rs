//! RAID Pass-through Attribute Extractor
//!
//! Sub-devices behind a MegaRAID controller are queried through the bus handle
//! with `-d megaraid,N`. The protocol reported in the document picks the parser:
//! ATA sub-devices use the attribute table, SCSI sub-devices the generic flattener.

use super::sat::parse_sat_report;
use super::scsi::parse_scsi_report;
use super::Attributes;
use crate::device::Device;
use crate::error::{ExporterError, Result};
use crate::smartctl::SmartctlClient;
use serde_json::Value;
use tracing::warn;

/// Query and parse a pass-through sub-device
pub async fn collect_megaraid_attributes(
    client: &SmartctlClient,
    device: &Device,
) -> Result<Attributes> {
    let (target, selector) = device.query_target();
    let doc = client.smart_report(target, selector).await?;
    parse_megaraid_report(&doc).inspect_err(|e| {
        warn!("Cannot read {}: {}", device.name, e);
    })
}

/// Attributes from an `-A -H` document of a pass-through sub-device.
///
/// Fails with [`ExporterError::UnsupportedProtocol`] when the protocol is
/// missing or neither ATA nor SCSI.
pub fn parse_megaraid_report(doc: &Value) -> Result<Attributes> {
    match doc["device"]["protocol"].as_str().unwrap_or_default() {
        "ATA" => parse_sat_report(doc),
        "SCSI" => Ok(parse_scsi_report(doc)),
        other => Err(ExporterError::UnsupportedProtocol(other.to_string())),
    }
}
