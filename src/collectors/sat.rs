//! ATA / SAT Attribute Extractor
//!
//! Reads the fixed-shape ATA SMART attribute table.
//!
//! # Attributes Produced
//! - `<name>` - normalized attribute value
//! - `<name>_raw` - leading number of the raw string, when it has one
//! - `smart_passed` - overall health (1=passed, 0=failed or not reported)

use super::flatten::bool_value;
use super::Attributes;
use crate::device::Device;
use crate::error::Result;
use crate::smartctl::types::AtaReport;
use crate::smartctl::SmartctlClient;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Query and parse ATA attributes for `device`
pub async fn collect_sat_attributes(client: &SmartctlClient, device: &Device) -> Result<Attributes> {
    let (target, selector) = device.query_target();
    let doc = client.smart_report(target, selector).await?;
    parse_sat_report(&doc).inspect_err(|e| {
        warn!("Cannot read ATA attributes of {}: {}", device.name, e);
    })
}

/// Attributes from an `-A -H` document of an ATA device
pub fn parse_sat_report(doc: &Value) -> Result<Attributes> {
    let report = AtaReport::deserialize(doc)?;
    let mut attributes = Attributes::new();

    for attr in &report.ata_smart_attributes.table {
        attributes.insert(attr.name.clone(), attr.value);
        if let Some(raw) = parse_raw_value(&attr.raw.string) {
            attributes.insert(format!("{}_raw", attr.name), raw);
        }
    }

    attributes.insert(
        "smart_passed".to_string(),
        bool_value(report.smart_status.passed),
    );
    Ok(attributes)
}

/// Leading whitespace-delimited token of a raw string, if numeric.
///
/// `"38 (Min/Max 20/45)"` gives 38, `"0h+00m"` gives nothing.
pub fn parse_raw_value(raw: &str) -> Option<f64> {
    raw.split_whitespace().next()?.parse().ok()
}
