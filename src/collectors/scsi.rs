//! SCSI Attribute Extractor
//!
//! SCSI log pages differ by vendor, so the whole document is flattened
//! generically after dropping blocks that never carry device metrics.
//!
//! # Attributes Produced
//! - every numeric leaf outside [`NON_METRIC_KEYS`], e.g. `temperature_current`,
//!   `power_on_time_hours`, `scsi_start_stop_cycle_counter_accumulated_start_stop_cycles`
//! - `smart_passed` - overall health, when reported

use super::flatten::{bool_value, flatten};
use super::Attributes;
use crate::device::Device;
use crate::error::Result;
use crate::smartctl::SmartctlClient;
use serde_json::Value;

/// Top-level blocks excluded from flattening.
///
/// The defect list and error counter log are multi-valued per device and
/// would otherwise leak as unrelated single series.
pub const NON_METRIC_KEYS: [&str; 6] = [
    "json_format_version",
    "smartctl",
    "device",
    "smart_status",
    "scsi_grown_defect_list",
    "scsi_error_counter_log",
];

/// Query and flatten the SCSI report for `device`
pub async fn collect_scsi_attributes(
    client: &SmartctlClient,
    device: &Device,
) -> Result<Attributes> {
    let (target, selector) = device.query_target();
    let doc = client.smart_report(target, selector).await?;
    Ok(parse_scsi_report(&doc))
}

/// Attributes from an `-A -H` document of a SCSI device
pub fn parse_scsi_report(doc: &Value) -> Attributes {
    let mut attributes = Attributes::new();

    if let Some(fields) = doc.as_object() {
        for (key, value) in fields {
            if NON_METRIC_KEYS.contains(&key.as_str()) {
                continue;
            }
            flatten(key, value, &mut attributes);
        }
    }

    if let Some(passed) = doc["smart_status"]["passed"].as_bool() {
        attributes.insert("smart_passed".to_string(), bool_value(passed));
    }
    attributes
}
