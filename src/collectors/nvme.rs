//! NVMe Attribute Extractor
//!
//! Flattens `nvme_smart_health_information_log`.
//!
//! # Attributes Produced
//! - every numeric field of the health log, e.g. `percentage_used`, `media_errors`
//! - `<key>_sensor<N>` - numeric arrays such as `temperature_sensors`, 1-based
//! - `smart_passed` - overall health (1=passed, 0=failed or not reported)

use super::flatten::{bool_value, flatten};
use super::Attributes;
use crate::device::Device;
use crate::error::Result;
use crate::smartctl::SmartctlClient;
use serde_json::Value;

const HEALTH_LOG: &str = "nvme_smart_health_information_log";

/// Query and parse the NVMe health log for `device`
pub async fn collect_nvme_attributes(
    client: &SmartctlClient,
    device: &Device,
) -> Result<Attributes> {
    let (target, selector) = device.query_target();
    let doc = client.smart_report(target, selector).await?;
    Ok(parse_nvme_report(&doc))
}

/// Attributes from an `-A -H` document of an NVMe device
pub fn parse_nvme_report(doc: &Value) -> Attributes {
    let mut attributes = Attributes::new();
    let log = &doc[HEALTH_LOG];

    flatten("", log, &mut attributes);

    if let Some(fields) = log.as_object() {
        for (key, value) in fields {
            let Some(sensors) = value.as_array() else {
                continue;
            };
            for (i, sensor) in sensors.iter().enumerate() {
                if let Some(v) = sensor.as_f64() {
                    attributes.insert(format!("{}_sensor{}", key, i + 1), v);
                }
            }
        }
    }

    let passed = doc["smart_status"]["passed"].as_bool().unwrap_or(false);
    attributes.insert("smart_passed".to_string(), bool_value(passed));
    attributes
}
