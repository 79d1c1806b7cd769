//! Device Discovery
//!
//! Builds the [`DeviceRegistry`] from `smartctl --scan-open`.
//!
//! 1. Scan entries carrying an `open_error` are dropped.
//! 2. Entries whose type matches `(sat+)?megaraid,N` are RAID pass-through
//!    sub-devices: they are queried through the bus handle with `-d megaraid,N`,
//!    their protocol decides the family and they are keyed `<bus>_<megaraid,N>`.
//! 3. Every other entry is queried with `-i` and keeps its scan type.
//!
//! A failing scan yields an empty registry. A failing follow-up query only
//! drops that one device. Discovery holds no state, so calling it again gives
//! a registry that reflects the current scan only.

use crate::device::{Device, DeviceRegistry, Passthrough};
use crate::smartctl::types::{DeviceInfo, ScanEntry};
use crate::smartctl::SmartctlClient;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

static MEGARAID_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(sat\+)?(megaraid,\d+)").expect("valid megaraid pattern"));

/// Sub-device selector (`megaraid,N`) from a scan type, if it is a pass-through type
pub fn megaraid_id(device_type: &str) -> Option<&str> {
    MEGARAID_TYPE
        .captures(device_type)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Family type string for a pass-through sub-device protocol
pub fn protocol_type(protocol: &str) -> &'static str {
    match protocol {
        "ATA" => "sat",
        "SCSI" => "scsi",
        _ => "unknown",
    }
}

/// Discover all accessible devices
pub async fn discover(client: &SmartctlClient) -> DeviceRegistry {
    let mut devices = DeviceRegistry::new();

    let scan = match client.scan().await {
        Ok(scan) => scan,
        Err(e) => {
            debug!("Error scanning devices: {}", e);
            return devices;
        }
    };

    for entry in scan.devices {
        if !entry.open_error.is_empty() {
            info!(
                "Skipping device {} ({}): {}",
                entry.name, entry.device_type, entry.open_error
            );
            continue;
        }

        let device = match megaraid_id(&entry.device_type) {
            Some(id) => resolve_passthrough(client, &entry, id).await,
            None => resolve_plain(client, &entry).await,
        };

        if let Some(device) = device {
            info!("Discovered device {} with attributes {:?}", device.name, device);
            devices.insert(device.name.clone(), device);
        }
    }

    info!("Discovered {} device(s)", devices.len());
    devices
}

async fn resolve_plain(client: &SmartctlClient, entry: &ScanEntry) -> Option<Device> {
    let info = match client.device_info(&entry.name).await {
        Ok(info) => info,
        Err(e) => {
            debug!("Error getting device info for {}: {}", entry.name, e);
            return None;
        }
    };

    Some(Device {
        name: entry.name.clone(),
        device_type: entry.device_type.clone(),
        model_family: info.model_family.clone(),
        model_name: info.model_name.clone(),
        serial_number: info.serial_number.clone(),
        user_capacity: info.capacity_label(),
        passthrough: None,
    })
}

async fn resolve_passthrough(
    client: &SmartctlClient,
    entry: &ScanEntry,
    megaraid_id: &str,
) -> Option<Device> {
    let info: DeviceInfo = match client.passthrough_info(&entry.name, megaraid_id).await {
        Ok(info) => info,
        Err(e) => {
            debug!(
                "Error getting MegaRAID device info for {} ({}): {}",
                entry.name, megaraid_id, e
            );
            return None;
        }
    };

    Some(Device {
        name: format!("{}_{}", entry.name, megaraid_id),
        device_type: protocol_type(&info.device.protocol).to_string(),
        model_family: info.model_family.clone(),
        model_name: info.preferred_model_name().to_string(),
        serial_number: info.serial_number.clone(),
        user_capacity: info.capacity_label(),
        passthrough: Some(Passthrough {
            bus_device: entry.name.clone(),
            megaraid_id: megaraid_id.to_string(),
        }),
    })
}
