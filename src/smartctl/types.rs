//! smartctl JSON Type Definitions
//!
//! Typed views over the fixed-shape parts of `smartctl --json=c` output. The
//! families whose shape varies by vendor (SCSI, NVMe, RAID-SCSI) are read as
//! untyped [`serde_json::Value`] trees instead and never get a struct here.
//!
//! # Design Notes
//!
//! - **Serde Defaults**: every field is `#[serde(default)]`; smartctl omits
//!   blocks it could not read and a missing block must not fail the document.
//! - **Partial Types**: only fields the exporter reads are declared.
//!
//! # Commands Covered
//!
//! - `--scan-open` → [`ScanResult`], [`ScanEntry`]
//! - `-i` → [`DeviceInfo`]
//! - `-A -H` (ATA) → [`AtaReport`], [`AtaAttribute`]

use serde::Deserialize;

/// `smartctl --scan-open`
#[derive(Debug, Deserialize, Default)]
pub struct ScanResult {
    #[serde(default)]
    pub devices: Vec<ScanEntry>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScanEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub device_type: String,
    /// Present when the device could not be opened
    #[serde(default)]
    pub open_error: String,
}

/// `smartctl -i`
#[derive(Debug, Deserialize, Default)]
pub struct DeviceInfo {
    #[serde(default)]
    pub model_family: String,
    #[serde(default)]
    pub model_name: String,
    /// Reported instead of (or besides) `model_name` behind SCSI controllers
    #[serde(default)]
    pub scsi_model_name: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub user_capacity: UserCapacity,
    #[serde(default)]
    pub device: DeviceBlock,
}

impl DeviceInfo {
    /// Byte count as a decimal string, or `Unknown` when absent or zero
    pub fn capacity_label(&self) -> String {
        match self.user_capacity.bytes {
            0 => "Unknown".to_string(),
            bytes => bytes.to_string(),
        }
    }

    /// SCSI model name wins over the generic one when both are present
    pub fn preferred_model_name(&self) -> &str {
        if self.scsi_model_name.is_empty() {
            &self.model_name
        } else {
            &self.scsi_model_name
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct UserCapacity {
    #[serde(default)]
    pub bytes: u64,
}

/// The `device` block shared by every smartctl document
#[derive(Debug, Deserialize, Default)]
pub struct DeviceBlock {
    #[serde(default)]
    pub protocol: String,
}

/// `smartctl -A -H` for ATA devices
#[derive(Debug, Deserialize, Default)]
pub struct AtaReport {
    #[serde(default)]
    pub ata_smart_attributes: AtaAttributeTable,
    #[serde(default)]
    pub smart_status: SmartStatus,
}

#[derive(Debug, Deserialize, Default)]
pub struct AtaAttributeTable {
    #[serde(default)]
    pub table: Vec<AtaAttribute>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AtaAttribute {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub raw: AtaRawValue,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AtaRawValue {
    #[serde(default)]
    pub string: String,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct SmartStatus {
    #[serde(default)]
    pub passed: bool,
}
