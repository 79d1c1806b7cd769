//! Device Data Model
//!
//! A [`Device`] is one monitored storage unit as resolved by discovery. Devices
//! are immutable once created and live in a [`DeviceRegistry`] until the next
//! full rediscovery replaces it.

use std::collections::BTreeMap;

/// Registry key → device, ordered so every pass visits devices in the same order
pub type DeviceRegistry = BTreeMap<String, Device>;

/// smartctl `-d` types handled by the ATA attribute table parser
pub const SAT_TYPES: [&str; 4] = ["sat", "usbjmicron", "usbprolific", "usbsunplus"];
/// smartctl `-d` types reporting an NVMe health information log
pub const NVME_TYPES: [&str; 4] = ["nvme", "sntasmedia", "sntjmicron", "sntrealtek"];
/// smartctl `-d` types flattened as SCSI documents
pub const SCSI_TYPES: [&str; 1] = ["scsi"];

/// Extractor a device is dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFamily {
    Sat,
    Nvme,
    Scsi,
    MegaRaid,
}

impl DeviceFamily {
    /// Family for a scan-reported type of a plain device
    pub fn from_type(device_type: &str) -> Option<Self> {
        if SAT_TYPES.contains(&device_type) {
            Some(Self::Sat)
        } else if NVME_TYPES.contains(&device_type) {
            Some(Self::Nvme)
        } else if SCSI_TYPES.contains(&device_type) {
            Some(Self::Scsi)
        } else {
            None
        }
    }

    /// `-d` selector of a plain device in this family
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sat => "sat",
            Self::Nvme => "nvme",
            Self::Scsi => "scsi",
            Self::MegaRaid => "megaraid",
        }
    }
}

/// Addressing of a sub-device behind a RAID controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passthrough {
    /// Controller handle visible on the bus, e.g. `/dev/bus/0`
    pub bus_device: String,
    /// Controller-assigned selector, e.g. `megaraid,3`
    pub megaraid_id: String,
}

/// One monitored storage unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Registry key and `drive` label source
    pub name: String,
    /// Scan type for plain devices; `sat`, `scsi` or `unknown` for pass-through ones
    pub device_type: String,
    pub model_family: String,
    pub model_name: String,
    pub serial_number: String,
    /// Byte count as a decimal string, or `Unknown`
    pub user_capacity: String,
    pub passthrough: Option<Passthrough>,
}

impl Device {
    /// Extractor for this device, `None` when its type is not supported
    pub fn family(&self) -> Option<DeviceFamily> {
        if self.passthrough.is_some() {
            Some(DeviceFamily::MegaRaid)
        } else {
            DeviceFamily::from_type(&self.device_type)
        }
    }

    /// Device handle and `-d` selector for attribute queries.
    ///
    /// Plain devices use their family flag (`sat`, `nvme`, `scsi`) whatever
    /// bridge type the scan reported; pass-through devices use `megaraid,N`
    /// on the bus handle.
    pub fn query_target(&self) -> (&str, &str) {
        match (&self.passthrough, self.family()) {
            (Some(p), _) => (&p.bus_device, &p.megaraid_id),
            (None, Some(family)) => (&self.name, family.as_str()),
            (None, None) => (&self.name, &self.device_type),
        }
    }
}
