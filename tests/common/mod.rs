//! Shared test fixtures: a scripted smartctl and sample documents.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use smartctl_exporter::device::{Device, Passthrough};
use smartctl_exporter::smartctl::{CommandOutput, CommandRunner, SmartctlClient};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// smartctl stand-in answering from a table of argument vectors
#[derive(Default)]
pub struct FakeRunner {
    responses: Mutex<HashMap<Vec<String>, CommandOutput>>,
    calls: Mutex<Vec<Vec<String>>>,
    delay: Option<Duration>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep inside every invocation, simulating a slow device
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer `args` with `body` and `exit_code`, replacing any earlier answer
    pub fn respond(&self, args: &[&str], exit_code: i32, body: impl Into<Vec<u8>>) {
        let key = args.iter().map(|a| a.to_string()).collect();
        self.responses
            .lock()
            .unwrap()
            .insert(key, CommandOutput::new(body, Some(exit_code)));
    }

    pub fn respond_json(&self, args: &[&str], exit_code: i32, body: &Value) {
        self.respond(args, exit_code, body.to_string());
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of invocations that were running at the same time
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, args: &[String]) -> CommandOutput {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.calls.lock().unwrap().push(args.to_vec());
        let output = self
            .responses
            .lock()
            .unwrap()
            .get(args)
            .cloned()
            .unwrap_or_else(|| CommandOutput::new("unexpected command", Some(1)));

        self.active.fetch_sub(1, Ordering::SeqCst);
        output
    }

    fn program(&self) -> &str {
        "smartctl"
    }
}

pub fn client(runner: &Arc<FakeRunner>) -> SmartctlClient {
    SmartctlClient::new(runner.clone())
}

pub const SCAN: [&str; 2] = ["--scan-open", "--json=c"];

pub fn info_args(device: &str) -> Vec<&str> {
    vec!["-i", "--json=c", device]
}

pub fn passthrough_info_args<'a>(bus: &'a str, id: &'a str) -> Vec<&'a str> {
    vec!["-i", "--json=c", "-d", id, bus]
}

pub fn report_args<'a>(device: &'a str, selector: &'a str) -> Vec<&'a str> {
    vec!["-A", "-H", "-d", selector, "--json=c", device]
}

/// `--scan-open` document from `(name, type, open_error)` triples
pub fn scan_json(entries: &[(&str, &str, &str)]) -> Value {
    let devices: Vec<Value> = entries
        .iter()
        .map(|(name, device_type, open_error)| {
            let mut entry = json!({
                "name": name,
                "info_name": name,
                "type": device_type,
                "protocol": "ATA"
            });
            if !open_error.is_empty() {
                entry["open_error"] = json!(open_error);
            }
            entry
        })
        .collect();

    json!({
        "json_format_version": [1, 0],
        "smartctl": {"version": [7, 3], "exit_status": 0},
        "devices": devices
    })
}

pub fn info_json(model: &str, serial: &str, bytes: u64) -> Value {
    json!({
        "json_format_version": [1, 0],
        "device": {"name": "/dev/sda", "type": "sat", "protocol": "ATA"},
        "model_family": "Samsung based SSDs",
        "model_name": model,
        "serial_number": serial,
        "user_capacity": {"blocks": bytes / 512, "bytes": bytes}
    })
}

pub fn sat_report_json(passed: bool) -> Value {
    json!({
        "json_format_version": [1, 0],
        "smartctl": {"version": [7, 3], "exit_status": 0},
        "device": {"name": "/dev/sda", "info_name": "/dev/sda [SAT]", "type": "sat", "protocol": "ATA"},
        "smart_status": {"passed": passed},
        "ata_smart_attributes": {
            "revision": 1,
            "table": [
                {"id": 5, "name": "Reallocated_Sector_Ct", "value": 100, "worst": 100, "thresh": 10,
                 "raw": {"value": 5, "string": "5"}},
                {"id": 9, "name": "Power_On_Hours", "value": 95, "worst": 95, "thresh": 0,
                 "raw": {"value": 21543, "string": "21543"}},
                {"id": 190, "name": "Airflow_Temperature_Cel", "value": 62, "worst": 45, "thresh": 0,
                 "raw": {"value": 38, "string": "38 (Min/Max 20/55)"}},
                {"id": 240, "name": "Head_Flying_Hours", "value": 100, "worst": 253, "thresh": 0,
                 "raw": {"value": 0, "string": "6771h+17m+12.345s"}}
            ]
        }
    })
}

pub fn nvme_report_json() -> Value {
    json!({
        "json_format_version": [1, 0],
        "device": {"name": "/dev/nvme0", "type": "nvme", "protocol": "NVMe"},
        "smart_status": {"passed": true, "nvme": {"value": 0}},
        "nvme_smart_health_information_log": {
            "critical_warning": 0,
            "temperature": 36,
            "available_spare": 100,
            "available_spare_threshold": 10,
            "percentage_used": 3,
            "data_units_read": 12345678,
            "data_units_written": 23456789,
            "power_on_hours": 4321,
            "unsafe_shutdowns": 17,
            "media_errors": 0,
            "num_err_log_entries": 2,
            "temperature_sensors": [36, 41]
        }
    })
}

pub fn scsi_report_json(passed: bool) -> Value {
    json!({
        "json_format_version": [1, 0],
        "smartctl": {"version": [7, 3], "exit_status": 0},
        "device": {"name": "/dev/sdb", "type": "scsi", "protocol": "SCSI"},
        "smart_status": {"passed": passed},
        "temperature": {"current": 34, "drive_trip": 65},
        "power_on_time": {"hours": 30511, "minutes": 12},
        "scsi_grown_defect_list": 0,
        "scsi_start_stop_cycle_counter": {
            "year_of_manufacture": "2016",
            "specified_cycle_count_over_device_lifetime": 50000,
            "accumulated_start_stop_cycles": 212
        },
        "scsi_error_counter_log": {
            "read": {"errors_corrected_by_eccfast": 0, "total_uncorrected_errors": 0}
        }
    })
}

pub fn plain_device(name: &str, device_type: &str) -> Device {
    Device {
        name: name.to_string(),
        device_type: device_type.to_string(),
        model_family: "Samsung based SSDs".to_string(),
        model_name: "Samsung SSD 860 EVO 500GB".to_string(),
        serial_number: "S3Z1NB0K123456".to_string(),
        user_capacity: "500107862016".to_string(),
        passthrough: None,
    }
}

pub fn megaraid_device(bus: &str, id: &str, device_type: &str) -> Device {
    Device {
        name: format!("{}_{}", bus, id),
        device_type: device_type.to_string(),
        model_family: String::new(),
        model_name: "ST4000NM0023".to_string(),
        serial_number: "Z1Z0ABCD".to_string(),
        user_capacity: "4000787030016".to_string(),
        passthrough: Some(Passthrough {
            bus_device: bus.to_string(),
            megaraid_id: id.to_string(),
        }),
    }
}
