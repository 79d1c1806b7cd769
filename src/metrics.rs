//! Prometheus Metrics
//!
//! This module owns the Prometheus registry of the exporter.
//!
//! # Metric Categories
//!
//! ## SMART attributes
//! One gauge per attribute key, registered the first time the key is seen and
//! kept for the process lifetime. The name is `<namespace>_<key>` after
//! [`sanitize_metric_name`]; the help text is the raw key. Every gauge carries
//! the labels in [`LABEL_NAMES`], and each pass overwrites the value for a
//! device's label set.
//!
//! ## Exporter self-metrics
//! - `<namespace>_exporter_up` - 0 when every device of the last pass failed, else 1
//! - `<namespace>_exporter_devices` - devices in the registry
//! - `<namespace>_exporter_collection_duration_seconds` - duration of the last pass
//! - `<namespace>_exporter_device_errors_total` - failed device extractions
//! - `<namespace>_exporter_collection_lock_contended_total` - passes that had to wait for a running one

use crate::collectors::Attributes;
use crate::device::Device;
use crate::error::Result;
use parking_lot::Mutex;
use prometheus::{Gauge, GaugeVec, IntCounter, IntGauge, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Label schema shared by every SMART attribute gauge
pub const LABEL_NAMES: [&str; 6] = [
    "drive",
    "type",
    "model_family",
    "model_name",
    "serial_number",
    "user_capacity",
];

pub const DEFAULT_NAMESPACE: &str = "smartctl";

/// Metrics collector for smartctl attributes
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,
    namespace: Arc<str>,
    /// Sanitized name → lazily registered gauge
    series: Arc<Mutex<HashMap<String, GaugeVec>>>,

    pub up: Arc<Gauge>,
    pub devices: Arc<IntGauge>,
    pub collection_duration_seconds: Arc<Gauge>,
    pub device_errors_total: Arc<IntCounter>,
    pub collection_lock_contended_total: Arc<IntCounter>,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(namespace: &str) -> Result<Self> {
        let registry = Registry::new();
        let exporter_ns = format!("{}_exporter", namespace);

        let up = Gauge::with_opts(
            Opts::new(
                "up",
                "Whether the last collection pass produced data (0 when every device failed)",
            )
            .namespace(exporter_ns.clone()),
        )?;

        let devices = IntGauge::with_opts(
            Opts::new("devices", "Number of devices found by the last discovery")
                .namespace(exporter_ns.clone()),
        )?;

        let collection_duration_seconds = Gauge::with_opts(
            Opts::new(
                "collection_duration_seconds",
                "Duration of the last collection pass in seconds",
            )
            .namespace(exporter_ns.clone()),
        )?;

        let device_errors_total = IntCounter::with_opts(
            Opts::new(
                "device_errors_total",
                "Device extractions that produced no attributes",
            )
            .namespace(exporter_ns.clone()),
        )?;

        let collection_lock_contended_total = IntCounter::with_opts(
            Opts::new(
                "collection_lock_contended_total",
                "Collection passes that waited for a running pass to finish",
            )
            .namespace(exporter_ns),
        )?;

        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(devices.clone()))?;
        registry.register(Box::new(collection_duration_seconds.clone()))?;
        registry.register(Box::new(device_errors_total.clone()))?;
        registry.register(Box::new(collection_lock_contended_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            namespace: Arc::from(namespace),
            series: Arc::new(Mutex::new(HashMap::new())),
            up: Arc::new(up),
            devices: Arc::new(devices),
            collection_duration_seconds: Arc::new(collection_duration_seconds),
            device_errors_total: Arc::new(device_errors_total),
            collection_lock_contended_total: Arc::new(collection_lock_contended_total),
        })
    }

    /// Set every attribute of `device`, registering gauges for unseen keys.
    ///
    /// Lookup, registration and the first set happen under one lock.
    pub fn publish(&self, device: &Device, attributes: &Attributes) {
        let labels = device_labels(device);
        let labels: [&str; 6] = [
            &labels[0], &labels[1], &labels[2], &labels[3], &labels[4], &labels[5],
        ];

        let mut series = self.series.lock();
        for (key, value) in attributes {
            let name = sanitize_metric_name(&format!("{}_{}", self.namespace, key));

            if !series.contains_key(&name) {
                match self.register_gauge(&name, key) {
                    Ok(gauge) => {
                        debug!("Registered metric {}", name);
                        series.insert(name.clone(), gauge);
                    }
                    Err(e) => {
                        warn!("Failed to register metric {} for key '{}': {}", name, key, e);
                        continue;
                    }
                }
            }

            if let Some(gauge) = series.get(&name) {
                gauge.with_label_values(&labels).set(*value);
            }
        }
    }

    /// Drop every series labelled with `device`
    pub fn forget_device(&self, device: &Device) {
        let labels = device_labels(device);
        let labels: [&str; 6] = [
            &labels[0], &labels[1], &labels[2], &labels[3], &labels[4], &labels[5],
        ];

        let series = self.series.lock();
        for gauge in series.values() {
            // Not every gauge has a series for every device
            let _ = gauge.remove_label_values(&labels);
        }
    }

    /// Number of attribute gauges registered so far
    pub fn series_count(&self) -> usize {
        self.series.lock().len()
    }

    fn register_gauge(&self, name: &str, help: &str) -> prometheus::Result<GaugeVec> {
        let gauge = GaugeVec::new(Opts::new(name, help), &LABEL_NAMES)?;
        self.registry.register(Box::new(gauge.clone()))?;
        Ok(gauge)
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        Ok(encoder.encode_to_string(&metric_families)?)
    }
}

/// Metric name for a namespaced attribute key.
///
/// Lower-cases, maps `-`, space and `/` to `_`, removes `.`, and replaces
/// anything else outside `[a-z0-9_:]` with `_`.
pub fn sanitize_metric_name(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            '-' | ' ' | '/' => Some('_'),
            '.' => None,
            c => Some(c),
        })
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `drive` label value: `,`, space, `/` and `\` become `_`
pub fn sanitize_drive_label(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ',' | ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

/// Label values in [`LABEL_NAMES`] order
pub fn device_labels(device: &Device) -> [String; 6] {
    [
        sanitize_drive_label(&device.name),
        device.device_type.clone(),
        device.model_family.clone(),
        device.model_name.clone(),
        device.serial_number.clone(),
        device.user_capacity.clone(),
    ]
}
