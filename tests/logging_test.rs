//! Log output tests
//!
//! A failing smartctl call must produce exactly one warning.

mod common;

use common::*;
use smartctl_exporter::collectors::{collect_device_metrics, CollectionContext, CollectionStatus};
use smartctl_exporter::discovery::discover;
use smartctl_exporter::metrics::MetricsCollector;
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn warnings(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .filter(|line| line.contains("WARN"))
            .map(str::to_string)
            .collect()
    }
}

fn capture_logs() -> (Capture, tracing::subscriber::DefaultGuard) {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}

#[tokio::test]
async fn test_fatal_report_logs_one_warning() {
    // Given: A device whose report query exits fatally
    let (capture, _guard) = capture_logs();
    let runner = Arc::new(FakeRunner::new());
    runner.respond(&report_args("/dev/sda", "sat"), 1, "garbage");
    let client = client(&runner);
    let metrics = MetricsCollector::new().unwrap();
    let ctx = CollectionContext {
        client: &client,
        metrics: &metrics,
    };

    // When: Collecting it
    let status = collect_device_metrics(&ctx, &plain_device("/dev/sda", "sat")).await;

    // Then: Only the command line warning is emitted
    assert_eq!(status, CollectionStatus::Failed);
    let warnings = capture.warnings();
    assert_eq!(warnings.len(), 1, "warnings: {:?}", warnings);
    assert!(warnings[0].contains("returned exit code Some(1)"));
}

#[tokio::test]
async fn test_failed_info_query_logs_one_warning() {
    let (capture, _guard) = capture_logs();
    let runner = Arc::new(FakeRunner::new());
    runner.respond_json(&SCAN, 0, &scan_json(&[("/dev/sda", "sat", "")]));
    runner.respond(&info_args("/dev/sda"), 1, "No such device");

    let devices = discover(&client(&runner)).await;

    assert!(devices.is_empty());
    assert_eq!(capture.warnings().len(), 1);
}

#[tokio::test]
async fn test_unknown_raid_protocol_still_warns() {
    let (capture, _guard) = capture_logs();
    let runner = Arc::new(FakeRunner::new());
    runner.respond_json(
        &report_args("/dev/bus/0", "megaraid,4"),
        0,
        &serde_json::json!({"device": {"protocol": "NVMe"}}),
    );
    let client = client(&runner);
    let metrics = MetricsCollector::new().unwrap();
    let ctx = CollectionContext {
        client: &client,
        metrics: &metrics,
    };

    let status =
        collect_device_metrics(&ctx, &megaraid_device("/dev/bus/0", "megaraid,4", "unknown")).await;

    assert_eq!(status, CollectionStatus::Failed);
    let warnings = capture.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Unsupported device protocol: NVMe"));
}
