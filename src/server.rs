//! HTTP Server and Collection Cycle
//!
//! This module implements the Prometheus exporter HTTP server and the collection loop.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server exposing `/metrics`, `/health`, and `/` endpoints
//! - **Collection Cycle**: [`CollectionCycle`] owns the device registry and runs one
//!   serialized pass over it per tick
//! - **Rediscovery**: on `SIGHUP` the registry is rebuilt from a fresh scan
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /health` - 200 while the last pass collected something, 503 otherwise
//!
//! # Concurrency
//!
//! One lock guards the device registry for a whole pass, so passes never overlap.
//! A tick arriving while a pass is still running waits for it; ticks missed in
//! the meantime are skipped, not queued. The HTTP path only reads the Prometheus
//! registry and never waits on smartctl.

use crate::collectors::{collect_device_metrics, CollectionContext, CollectionStatus};
use crate::config::Config;
use crate::device::DeviceRegistry;
use crate::discovery::discover;
use crate::metrics::MetricsCollector;
use crate::smartctl::{SmartctlClient, SmartctlRunner};
use anyhow::Context;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

/// Summary of one collection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub devices: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Device registry plus everything needed to collect it
pub struct CollectionCycle {
    client: SmartctlClient,
    metrics: MetricsCollector,
    devices: Mutex<DeviceRegistry>,
}

impl CollectionCycle {
    pub fn new(client: SmartctlClient, metrics: MetricsCollector, devices: DeviceRegistry) -> Self {
        metrics.devices.set(devices.len() as i64);
        Self {
            client,
            metrics,
            devices: Mutex::new(devices),
        }
    }

    /// Run discovery and build a cycle over its result
    pub async fn discover(client: SmartctlClient, metrics: MetricsCollector) -> Self {
        let devices = discover(&client).await;
        Self::new(client, metrics, devices)
    }

    /// One full pass over the registry.
    ///
    /// Waits for a pass that is already running instead of overlapping it.
    pub async fn run_once(&self) -> CycleReport {
        let devices = match self.devices.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                self.metrics.collection_lock_contended_total.inc();
                debug!("Collection pass still running, waiting for it to finish");
                self.devices.lock().await
            }
        };

        let started = Instant::now();
        let ctx = CollectionContext {
            client: &self.client,
            metrics: &self.metrics,
        };

        let mut report = CycleReport {
            devices: devices.len(),
            ..Default::default()
        };

        for device in devices.values() {
            match collect_device_metrics(&ctx, device).await {
                CollectionStatus::Success => report.succeeded += 1,
                CollectionStatus::Failed => {
                    report.failed += 1;
                    self.metrics.device_errors_total.inc();
                }
                CollectionStatus::Skipped => report.skipped += 1,
            }
        }

        let elapsed = started.elapsed();
        self.metrics
            .collection_duration_seconds
            .set(elapsed.as_secs_f64());
        let up = report.succeeded > 0 || report.failed == 0;
        self.metrics.up.set(if up { 1.0 } else { 0.0 });

        debug!(
            devices = report.devices,
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            elapsed_ms = elapsed.as_millis() as u64,
            "Collection pass finished"
        );
        report
    }

    /// Replace the registry with a fresh discovery.
    ///
    /// Series of devices that disappeared or changed identity are removed.
    pub async fn rediscover(&self) -> usize {
        let mut devices = self.devices.lock().await;
        info!("Rediscovering devices");

        let fresh = discover(&self.client).await;
        for (name, old) in devices.iter() {
            if fresh.get(name) != Some(old) {
                self.metrics.forget_device(old);
            }
        }

        self.metrics.devices.set(fresh.len() as i64);
        *devices = fresh;
        devices.len()
    }

    /// Registry keys, in collection order
    pub async fn device_names(&self) -> Vec<String> {
        self.devices.lock().await.keys().cloned().collect()
    }
}

#[derive(Clone)]
struct AppState {
    metrics: MetricsCollector,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let metrics = MetricsCollector::with_namespace(&config.metrics.namespace)?;
    let runner = SmartctlRunner::new(config.smartctl.binary.clone(), config.command_timeout());
    let client = SmartctlClient::new(Arc::new(runner));

    if config.command_timeout().is_none() {
        debug!("No smartctl timeout configured; a hung smartctl stalls collection");
    }

    let cycle = Arc::new(CollectionCycle::discover(client, metrics.clone()).await);

    // Start background metrics collection
    let period = Duration::from_secs(config.metrics.refresh_interval_seconds);
    tokio::spawn(collect_metrics_loop(cycle.clone(), period));

    #[cfg(unix)]
    tokio::spawn(rediscover_on_hangup(cycle.clone()));

    // Build the router
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { metrics });

    // Start the server
    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}/metrics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn collect_metrics_loop(cycle: Arc<CollectionCycle>, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        cycle.run_once().await;
    }
}

#[cfg(unix)]
async fn rediscover_on_hangup(cycle: Arc<CollectionCycle>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            error!("Failed to install SIGHUP handler: {}", e);
            return;
        }
    };

    while hangup.recv().await.is_some() {
        let count = cycle.rediscover().await;
        info!("Rediscovery finished with {} device(s)", count);
    }
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Html(
        r#"<html>
<head><title>smartctl Exporter</title></head>
<body>
<h1>smartctl Prometheus Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(metrics) => metrics.into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.metrics.up.get() > 0.0 {
        (axum::http::StatusCode::OK, "OK")
    } else {
        (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "smartctl collection failing",
        )
    }
}
