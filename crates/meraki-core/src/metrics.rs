// ── Prometheus metric registry ──
//
// One registry per exporter instance, owned here and shared with the scrape
// endpoint. The prometheus types synchronize internally, so the collector
// writes and the scrape handler reads without extra locking.

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Gauge, GaugeVec, IntGaugeVec, Opts, Registry, TextEncoder};
use tracing::warn;

use crate::convert::{DEVICE_LABEL_NAMES, DeviceHealth, DeviceLabels, UPLINK_LABEL_NAMES, UplinkLabels};

pub const DEVICE_STATUS: &str = "meraki_device_status";
pub const UPLINK_LOSS: &str = "meraki_device_uplink_loss";
pub const UPLINK_LATENCY: &str = "meraki_device_uplink_latency";
pub const PROCESSING_SECONDS: &str = "request_processing_seconds";

/// Content type matching [`ExporterMetrics::encode`].
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Metric families published by the exporter.
#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Registry,
    device_status: IntGaugeVec,
    uplink_loss: GaugeVec,
    uplink_latency: GaugeVec,
    processing_seconds: Gauge,
}

impl ExporterMetrics {
    /// Create the metric families and register them on a fresh registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let device_status = IntGaugeVec::new(
            Opts::new(
                DEVICE_STATUS,
                "Device status (0 - dormant, 1 - online, 2 - alerting, 3 - offline, -1 - unknown)",
            ),
            &DEVICE_LABEL_NAMES,
        )?;
        let uplink_loss = GaugeVec::new(
            Opts::new(UPLINK_LOSS, "Uplink packet loss in percentage"),
            &UPLINK_LABEL_NAMES,
        )?;
        let uplink_latency = GaugeVec::new(
            Opts::new(UPLINK_LATENCY, "Uplink latency in milliseconds"),
            &UPLINK_LABEL_NAMES,
        )?;
        let processing_seconds = Gauge::with_opts(Opts::new(
            PROCESSING_SECONDS,
            "Total processing time for metrics collection",
        ))?;

        registry.register(Box::new(device_status.clone()))?;
        registry.register(Box::new(uplink_loss.clone()))?;
        registry.register(Box::new(uplink_latency.clone()))?;
        registry.register(Box::new(processing_seconds.clone()))?;

        Ok(Self {
            registry,
            device_status,
            uplink_loss,
            uplink_latency,
            processing_seconds,
        })
    }

    /// Overwrite the status sample for one device identity.
    pub fn set_device_status(&self, labels: &DeviceLabels, health: DeviceHealth) {
        match self.device_status.get_metric_with_label_values(&labels.values()) {
            Ok(gauge) => gauge.set(health.code()),
            Err(e) => warn!(error = %e, serial = %labels.serial, "device status sample rejected"),
        }
    }

    /// Overwrite the loss and latency samples for one uplink identity.
    pub fn set_uplink(&self, labels: &UplinkLabels, loss_percent: f64, latency_ms: f64) {
        let values = labels.values();
        let loss = self.uplink_loss.get_metric_with_label_values(&values);
        let latency = self.uplink_latency.get_metric_with_label_values(&values);
        match (loss, latency) {
            (Ok(loss), Ok(latency)) => {
                loss.set(loss_percent);
                latency.set(latency_ms);
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, serial = %labels.serial, uplink = %labels.uplink, "uplink sample rejected");
            }
        }
    }

    pub fn set_processing_seconds(&self, seconds: f64) {
        self.processing_seconds.set(seconds);
    }

    pub fn processing_seconds(&self) -> f64 {
        self.processing_seconds.get()
    }

    /// Snapshot every registered family.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
