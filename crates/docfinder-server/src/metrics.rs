//! Prometheus metrics for the DocFinder server.
//!
//! Counters cover detail outcomes, bookings, notification hand-offs and
//! imports. They are rendered in text format on `/metrics`.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metric names as constants for consistency.
pub mod names {
    pub const DOCTOR_DETAIL_TOTAL: &str = "doctor_detail_total";
    pub const APPOINTMENTS_CREATED_TOTAL: &str = "appointments_created_total";
    pub const APPOINTMENT_CONFLICTS_TOTAL: &str = "appointment_conflicts_total";
    pub const NOTIFICATIONS_ENQUEUED_TOTAL: &str = "notifications_enqueued_total";
    pub const DOCTORS_IMPORTED_TOTAL: &str = "doctors_imported_total";
}

/// Initialize the Prometheus metrics exporter.
///
/// Returns `true` if initialization succeeded, `false` if already initialized
/// or another recorder is installed.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        tracing::debug!("Prometheus metrics already initialized");
        return false;
    }

    // Pull-based: we serve /metrics ourselves
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROMETHEUS_HANDLE.set(handle).is_err() {
                tracing::warn!("Failed to store Prometheus handle (already set)");
                return false;
            }

            tracing::info!("Prometheus metrics initialized");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            false
        }
    }
}

/// Render all metrics in Prometheus text format.
///
/// Returns `None` if metrics were not initialized.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|handle| handle.render())
}

/// `outcome` is `converted` or `sanitized`.
pub fn record_doctor_detail(outcome: &'static str) {
    counter!(names::DOCTOR_DETAIL_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_appointment_created() {
    counter!(names::APPOINTMENTS_CREATED_TOTAL).increment(1);
}

pub fn record_appointment_conflict() {
    counter!(names::APPOINTMENT_CONFLICTS_TOTAL).increment(1);
}

pub fn record_notification_enqueued() {
    counter!(names::NOTIFICATIONS_ENQUEUED_TOTAL).increment(1);
}

pub fn record_doctors_imported(count: u64) {
    counter!(names::DOCTORS_IMPORTED_TOTAL).increment(count);
}
