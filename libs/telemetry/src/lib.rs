//! Lightweight helpers for connector telemetry.
//! Provides subscriber installation, span utilities, metric recorders, and message-context
//! helpers shared by the ingress and egress sides.

mod config;
mod context;
mod recorders;
mod tracing_init;

pub use config::TelemetryConfig;
pub use context::{MessageContext, TelemetryLabels};
pub use recorders::{record_counter, record_histogram, with_common_fields};
pub use tracing_init::{init_telemetry, telemetry_installed};

/// Installs the shared subscriber for a service, configured from the environment.
pub fn install(service_name: &str, service_version: &str) -> anyhow::Result<()> {
    init_telemetry(TelemetryConfig::from_env(service_name, service_version))
}
