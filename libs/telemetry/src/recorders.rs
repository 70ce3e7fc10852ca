use crate::context::TelemetryLabels;
use metrics::Label;
use tracing::Span;

pub fn with_common_fields(span: &Span, platform: &str, conversation_id: Option<&str>) {
    span.record("platform", tracing::field::display(platform));
    if let Some(conversation_id) = conversation_id {
        span.record("conversation_id", tracing::field::display(conversation_id));
    }
}

fn labels_of(labels: &TelemetryLabels) -> Vec<Label> {
    labels
        .tags()
        .into_iter()
        .map(|(key, value)| Label::new(key, value))
        .collect()
}

/// Increments a counter on the globally installed `metrics` recorder (a no-op without one).
pub fn record_counter(name: &'static str, value: u64, labels: &TelemetryLabels) {
    metrics::counter!(name, labels_of(labels)).increment(value);
}

pub fn record_histogram(name: &'static str, value: f64, labels: &TelemetryLabels) {
    metrics::histogram!(name, labels_of(labels)).record(value);
}
