use ic_telemetry::{
    MessageContext, TelemetryLabels, record_counter, record_histogram, with_common_fields,
};
use tracing::Span;

const PLATFORM: &str = "intercom";
const EGRESS_SEND_SPAN: &str = "egress.send";
const EGRESS_SENT_COUNTER: &str = "delivery_sent";
const EGRESS_FAILED_COUNTER: &str = "delivery_failed";
const EGRESS_LATENCY_HISTOGRAM: &str = "histogram.egress_latency_ms";

pub fn context_for(conversation_id: &str, message_type: &str) -> MessageContext {
    MessageContext::new(
        TelemetryLabels::new(PLATFORM)
            .with_conversation(conversation_id)
            .with_kind(message_type),
    )
}

pub fn start_send_span(ctx: &MessageContext, seq: usize) -> Span {
    let message_type = ctx.labels.kind.clone().unwrap_or_else(|| "unknown".into());
    let span = tracing::info_span!(
        EGRESS_SEND_SPAN,
        platform = tracing::field::Empty,
        conversation_id = tracing::field::Empty,
        message_type = %message_type,
        seq
    );
    with_common_fields(
        &span,
        &ctx.labels.platform,
        ctx.labels.conversation_id.as_deref(),
    );
    span
}

pub fn record_egress_success(ctx: &MessageContext, latency_ms: f64) {
    record_latency(ctx, latency_ms);
    record_counter(EGRESS_SENT_COUNTER, 1, &ctx.labels);
}

pub fn record_egress_failure(ctx: &MessageContext, code: &str, latency_ms: f64) {
    record_latency(ctx, latency_ms);
    let mut labels = ctx.labels.clone();
    labels.extra.push(("code".into(), code.to_string()));
    record_counter(EGRESS_FAILED_COUNTER, 1, &labels);
}

pub fn record_latency(ctx: &MessageContext, latency_ms: f64) {
    record_histogram(EGRESS_LATENCY_HISTOGRAM, latency_ms, &ctx.labels);
}
