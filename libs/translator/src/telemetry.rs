use ic_telemetry::{MessageContext, TelemetryLabels, record_counter, with_common_fields};

const TRANSLATE_SPAN_NAME: &str = "translate.run";
const TRANSLATED_COUNTER: &str = "messages_translated";
const UNTRANSLATABLE_COUNTER: &str = "messages_untranslatable";

pub const PLATFORM: &str = "intercom";

pub fn translate_with_span<T, F>(conversation_id: &str, envelope_kind: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Option<T>,
{
    let ctx = MessageContext::new(
        TelemetryLabels::new(PLATFORM)
            .with_conversation(conversation_id)
            .with_kind(envelope_kind),
    );
    let span = tracing::info_span!(
        TRANSLATE_SPAN_NAME,
        platform = tracing::field::Empty,
        conversation_id = tracing::field::Empty,
        envelope = %envelope_kind
    );
    with_common_fields(
        &span,
        &ctx.labels.platform,
        ctx.labels.conversation_id.as_deref(),
    );
    let _guard = span.enter();
    let result = f();
    if result.is_some() {
        record_counter(TRANSLATED_COUNTER, 1, &ctx.labels);
    } else {
        tracing::debug!("envelope has no intercom representation; skipping");
        record_counter(UNTRANSLATABLE_COUNTER, 1, &ctx.labels);
    }
    result
}
