use ic_core::{OutboundEnvelope, PlatformReply};

use crate::telemetry::translate_with_span;

/// Maps an outbound envelope onto the Intercom reply payload authored by `admin_id`.
///
/// Precedence, first match wins:
/// 1. a handover request becomes an assignment to the target;
/// 2. an image, video or file attachment becomes a comment carrying only the attachment URL;
/// 3. any other attachment kind (templates included) has no Intercom representation;
/// 4. non-empty text becomes a plain comment;
/// 5. everything else yields `None` and must be skipped by the caller.
///
/// ```
/// use ic_core::{OutboundEnvelope, PlatformReply};
/// use ic_translator::translate;
///
/// assert_eq!(
///     translate(&OutboundEnvelope::handover("2"), "1"),
///     Some(PlatformReply::assignment("1", "2"))
/// );
/// assert_eq!(translate(&OutboundEnvelope::text(""), "1"), None);
/// ```
pub fn translate(envelope: &OutboundEnvelope, admin_id: &str) -> Option<PlatformReply> {
    match envelope {
        OutboundEnvelope::HandoverRequest { target_id } => {
            Some(PlatformReply::assignment(admin_id, target_id.as_str()))
        }
        OutboundEnvelope::Attachment { kind, url } if kind.is_media() => {
            Some(PlatformReply::attachments(admin_id, vec![url.clone()]))
        }
        OutboundEnvelope::Attachment { .. } => None,
        OutboundEnvelope::Text { body } if !body.is_empty() => {
            Some(PlatformReply::comment(admin_id, body.as_str()))
        }
        OutboundEnvelope::Text { .. } => None,
    }
}

/// [`translate`] wrapped in a `translate.run` span with translated/untranslatable counters.
pub fn to_intercom_reply(
    envelope: &OutboundEnvelope,
    admin_id: &str,
    conversation_id: &str,
) -> Option<PlatformReply> {
    translate_with_span(conversation_id, envelope.kind(), || {
        translate(envelope, admin_id)
    })
}
