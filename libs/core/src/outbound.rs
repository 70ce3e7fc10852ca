use serde::{Deserialize, Serialize};

/// Generic outbound envelope produced by the bot processor before platform-specific translation.
///
/// ```
/// use ic_core::{AttachmentKind, OutboundEnvelope};
///
/// let env: OutboundEnvelope = serde_json::from_value(serde_json::json!({
///     "type": "attachment",
///     "kind": "image",
///     "url": "https://example.com/cat.png"
/// }))
/// .unwrap();
/// assert_eq!(env, OutboundEnvelope::attachment(AttachmentKind::Image, "https://example.com/cat.png"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEnvelope {
    Text { body: String },
    Attachment { kind: AttachmentKind, url: String },
    HandoverRequest { target_id: String },
}

impl OutboundEnvelope {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text { body: body.into() }
    }

    pub fn attachment(kind: AttachmentKind, url: impl Into<String>) -> Self {
        Self::Attachment {
            kind,
            url: url.into(),
        }
    }

    pub fn handover(target_id: impl Into<String>) -> Self {
        Self::HandoverRequest {
            target_id: target_id.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Attachment { .. } => "attachment",
            Self::HandoverRequest { .. } => "handover_request",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
    File,
    Template,
    #[serde(other)]
    Other,
}

impl AttachmentKind {
    /// Whether Intercom can carry this attachment as a plain attachment URL.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::File)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
            Self::Template => "template",
            Self::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_processor_json() {
        let envs: Vec<OutboundEnvelope> = serde_json::from_value(json!([
            { "type": "text", "body": "hello" },
            { "type": "handover_request", "target_id": "42" },
            { "type": "attachment", "kind": "carousel", "url": "x" }
        ]))
        .unwrap();
        assert_eq!(
            envs,
            vec![
                OutboundEnvelope::text("hello"),
                OutboundEnvelope::handover("42"),
                OutboundEnvelope::attachment(AttachmentKind::Other, "x"),
            ]
        );
    }

    #[test]
    fn only_image_video_file_are_media() {
        assert!(AttachmentKind::Image.is_media());
        assert!(AttachmentKind::Video.is_media());
        assert!(AttachmentKind::File.is_media());
        assert!(!AttachmentKind::Template.is_media());
        assert!(!AttachmentKind::Other.is_media());
    }
}
