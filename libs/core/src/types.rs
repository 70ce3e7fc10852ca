use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Item type carried by conversation-update webhooks.
pub const CONVERSATION_ITEM_TYPE: &str = "conversation";

/// Part type marking an assignment (handover) inside a conversation thread.
pub const ASSIGNMENT_PART_TYPE: &str = "assignment";

/// Top-level webhook notification as POSTed by Intercom.
///
/// ```
/// use ic_core::WebhookNotification;
///
/// let raw = serde_json::json!({
///     "topic": "conversation.user.replied",
///     "data": { "item": { "type": "conversation", "id": 42 } }
/// });
/// let notification: WebhookNotification = serde_json::from_value(raw).unwrap();
/// let item = notification.into_item().unwrap();
/// assert_eq!(item.conversation_id, "42");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WebhookNotification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub data: Option<NotificationData>,
}

impl WebhookNotification {
    /// Returns the conversation item, if the notification carries one.
    pub fn into_item(self) -> Option<RawConversationEvent> {
        self.data.and_then(|data| data.item)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationData {
    #[serde(default)]
    pub item: Option<RawConversationEvent>,
}

/// Conversation item of a webhook notification.
///
/// Exactly one of `message` / `parts` is authoritative: the thread parts when there are any,
/// the opening message otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawConversationEvent {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(rename = "id", default, deserialize_with = "de_id")]
    pub conversation_id: String,
    #[serde(default)]
    pub assignee: Option<Actor>,
    /// Seconds since epoch.
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(rename = "conversation_message", default)]
    pub message: Option<ConversationMessage>,
    #[serde(rename = "conversation_parts", default)]
    pub parts: Option<ConversationParts>,
    #[serde(default)]
    pub user: Option<Value>,
}

impl RawConversationEvent {
    pub fn is_conversation(&self) -> bool {
        self.item_type == CONVERSATION_ITEM_TYPE
    }

    /// Thread parts in their original order; empty when the webhook carries none.
    pub fn parts(&self) -> &[ConversationPart] {
        self.parts
            .as_ref()
            .map(|parts| parts.items.as_slice())
            .unwrap_or_default()
    }
}

/// Admin, user or bot referenced by a conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            kind: None,
        }
    }

    pub fn is(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Actor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationParts {
    #[serde(rename = "conversation_parts", default)]
    pub items: Vec<ConversationPart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationPart {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub part_type: String,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub author: Option<Actor>,
    #[serde(default)]
    pub assigned_to: Option<Actor>,
}

impl ConversationPart {
    pub fn is_assignment(&self) -> bool {
        self.part_type == ASSIGNMENT_PART_TYPE
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().and_then(|a| a.id.as_deref())
    }

    pub fn assigned_to_id(&self) -> Option<&str> {
        self.assigned_to.as_ref().and_then(|a| a.id.as_deref())
    }
}

/// Normalized inbound message handed to the bot processor.
///
/// ```
/// use ic_core::CanonicalInboundMessage;
///
/// let msg = CanonicalInboundMessage::TextMessage {
///     conversation_id: "7".into(),
///     text: "hi".into(),
///     timestamp_ms: 1_700_000_000_000,
/// };
/// assert_eq!(msg.text(), Some("hi"));
/// assert_eq!(msg.conversation_id(), "7");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanonicalInboundMessage {
    TextMessage {
        conversation_id: String,
        text: String,
        timestamp_ms: i64,
    },
    HandoverSignal {
        conversation_id: String,
        action_name: String,
        timestamp_ms: i64,
    },
}

impl CanonicalInboundMessage {
    pub fn conversation_id(&self) -> &str {
        match self {
            Self::TextMessage {
                conversation_id, ..
            }
            | Self::HandoverSignal {
                conversation_id, ..
            } => conversation_id,
        }
    }

    pub fn timestamp_ms(&self) -> i64 {
        match self {
            Self::TextMessage { timestamp_ms, .. } | Self::HandoverSignal { timestamp_ms, .. } => {
                *timestamp_ms
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::TextMessage { text, .. } => Some(text),
            Self::HandoverSignal { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::TextMessage { .. } => "text",
            Self::HandoverSignal { .. } => "handover",
        }
    }
}

/// Opaque data forwarded to the bot processor next to the canonical message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContextExtras {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
}

/// Canonical message plus the routing metadata needed to answer it.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundTurn {
    pub message: CanonicalInboundMessage,
    pub extras: ContextExtras,
}

impl InboundTurn {
    pub fn conversation_id(&self) -> &str {
        self.message.conversation_id()
    }
}

/// Converts the platform's seconds resolution to milliseconds since epoch.
///
/// ```
/// assert_eq!(ic_core::seconds_to_millis(1_700_000_000), 1_700_000_000_000);
/// ```
pub fn seconds_to_millis(seconds: i64) -> i64 {
    seconds.saturating_mul(1000)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_id(deserializer)?.unwrap_or_default())
}
