use serde::{Deserialize, Serialize};

/// Reply payload POSTed to `/conversations/{id}/reply`.
///
/// Replies are always authored by the bot admin; the message type decides whether the reply
/// is a comment or an assignment.
///
/// ```
/// use ic_core::PlatformReply;
///
/// let reply = PlatformReply::comment("admin-1", "hello");
/// assert_eq!(
///     serde_json::to_value(&reply).unwrap(),
///     serde_json::json!({
///         "type": "admin",
///         "admin_id": "admin-1",
///         "message_type": "comment",
///         "body": "hello"
///     })
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformReply {
    #[serde(rename = "type")]
    pub author: ReplyAuthor,
    pub admin_id: String,
    #[serde(flatten)]
    pub message: ReplyMessage,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplyAuthor {
    #[default]
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum ReplyMessage {
    Comment {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attachment_urls: Option<Vec<String>>,
    },
    Assignment {
        assignee_id: String,
    },
}

impl PlatformReply {
    pub fn comment(admin_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self::admin(
            admin_id,
            ReplyMessage::Comment {
                body: Some(body.into()),
                attachment_urls: None,
            },
        )
    }

    pub fn attachments(admin_id: impl Into<String>, urls: Vec<String>) -> Self {
        Self::admin(
            admin_id,
            ReplyMessage::Comment {
                body: None,
                attachment_urls: Some(urls),
            },
        )
    }

    pub fn assignment(admin_id: impl Into<String>, assignee_id: impl Into<String>) -> Self {
        Self::admin(
            admin_id,
            ReplyMessage::Assignment {
                assignee_id: assignee_id.into(),
            },
        )
    }

    fn admin(admin_id: impl Into<String>, message: ReplyMessage) -> Self {
        Self {
            author: ReplyAuthor::Admin,
            admin_id: admin_id.into(),
            message,
        }
    }

    pub fn message_type(&self) -> &'static str {
        match self.message {
            ReplyMessage::Comment { .. } => "comment",
            ReplyMessage::Assignment { .. } => "assignment",
        }
    }
}
