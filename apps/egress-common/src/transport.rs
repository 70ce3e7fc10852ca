use std::fmt;

use async_trait::async_trait;
use ic_core::{ConnectorConfig, PlatformReply};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

/// A single reply call against the Intercom REST API.
#[derive(Clone, PartialEq)]
pub struct ReplyRequest {
    pub method: Method,
    pub url: String,
    pub bearer_token: String,
    pub body: PlatformReply,
}

impl ReplyRequest {
    /// `POST {base}/conversations/{id}/reply` authorized with the app token.
    pub fn post_reply(config: &ConnectorConfig, conversation_id: &str, body: PlatformReply) -> Self {
        Self {
            method: Method::POST,
            url: config.reply_url(conversation_id),
            bearer_token: config.api_token().to_string(),
            body,
        }
    }
}

impl fmt::Debug for ReplyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("bearer_token", &"<redacted>")
            .field("body", &self.body)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("rate limited: {body}")]
    RateLimited { body: String },
    #[error("server error {status}: {body}")]
    Server { status: StatusCode, body: String },
    #[error("client error {status}: {body}")]
    Client { status: StatusCode, body: String },
    #[error("payload serialization failed: {0}")]
    Serialization(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl TransportError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "E_RATE",
            Self::Server { .. } => "E_SERVER",
            Self::Client { .. } => "E_CLIENT",
            Self::Serialization(_) => "E_SERIAL",
            Self::Transport(_) => "E_TRANSPORT",
        }
    }
}

/// Outbound transport capability used by the delivery queue.
///
/// A successful send yields the platform's response body, passed through unmodified.
#[async_trait]
pub trait ReplyTransport: Send + Sync {
    async fn send(&self, request: &ReplyRequest) -> Result<Value, TransportError>;
}
