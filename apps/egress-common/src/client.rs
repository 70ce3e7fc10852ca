use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::transport::{ReplyRequest, ReplyTransport, TransportError};

const USER_AGENT: &str = concat!("ic-egress/", env!("CARGO_PKG_VERSION"));

/// Reply transport backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpReplyTransport {
    http: reqwest::Client,
}

impl HttpReplyTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ReplyTransport for HttpReplyTransport {
    async fn send(&self, request: &ReplyRequest) -> Result<Value, TransportError> {
        tracing::debug!(
            url = %request.url,
            message_type = request.body.message_type(),
            "sending intercom reply"
        );
        let res = self
            .http
            .request(request.method.clone(), &request.url)
            .bearer_auth(&request.bearer_token)
            .json(&request.body)
            .send()
            .await
            .map_err(|err| {
                if err.is_builder() {
                    TransportError::Serialization(err.to_string())
                } else {
                    TransportError::Transport(err.to_string())
                }
            })?;

        classify_response(res).await
    }
}

async fn classify_response(res: reqwest::Response) -> Result<Value, TransportError> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|err| TransportError::Transport(err.to_string()))?;

    if status.is_success() {
        return Ok(response_value(body));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(TransportError::RateLimited { body });
    }

    if status.is_server_error() {
        return Err(TransportError::Server { status, body });
    }

    Err(TransportError::Client { status, body })
}

// JSON bodies are decoded; anything else is kept as text.
fn response_value(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}
