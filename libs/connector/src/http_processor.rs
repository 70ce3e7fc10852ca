use anyhow::{Context, Result};
use async_trait::async_trait;
use ic_core::{CanonicalInboundMessage, ContextExtras, OutboundEnvelope};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::processor::{BotProcessor, ReplySender};

const USER_AGENT: &str = concat!("ic-connector/", env!("CARGO_PKG_VERSION"));

/// Bot processor living behind an HTTP endpoint.
///
/// Each turn is POSTed as `{routing_id, message, extras}`; the endpoint answers with
/// `{"responses": [...]}` holding the outbound envelopes to deliver.
#[derive(Clone)]
pub struct HttpBotProcessor {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpBotProcessor {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build bot processor http client")?;
        Ok(Self::with_client(client, url, api_key))
    }

    pub fn with_client(client: Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
        }
    }
}

#[derive(Serialize)]
struct ProcessPayload<'a> {
    routing_id: &'a str,
    message: &'a CanonicalInboundMessage,
    extras: &'a ContextExtras,
}

#[derive(Deserialize)]
struct ProcessResponse {
    #[serde(default)]
    responses: Vec<OutboundEnvelope>,
}

#[async_trait]
impl BotProcessor for HttpBotProcessor {
    async fn process(
        &self,
        message: &CanonicalInboundMessage,
        routing_id: &str,
        _sender: &ReplySender<'_>,
        extras: &ContextExtras,
    ) -> Result<Vec<OutboundEnvelope>> {
        let payload = ProcessPayload {
            routing_id,
            message,
            extras,
        };
        let mut req = self.client.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read bot processor response body")?;
        if !status.is_success() {
            anyhow::bail!("bot processor returned {} body={}", status, body);
        }
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let parsed: ProcessResponse =
            serde_json::from_str(&body).context("bot processor response is not valid JSON")?;
        debug!(
            responses = parsed.responses.len(),
            "bot processor answered"
        );
        Ok(parsed.responses)
    }
}
