use std::sync::Arc;

use ic_core::{
    CONVERSATION_ITEM_TYPE, CanonicalInboundMessage, ConnectorConfig, ContextExtras,
    WebhookNotification,
};
use ic_egress_common::{
    DeliveryLogger, DeliveryQueue, ReplyTransport, TracingDeliveryLogger, TurnError, TurnReport,
};
use ic_translator::{IgnoreReason, Normalized, normalize};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{Instrument, debug, info_span, warn};

use crate::processor::{BotProcessor, ReplySender};
use crate::telemetry::{record_ignored, record_received, record_turn_failed};

#[derive(Debug)]
pub enum TurnOutcome {
    /// The event produced no canonical message; the processor was not called.
    Ignored(IgnoreReason),
    Delivered(TurnReport),
}

impl TurnOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("webhook payload is not a conversation notification: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("bot processor failed for conversation {conversation_id}")]
    Processor {
        conversation_id: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Delivery(#[from] TurnError),
}

/// Connects a [`BotProcessor`] to Intercom conversations.
///
/// Configuration is fixed at construction and shared read-only by every turn; turns for
/// different conversations may run concurrently.
pub struct Connector<P> {
    processor: P,
    config: Arc<ConnectorConfig>,
    transport: Arc<dyn ReplyTransport>,
    logger: Arc<dyn DeliveryLogger>,
}

impl<P: BotProcessor> Connector<P> {
    pub fn new(processor: P, config: ConnectorConfig, transport: Arc<dyn ReplyTransport>) -> Self {
        Self {
            processor,
            config: Arc::new(config),
            transport,
            logger: Arc::new(TracingDeliveryLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn DeliveryLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Handles one webhook notification end to end.
    ///
    /// Resolves once every reply of the turn has settled and was logged.
    pub async fn process_event(&self, payload: &Value) -> Result<TurnOutcome, ConnectorError> {
        // Other item types follow their own schemas; only conversations are decoded.
        if let Some(item_type) = foreign_item_type(payload) {
            debug!(item_type = ?item_type, "ignoring non-conversation item");
            record_ignored(IgnoreReason::NotConversation);
            return Ok(TurnOutcome::Ignored(IgnoreReason::NotConversation));
        }

        let notification = WebhookNotification::deserialize(payload)?;
        let topic = notification.topic.clone();
        let Some(item) = notification.into_item() else {
            debug!(topic = ?topic, "notification carries no item");
            record_ignored(IgnoreReason::NotConversation);
            return Ok(TurnOutcome::Ignored(IgnoreReason::NotConversation));
        };

        match normalize(item, &self.config) {
            Normalized::Ignored(reason) => {
                debug!(topic = ?topic, reason = reason.as_str(), "ignoring intercom event");
                record_ignored(reason);
                Ok(TurnOutcome::Ignored(reason))
            }
            Normalized::Message(turn) => {
                record_received(turn.message.kind());
                let conversation_id = turn.conversation_id().to_string();
                self.run_turn(&conversation_id, &turn.message, &turn.extras)
                    .await
                    .map(TurnOutcome::Delivered)
            }
        }
    }

    /// Runs a turn for the conversation named by `message` without an inbound webhook, e.g. to
    /// send a proactive message. The processor sees empty context extras.
    pub async fn process_message(
        &self,
        message: CanonicalInboundMessage,
    ) -> Result<TurnReport, ConnectorError> {
        record_received(message.kind());
        self.run_turn(
            message.conversation_id(),
            &message,
            &ContextExtras::default(),
        )
        .await
    }

    async fn run_turn(
        &self,
        conversation_id: &str,
        message: &CanonicalInboundMessage,
        extras: &ContextExtras,
    ) -> Result<TurnReport, ConnectorError> {
        let span = info_span!(
            "connector.turn",
            conversation_id = %conversation_id,
            kind = message.kind()
        );
        async move {
            let queue = DeliveryQueue::new(
                self.config.clone(),
                conversation_id,
                self.transport.clone(),
                self.logger.clone(),
            );
            let admin_id = self.config.bot_admin_id();
            let processed = {
                let sender = ReplySender::new(&queue, admin_id);
                let result = self
                    .processor
                    .process(message, admin_id, &sender, extras)
                    .await;
                if let Ok(envelopes) = &result {
                    for envelope in envelopes {
                        sender.send(envelope);
                    }
                }
                result
            };

            // Replies already pushed are delivered even when the processor failed.
            let delivered = queue.finished().await;

            if let Err(source) = processed {
                warn!(error = %source, "bot processor failed");
                record_turn_failed("processor");
                return Err(ConnectorError::Processor {
                    conversation_id: conversation_id.to_string(),
                    source,
                });
            }
            delivered.map_err(|err| {
                warn!(error = %err, "reply delivery incomplete");
                record_turn_failed("delivery");
                ConnectorError::Delivery(err)
            })
        }
        .instrument(span)
        .await
    }
}

/// The `data.item.type` of a notification whose item is not a conversation.
fn foreign_item_type(payload: &Value) -> Option<Option<&str>> {
    let item = payload.pointer("/data/item")?;
    if item.is_null() {
        return None;
    }
    let item_type = item.get("type").and_then(Value::as_str);
    (item_type != Some(CONVERSATION_ITEM_TYPE)).then_some(item_type)
}
