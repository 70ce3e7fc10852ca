use std::sync::Arc;

use async_trait::async_trait;
use ic_core::{CanonicalInboundMessage, ContextExtras, OutboundEnvelope};
use ic_egress_common::DeliveryQueue;
use ic_translator::to_intercom_reply;

/// The bot runtime answering canonical messages.
///
/// Replies may be pushed through `sender` while processing or returned; returned envelopes
/// are delivered after everything already pushed.
#[async_trait]
pub trait BotProcessor: Send + Sync {
    async fn process(
        &self,
        message: &CanonicalInboundMessage,
        routing_id: &str,
        sender: &ReplySender<'_>,
        extras: &ContextExtras,
    ) -> anyhow::Result<Vec<OutboundEnvelope>>;
}

#[async_trait]
impl<T: BotProcessor + ?Sized> BotProcessor for Arc<T> {
    async fn process(
        &self,
        message: &CanonicalInboundMessage,
        routing_id: &str,
        sender: &ReplySender<'_>,
        extras: &ContextExtras,
    ) -> anyhow::Result<Vec<OutboundEnvelope>> {
        (**self).process(message, routing_id, sender, extras).await
    }
}

/// Handle for replying to the conversation of the current turn.
pub struct ReplySender<'a> {
    queue: &'a DeliveryQueue,
    admin_id: &'a str,
}

impl<'a> ReplySender<'a> {
    pub(crate) fn new(queue: &'a DeliveryQueue, admin_id: &'a str) -> Self {
        Self { queue, admin_id }
    }

    pub fn conversation_id(&self) -> &str {
        self.queue.conversation_id()
    }

    /// Translates and queues an envelope. Returns `false` when the envelope has no Intercom
    /// representation and was skipped.
    pub fn send(&self, envelope: &OutboundEnvelope) -> bool {
        let reply = to_intercom_reply(envelope, self.admin_id, self.queue.conversation_id());
        self.queue.enqueue(reply)
    }
}
