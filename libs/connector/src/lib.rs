//! Intercom conversation connector.
//!
//! [`Connector`] turns conversation webhooks into canonical messages for a [`BotProcessor`]
//! and delivers the processor's replies back to the conversation, in order, through the
//! Intercom reply API.

mod connector;
mod http_processor;
mod processor;
mod telemetry;

pub use connector::{Connector, ConnectorError, TurnOutcome};
pub use http_processor::HttpBotProcessor;
pub use processor::{BotProcessor, ReplySender};

pub use ic_core::{
    CanonicalInboundMessage, ConnectorConfig, ContextExtras, OutboundEnvelope, PlatformReply,
};
pub use ic_egress_common::{
    DeliveryLogger, ReplyTransport, TracingDeliveryLogger, TurnError, TurnReport,
};
pub use ic_translator::IgnoreReason;
