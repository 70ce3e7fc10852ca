//! Reply egress for the Intercom connector.
//!
//! A [`DeliveryQueue`] owns the outbound side of a single delivery turn: translated replies
//! are sent one after another through a [`ReplyTransport`], every outcome is reported to a
//! [`DeliveryLogger`], and [`DeliveryQueue::finished`] resolves once all of them settled.

pub mod client;
pub mod logger;
pub mod queue;
pub mod telemetry;
pub mod transport;

pub use client::HttpReplyTransport;
pub use logger::{DeliveryLogger, TracingDeliveryLogger};
pub use queue::{DeliveryQueue, SendRecord, TurnError, TurnReport};
pub use transport::{ReplyRequest, ReplyTransport, TransportError};
