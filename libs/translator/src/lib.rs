//! Helpers for translating between Intercom conversation payloads and the connector's
//! platform-agnostic messages.
//!
//! Inbound, [`normalize`] turns a conversation webhook item into a [`Normalized`] outcome: a
//! canonical message for the bot processor, or the reason the event is ignored. Outbound,
//! [`translate`] maps a generic [`ic_core::OutboundEnvelope`] onto the Intercom reply payload,
//! returning `None` for shapes Intercom cannot represent.

pub mod inbound;
pub mod outbound;
pub mod sanitize;
mod telemetry;

pub use inbound::{IgnoreReason, Normalized, normalize};
pub use outbound::{to_intercom_reply, translate};
pub use sanitize::strip_markup;
