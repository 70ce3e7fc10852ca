//! Intercom connector core contracts and value types.
//!
//! This crate exposes the data structures exchanged between the webhook ingress, the bot
//! processor and the reply egress: the raw conversation webhook shape, the canonical inbound
//! message, the generic outbound envelope, the Intercom reply payload and the immutable
//! connector configuration.
pub mod config;
pub mod outbound;
pub mod reply;
pub mod types;

pub use config::*;
pub use outbound::*;
pub use reply::*;
pub use types::*;

/// Returns the semantic version advertised by this crate.
///
/// ```
/// assert_eq!(ic_core::version(), env!("CARGO_PKG_VERSION"));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
