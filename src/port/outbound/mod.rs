//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the quote provider, storage, and the chat
//! transport used for notifications.

pub mod market;
pub mod notifier;
pub mod store;
