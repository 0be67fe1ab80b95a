//! The `broker` module implements an in-memory topic broker with peek-lock
//! delivery semantics.
//!
//! It is the concrete stand-in behind the provisioning boundary: the harness
//! only ever talks to it through a [`Connection`](crate::client::Connection),
//! so the exercising logic stays agnostic of what actually backs the topic.
//! Every published message is fanned out to all subscriptions of its topic;
//! each subscription is consumed independently under lock-then-acknowledge
//! rules.

pub mod engine;
pub mod message;
pub mod topic;

pub use engine::{Broker, BrokerError};
pub use message::{LockedMessage, Message};

#[cfg(test)]
mod tests;
