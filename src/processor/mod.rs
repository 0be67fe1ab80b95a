//! The `processor` module implements the consumer side of the harness: the
//! subscription processor lifecycle and its delivery-acknowledgment protocol.
//!
//! A [`SubscriptionProcessor`] attaches a message handler and an error
//! handler to one (topic, subscription) pair, pumps locked messages to the
//! message handler while running, and drains cleanly on stop. The handler
//! receives a [`Delivery`] it must acknowledge; pipeline faults go to the
//! error handler and never stop the pump.

pub mod delivery;
pub mod handlers;
pub mod subscription_processor;

pub use delivery::Delivery;
pub use handlers::{ErrorHandler, FaultKind, MessageHandler, PipelineFault};
pub use subscription_processor::{ProcessorState, SubscriptionProcessor};

/// Identifies one durable subscription on a topic.
///
/// The topic is fixed for a whole run; the subscription name varies per
/// consumption round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionTarget {
    pub topic: String,
    pub subscription: String,
}

impl SubscriptionTarget {
    pub fn new(topic: &str, subscription: &str) -> Self {
        Self {
            topic: topic.to_string(),
            subscription: subscription.to_string(),
        }
    }
}

/// How deliveries are settled.
///
/// Only lock-then-acknowledge is supported: a received message is reserved
/// until explicitly acknowledged or its lock expires broker-side. There is
/// no receive-and-auto-delete mode in this harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    #[default]
    PeekLock,
}
