use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;
use uuid::Uuid;

use crate::broker::LockedMessage;
use crate::client::Connection;
use crate::processor::SubscriptionTarget;

/// One locked delivery, as handed to a message handler.
///
/// Exposes the message body, its broker-assigned sequence number, and the
/// acknowledge operation that settles the delivery. Acknowledging consumes
/// the delivery's lock, not the message content; a delivery left
/// unacknowledged stays locked until the broker expires the lock and makes
/// the message redeliverable.
#[derive(Debug)]
pub struct Delivery {
    body: String,
    sequence_number: u64,
    lock_token: Uuid,
    target: SubscriptionTarget,
    connection: Connection,
    acked: AtomicBool,
}

impl Delivery {
    pub(crate) fn new(
        locked: LockedMessage,
        target: SubscriptionTarget,
        connection: Connection,
    ) -> Self {
        Self {
            body: locked.message.body,
            sequence_number: locked.message.sequence_number,
            lock_token: locked.lock_token,
            target,
            connection,
            acked: AtomicBool::new(false),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Settles this delivery. Returns `true` the first time the broker
    /// accepts the settlement; a repeat call (or a call on an expired lock)
    /// returns `false` and does nothing further.
    pub fn acknowledge(&self) -> bool {
        if self.acked.swap(true, Ordering::SeqCst) {
            return false;
        }
        match self.connection.acknowledge(
            &self.target.topic,
            &self.target.subscription,
            self.lock_token,
        ) {
            Ok(settled) => settled,
            Err(e) => {
                warn!(
                    "Acknowledge failed for sequence {} on {}: {}",
                    self.sequence_number, self.target.subscription, e
                );
                false
            }
        }
    }
}
