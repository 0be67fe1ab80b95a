use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::broker::{Broker, BrokerError, LockedMessage};

/// A handle to a provisioned broker instance.
///
/// Cloning a `Connection` yields an independent handle to the same broker,
/// the way opening a second client against the same connection string would.
/// Every component that needs broker access (the message sink, each
/// subscription processor) holds its own clone and releases it by dropping.
#[derive(Debug, Clone)]
pub struct Connection {
    broker: Arc<Mutex<Broker>>,
}

impl Connection {
    pub(crate) fn new(broker: Arc<Mutex<Broker>>) -> Self {
        Self { broker }
    }

    /// Publishes a message body to a topic and returns the sequence number
    /// the broker assigned. Returns once the broker has committed the
    /// message, which is the send acknowledgment the producer loop waits on.
    pub fn send(&self, topic: &str, body: String) -> Result<u64, BrokerError> {
        self.lock().publish(topic, body)
    }

    /// Pulls the next locked message from a subscription, if one is pending.
    pub fn receive_locked(
        &self,
        topic: &str,
        subscription: &str,
    ) -> Result<Option<LockedMessage>, BrokerError> {
        self.lock().receive_locked(topic, subscription)
    }

    /// Settles a locked delivery by token. `false` means the token was
    /// already settled or its lock expired.
    pub fn acknowledge(
        &self,
        topic: &str,
        subscription: &str,
        token: Uuid,
    ) -> Result<bool, BrokerError> {
        self.lock().acknowledge(topic, subscription, token)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Broker> {
        // A poisoned broker mutex means a panic already tore the test or
        // process down; propagating the inner state is still sound.
        self.broker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
