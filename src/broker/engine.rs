use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::broker::message::LockedMessage;
use crate::broker::topic::Topic;

const DEFAULT_LOCK_DURATION: Duration = Duration::from_secs(30);

/// Errors surfaced at the broker boundary.
///
/// `UnknownTopic`/`UnknownSubscription` indicate the entity was never
/// provisioned. `Injected` carries a fault queued through
/// [`Broker::inject_fault`] and exists so tests can exercise the
/// receive-failure path of a consumer.
#[derive(Debug, Clone, Error)]
pub enum BrokerError {
    #[error("topic '{0}' does not exist")]
    UnknownTopic(String),

    #[error("subscription '{subscription}' does not exist on topic '{topic}'")]
    UnknownSubscription { topic: String, subscription: String },

    #[error("receive failed: {0}")]
    Injected(String),
}

/// The broker that manages topics and their subscriptions.
///
/// Publishing fans a message out to every subscription of the topic.
/// Receiving is peek-lock only: a received message stays invisible to other
/// receivers until its lock token is acknowledged or the lock expires and
/// the broker makes it redeliverable. Lock expiry is the broker's job alone;
/// consumers never force-release a lock.
#[derive(Debug)]
pub struct Broker {
    topics: HashMap<String, Topic>,
    lock_duration: Duration,
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

impl Broker {
    /// Creates a broker with the default 30 second message lock.
    pub fn new() -> Self {
        Self::with_lock_duration(DEFAULT_LOCK_DURATION)
    }

    /// Creates a broker with a custom message lock duration.
    pub fn with_lock_duration(lock_duration: Duration) -> Self {
        Self {
            topics: HashMap::new(),
            lock_duration,
        }
    }

    /// Creates a topic. If the topic already exists, it has no effect.
    pub fn create_topic(&mut self, name: &str) {
        self.topics
            .entry(name.to_string())
            .or_insert_with(|| Topic::new(name));
    }

    /// Creates a durable subscription on an existing topic.
    pub fn create_subscription(&mut self, topic: &str, subscription: &str) -> Result<(), BrokerError> {
        let topic = self
            .topics
            .get_mut(topic)
            .ok_or_else(|| BrokerError::UnknownTopic(topic.to_string()))?;
        topic.add_subscription(subscription);
        Ok(())
    }

    /// Publishes a message to a topic, fanning it out to every subscription.
    /// Returns the sequence number the broker assigned.
    pub fn publish(&mut self, topic: &str, body: String) -> Result<u64, BrokerError> {
        let topic = self
            .topics
            .get_mut(topic)
            .ok_or_else(|| BrokerError::UnknownTopic(topic.to_string()))?;
        Ok(topic.publish(body))
    }

    /// Receives the next pending message on a subscription under lock.
    ///
    /// Returns `Ok(None)` when nothing is pending. An injected fault, if one
    /// is queued, is returned (and consumed) before any message.
    pub fn receive_locked(
        &mut self,
        topic: &str,
        subscription: &str,
    ) -> Result<Option<LockedMessage>, BrokerError> {
        let lock_duration = self.lock_duration;
        let subscription = self.subscription_mut(topic, subscription)?;
        if let Some(description) = subscription.pop_fault() {
            return Err(BrokerError::Injected(description));
        }
        Ok(subscription.take_locked(lock_duration))
    }

    /// Settles a locked delivery. Returns `false` for an unknown or expired
    /// token; acknowledging twice never double-counts.
    pub fn acknowledge(
        &mut self,
        topic: &str,
        subscription: &str,
        token: Uuid,
    ) -> Result<bool, BrokerError> {
        Ok(self.subscription_mut(topic, subscription)?.acknowledge(token))
    }

    /// Queues a one-shot receive fault on a subscription.
    pub fn inject_fault(
        &mut self,
        topic: &str,
        subscription: &str,
        description: &str,
    ) -> Result<(), BrokerError> {
        self.subscription_mut(topic, subscription)?
            .inject_fault(description);
        Ok(())
    }

    /// (pending, locked) depths of a subscription's queues.
    pub fn depth(&mut self, topic: &str, subscription: &str) -> Result<(usize, usize), BrokerError> {
        Ok(self.subscription_mut(topic, subscription)?.depth())
    }

    fn subscription_mut(
        &mut self,
        topic: &str,
        subscription: &str,
    ) -> Result<&mut crate::broker::topic::Subscription, BrokerError> {
        let topic_entry = self
            .topics
            .get_mut(topic)
            .ok_or_else(|| BrokerError::UnknownTopic(topic.to_string()))?;
        topic_entry
            .subscriptions
            .get_mut(subscription)
            .ok_or_else(|| BrokerError::UnknownSubscription {
                topic: topic.to_string(),
                subscription: subscription.to_string(),
            })
    }
}
