use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::broker::message::{LockedMessage, Message};

/// Represents a topic in the broker.
///
/// A topic owns the per-topic sequence counter and the set of durable
/// subscriptions attached to it. Publishing enqueues a copy of the message
/// into every subscription; each subscription is then consumed independently.
#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    next_sequence: u64,
    pub subscriptions: HashMap<String, Subscription>,
}

impl Topic {
    /// Creates a new topic with the given name and no subscriptions.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            next_sequence: 0,
            subscriptions: HashMap::new(),
        }
    }

    /// Adds a durable subscription to the topic.
    /// If the subscription already exists, it has no effect.
    pub fn add_subscription(&mut self, name: &str) {
        self.subscriptions
            .entry(name.to_string())
            .or_insert_with(|| Subscription::new(name));
    }

    /// Assigns the next sequence number and fans the message out to every
    /// subscription. Returns the assigned sequence number.
    pub fn publish(&mut self, body: String) -> u64 {
        self.next_sequence += 1;
        let message = Message {
            body,
            sequence_number: self.next_sequence,
            enqueued_at: chrono::Utc::now().timestamp(),
        };
        for subscription in self.subscriptions.values_mut() {
            subscription.enqueue(message.clone());
        }
        self.next_sequence
    }
}

/// A durable, independently-consumed view of a topic's message stream.
///
/// Pending messages wait in arrival order. A received message moves to the
/// locked set until it is acknowledged (removed permanently) or its lock
/// expires (returned to the front of the pending queue, redeliverable).
#[derive(Debug, Default)]
pub struct Subscription {
    pub name: String,
    pending: VecDeque<Message>,
    locked: HashMap<Uuid, LockedEntry>,
    faults: VecDeque<String>,
}

#[derive(Debug)]
struct LockedEntry {
    message: Message,
    deadline: Instant,
}

impl Subscription {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pending: VecDeque::new(),
            locked: HashMap::new(),
            faults: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, message: Message) {
        self.pending.push_back(message);
    }

    /// Locks and returns the head pending message, if any.
    ///
    /// Expired locks are reclaimed first so a message whose lock lapsed is
    /// redeliverable before anything newer.
    pub fn take_locked(&mut self, lock_duration: Duration) -> Option<LockedMessage> {
        self.reclaim_expired();
        let message = self.pending.pop_front()?;
        let lock_token = Uuid::new_v4();
        self.locked.insert(
            lock_token,
            LockedEntry {
                message: message.clone(),
                deadline: Instant::now() + lock_duration,
            },
        );
        Some(LockedMessage {
            message,
            lock_token,
        })
    }

    /// Settles a locked delivery. Returns `false` if the token is unknown or
    /// the lock already expired; the message is never resurrected.
    pub fn acknowledge(&mut self, token: Uuid) -> bool {
        self.reclaim_expired();
        self.locked.remove(&token).is_some()
    }

    /// Queues a one-shot fault: the next receive on this subscription fails
    /// once with the given description.
    pub fn inject_fault(&mut self, description: &str) {
        self.faults.push_back(description.to_string());
    }

    pub fn pop_fault(&mut self) -> Option<String> {
        self.faults.pop_front()
    }

    /// (pending, locked) queue depths, after reclaiming expired locks.
    pub fn depth(&mut self) -> (usize, usize) {
        self.reclaim_expired();
        (self.pending.len(), self.locked.len())
    }

    // Expired locks go back to the front of the pending queue, oldest
    // sequence first, so redelivery precedes newer messages.
    fn reclaim_expired(&mut self) {
        let now = Instant::now();
        let expired: Vec<Uuid> = self
            .locked
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(token, _)| *token)
            .collect();

        let mut reclaimed: Vec<Message> = expired
            .into_iter()
            .filter_map(|token| self.locked.remove(&token))
            .map(|entry| entry.message)
            .collect();
        reclaimed.sort_by_key(|m| m.sequence_number);
        for message in reclaimed.into_iter().rev() {
            self.pending.push_front(message);
        }
    }
}
