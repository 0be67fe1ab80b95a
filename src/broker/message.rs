use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message as it exists inside the broker.
///
/// The broker assigns `sequence_number` at publish time: a per-topic counter
/// starting at 1 and increasing monotonically. Every subscription of the
/// topic receives its own copy carrying the same sequence number, so the
/// number identifies the publication, not the delivery.
///
/// # Fields
///
/// - `body` - The opaque payload text supplied by the producer.
/// - `sequence_number` - Per-topic publication counter, assigned by the broker.
/// - `enqueued_at` - Unix timestamp (in seconds) of the publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub body: String,
    pub sequence_number: u64,
    pub enqueued_at: i64,
}

/// A message reserved for one receiver under peek-lock delivery.
///
/// While locked the message is invisible to other receivers on the same
/// subscription. The `lock_token` is the capability that settles the
/// delivery: acknowledging with it removes the message permanently, while an
/// expired lock returns the message to the pending queue.
#[derive(Debug, Clone)]
pub struct LockedMessage {
    pub message: Message,
    pub lock_token: Uuid,
}
