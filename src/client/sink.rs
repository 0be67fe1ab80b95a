use crate::client::Connection;
use crate::utils::HarnessError;

/// The producer-side sender, bound to a single topic.
///
/// `send` blocks until the broker acknowledges the message, so a loop of
/// sends is strictly sequential: the next message is not issued until the
/// previous one is committed.
#[derive(Debug, Clone)]
pub struct MessageSink {
    connection: Connection,
    topic: String,
}

impl MessageSink {
    pub fn new(connection: Connection, topic: &str) -> Self {
        Self {
            connection,
            topic: topic.to_string(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Sends one payload to the sink's topic. Any broker rejection is fatal
    /// to the caller; there is no partial-success policy on the publish path.
    pub fn send(&self, body: String) -> Result<u64, HarnessError> {
        self.connection
            .send(&self.topic, body)
            .map_err(|e| HarnessError::Publish {
                topic: self.topic.clone(),
                reason: e.to_string(),
            })
    }
}
