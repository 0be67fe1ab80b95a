use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::broker::Broker;
use crate::client::Connection;
use crate::utils::HarnessError;

/// Provisions a broker instance for a run and tears it down afterwards.
///
/// `start` must return only once the broker is ready to accept traffic; the
/// run controller publishes immediately after it.
pub trait BrokerProvisioner {
    fn start(&mut self) -> Result<BrokerEndpoint, HarnessError>;
    fn stop(&mut self);
}

/// A provisioned, ready broker instance.
///
/// Carries the connection string (logged, never parsed back) and hands out
/// independent [`Connection`]s; every component opens its own.
#[derive(Debug, Clone)]
pub struct BrokerEndpoint {
    connection_string: String,
    broker: Arc<Mutex<Broker>>,
}

impl BrokerEndpoint {
    pub(crate) fn new(connection_string: String, broker: Arc<Mutex<Broker>>) -> Self {
        Self {
            connection_string,
            broker,
        }
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Opens a fresh connection to the provisioned broker.
    pub fn connect(&self) -> Connection {
        Connection::new(self.broker.clone())
    }
}

/// The broker configuration artifact: which entities to provision.
///
/// Mirrors the emulator-style config file a containerized broker would get
/// bind-mounted at startup.
#[derive(Debug, Deserialize)]
pub struct BrokerConfig {
    pub topics: Vec<TopicConfig>,
}

#[derive(Debug, Deserialize)]
pub struct TopicConfig {
    pub name: String,
    pub subscriptions: Vec<String>,
}

/// Provisions an in-process broker from a JSON configuration artifact.
///
/// The file names the topics and their subscriptions; `start` builds a fresh
/// [`Broker`] with exactly those entities and returns an endpoint for it.
/// Any problem reading or applying the artifact is a provisioning failure,
/// which is fatal to the run.
pub struct EmbeddedBroker {
    config_path: PathBuf,
}

impl EmbeddedBroker {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }
}

impl BrokerProvisioner for EmbeddedBroker {
    fn start(&mut self) -> Result<BrokerEndpoint, HarnessError> {
        let raw = std::fs::read_to_string(&self.config_path).map_err(|e| {
            HarnessError::Provisioning(format!(
                "cannot read broker config '{}': {e}",
                self.config_path.display()
            ))
        })?;
        let config: BrokerConfig = serde_json::from_str(&raw).map_err(|e| {
            HarnessError::Provisioning(format!(
                "invalid broker config '{}': {e}",
                self.config_path.display()
            ))
        })?;

        let mut broker = Broker::new();
        for topic in &config.topics {
            broker.create_topic(&topic.name);
            for subscription in &topic.subscriptions {
                broker
                    .create_subscription(&topic.name, subscription)
                    .map_err(|e| HarnessError::Provisioning(e.to_string()))?;
            }
            info!(
                "Provisioned topic '{}' with {} subscription(s)",
                topic.name,
                topic.subscriptions.len()
            );
        }

        let connection_string = format!("inproc://broker-{}", Uuid::new_v4());
        Ok(BrokerEndpoint::new(
            connection_string,
            Arc::new(Mutex::new(broker)),
        ))
    }

    fn stop(&mut self) {
        // Nothing to tear down: the in-process broker dies with its last
        // connection handle.
    }
}
