use serde::Deserialize;

/// Top-level configuration for the harness.
///
/// Covers the exercising parameters and the broker provisioning artifact.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub harness: HarnessSettings,
    pub broker: BrokerSettings,
}

/// What to publish and which subscriptions to drain.
#[derive(Debug, Deserialize, Clone)]
pub struct HarnessSettings {
    /// Topic every message of the run is published to.
    pub topic: String,
    /// Subscriptions to drain, one consumption round each, in this order.
    pub subscriptions: Vec<String>,
    /// How many payloads the producer loop sends.
    pub message_count: u32,
    /// How long each consumption round keeps listening.
    pub round_duration_secs: u64,
}

/// Where the broker provisioner finds its configuration artifact.
#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    pub config_path: String,
}

/// Partial configuration loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub harness: Option<PartialHarnessSettings>,
    pub broker: Option<PartialBrokerSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialHarnessSettings {
    pub topic: Option<String>,
    pub subscriptions: Option<Vec<String>>,
    pub message_count: Option<u32>,
    pub round_duration_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub config_path: Option<String>,
}

/// Provides default values for `Settings`.
///
/// The defaults mirror the canonical exercise: ten messages into one topic,
/// two subscriptions drained for ten seconds each.
impl Default for Settings {
    fn default() -> Self {
        Self {
            harness: HarnessSettings {
                topic: "topic-test".to_string(),
                subscriptions: vec![
                    "subscription01".to_string(),
                    "subscription02".to_string(),
                ],
                message_count: 10,
                round_duration_secs: 10,
            },
            broker: BrokerSettings {
                config_path: "config/broker.json".to_string(),
            },
        }
    }
}
