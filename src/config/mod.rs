mod settings;

use config::{Config, ConfigError, Environment, File};

use crate::config::settings::PartialSettings;

pub use settings::{BrokerSettings, HarnessSettings, Settings};

/// Loads the configuration from the default file and environment variables.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Loads the configuration from a named file (any format the `config` crate
/// knows) plus environment variables, merged over the defaults.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(Environment::default().separator("__"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        harness: HarnessSettings {
            topic: partial
                .harness
                .as_ref()
                .and_then(|h| h.topic.clone())
                .unwrap_or(default.harness.topic),
            subscriptions: partial
                .harness
                .as_ref()
                .and_then(|h| h.subscriptions.clone())
                .unwrap_or(default.harness.subscriptions),
            message_count: partial
                .harness
                .as_ref()
                .and_then(|h| h.message_count)
                .unwrap_or(default.harness.message_count),
            round_duration_secs: partial
                .harness
                .as_ref()
                .and_then(|h| h.round_duration_secs)
                .unwrap_or(default.harness.round_duration_secs),
        },
        broker: BrokerSettings {
            config_path: partial
                .broker
                .as_ref()
                .and_then(|b| b.config_path.clone())
                .unwrap_or(default.broker.config_path),
        },
    })
}

#[cfg(test)]
mod tests;
