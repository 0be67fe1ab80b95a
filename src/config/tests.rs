use std::io::Write;

use serial_test::serial;
use tempfile::Builder;

use super::settings::Settings;
use super::load_config_from;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.harness.topic, "topic-test");
    assert_eq!(
        settings.harness.subscriptions,
        vec!["subscription01", "subscription02"]
    );
    assert_eq!(settings.harness.message_count, 10);
    assert_eq!(settings.harness.round_duration_secs, 10);
    assert_eq!(settings.broker.config_path, "config/broker.json");
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let settings = load_config_from("/nonexistent/config").unwrap();
    assert_eq!(settings.harness.topic, "topic-test");
    assert_eq!(settings.harness.message_count, 10);
}

#[test]
#[serial]
fn test_file_overrides_are_merged_over_defaults() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[harness]
topic = "alt-topic"
message_count = 3
"#
    )
    .unwrap();
    file.flush().unwrap();

    let settings = load_config_from(file.path().to_str().unwrap()).unwrap();
    assert_eq!(settings.harness.topic, "alt-topic");
    assert_eq!(settings.harness.message_count, 3);
    // Values the file omits keep their defaults.
    assert_eq!(settings.harness.round_duration_secs, 10);
    assert_eq!(
        settings.harness.subscriptions,
        vec!["subscription01", "subscription02"]
    );
}

#[test]
#[serial]
fn test_environment_overrides_are_applied() {
    temp_env::with_var("HARNESS__ROUND_DURATION_SECS", Some("2"), || {
        let settings = load_config_from("/nonexistent/config").unwrap();
        assert_eq!(settings.harness.round_duration_secs, 2);
    });
}
