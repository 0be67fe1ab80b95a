use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::NamedTempFile;

use crate::broker::Broker;
use crate::client::MessageSink;
use crate::config::{BrokerSettings, HarnessSettings, Settings};
use crate::harness::payload::{LoremGenerator, PayloadGenerator};
use crate::harness::producer::run_producer;
use crate::harness::prompt::NoopPrompt;
use crate::harness::provision::{BrokerEndpoint, BrokerProvisioner, EmbeddedBroker};
use crate::harness::run::RunController;
use crate::utils::HarnessError;

struct ScriptedGenerator {
    issued: u32,
}

impl PayloadGenerator for ScriptedGenerator {
    fn next(&mut self) -> String {
        self.issued += 1;
        format!("payload-{}", self.issued)
    }
}

/// Hands out a pre-built endpoint, so tests can reach the broker before and
/// during a run.
struct SharedProvisioner {
    endpoint: BrokerEndpoint,
}

impl BrokerProvisioner for SharedProvisioner {
    fn start(&mut self) -> Result<BrokerEndpoint, HarnessError> {
        Ok(self.endpoint.clone())
    }

    fn stop(&mut self) {}
}

fn endpoint_with(topic: &str, subscriptions: &[&str]) -> (Arc<Mutex<Broker>>, BrokerEndpoint) {
    let mut broker = Broker::new();
    broker.create_topic(topic);
    for subscription in subscriptions {
        broker.create_subscription(topic, subscription).unwrap();
    }
    let shared = Arc::new(Mutex::new(broker));
    let endpoint = BrokerEndpoint::new("inproc://broker-test".to_string(), shared.clone());
    (shared, endpoint)
}

fn settings(subscriptions: &[&str], message_count: u32, round_duration_secs: u64) -> Settings {
    Settings {
        harness: HarnessSettings {
            topic: "topic-test".to_string(),
            subscriptions: subscriptions.iter().map(|s| s.to_string()).collect(),
            message_count,
            round_duration_secs,
        },
        broker: BrokerSettings {
            config_path: "unused".to_string(),
        },
    }
}

fn broker_artifact(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_producer_sends_exactly_n_in_order() {
    let (_, endpoint) = endpoint_with("topic-test", &["sub_a"]);
    let sink = MessageSink::new(endpoint.connect(), "topic-test");
    let mut generator = ScriptedGenerator { issued: 0 };

    run_producer(&sink, &mut generator, 10).unwrap();

    let connection = endpoint.connect();
    for i in 1..=10u64 {
        let locked = connection
            .receive_locked("topic-test", "sub_a")
            .unwrap()
            .unwrap();
        assert_eq!(locked.message.sequence_number, i);
        assert_eq!(locked.message.body, format!("payload-{i}"));
    }
    assert!(connection
        .receive_locked("topic-test", "sub_a")
        .unwrap()
        .is_none());
}

#[test]
fn test_producer_with_zero_count_sends_nothing() {
    let (shared, endpoint) = endpoint_with("topic-test", &["sub_a"]);
    let sink = MessageSink::new(endpoint.connect(), "topic-test");

    run_producer(&sink, &mut ScriptedGenerator { issued: 0 }, 0).unwrap();

    assert_eq!(
        shared.lock().unwrap().depth("topic-test", "sub_a").unwrap(),
        (0, 0)
    );
}

#[test]
fn test_producer_failure_is_fatal() {
    let (_, endpoint) = endpoint_with("topic-test", &["sub_a"]);
    let sink = MessageSink::new(endpoint.connect(), "missing-topic");

    assert!(matches!(
        run_producer(&sink, &mut ScriptedGenerator { issued: 0 }, 3),
        Err(HarnessError::Publish { .. })
    ));
}

#[test]
fn test_lorem_generator_produces_sentences() {
    let mut generator = LoremGenerator::new();
    for _ in 0..20 {
        let sentence = generator.next();
        assert!(sentence.ends_with('.'));
        assert!(sentence.chars().next().unwrap().is_ascii_uppercase());
        let words = sentence.trim_end_matches('.').split(' ').count();
        assert!((4..=9).contains(&words), "unexpected sentence: {sentence}");
    }
}

#[test]
fn test_embedded_broker_provisions_configured_entities() {
    let artifact = broker_artifact(
        r#"{ "topics": [ { "name": "topic-test", "subscriptions": ["subscription01", "subscription02"] } ] }"#,
    );
    let mut provisioner = EmbeddedBroker::new(artifact.path());

    let endpoint = provisioner.start().unwrap();
    assert!(endpoint.connection_string().starts_with("inproc://"));

    let connection = endpoint.connect();
    connection.send("topic-test", "probe".to_string()).unwrap();
    for subscription in ["subscription01", "subscription02"] {
        let locked = connection
            .receive_locked("topic-test", subscription)
            .unwrap()
            .unwrap();
        assert_eq!(locked.message.body, "probe");
    }
    provisioner.stop();
}

#[test]
fn test_embedded_broker_fails_on_missing_artifact() {
    let mut provisioner = EmbeddedBroker::new("/nonexistent/broker.json");
    assert!(matches!(
        provisioner.start(),
        Err(HarnessError::Provisioning(_))
    ));
}

#[test]
fn test_embedded_broker_fails_on_garbled_artifact() {
    let artifact = broker_artifact("{ not json ]");
    let mut provisioner = EmbeddedBroker::new(artifact.path());
    assert!(matches!(
        provisioner.start(),
        Err(HarnessError::Provisioning(_))
    ));
}

#[tokio::test]
async fn test_run_delivers_the_batch_to_every_subscription() {
    let (_, endpoint) = endpoint_with("topic-test", &["subscription01", "subscription02"]);
    let mut provisioner = SharedProvisioner { endpoint };
    let controller = RunController::new(
        settings(&["subscription01", "subscription02"], 10, 1),
        Arc::new(NoopPrompt),
    );

    let summary = controller.run(&mut provisioner).await.unwrap();

    assert_eq!(summary.rounds.len(), 2);
    for (report, expected) in summary.rounds.iter().zip(["subscription01", "subscription02"]) {
        assert_eq!(report.subscription, expected);
        // Fan-out: each subscription gets its own copy of all 10 messages.
        assert_eq!(report.received, 10);
        assert_eq!(report.faults, 0);
    }
}

#[tokio::test]
async fn test_fault_in_one_round_does_not_abort_the_run() {
    let (shared, endpoint) = endpoint_with("topic-test", &["subscription01", "subscription02"]);
    shared
        .lock()
        .unwrap()
        .inject_fault("topic-test", "subscription01", "simulated outage")
        .unwrap();

    let mut provisioner = SharedProvisioner { endpoint };
    let controller = RunController::new(
        settings(&["subscription01", "subscription02"], 5, 1),
        Arc::new(NoopPrompt),
    );

    let summary = controller.run(&mut provisioner).await.unwrap();

    assert_eq!(summary.rounds.len(), 2);
    assert_eq!(summary.rounds[0].faults, 1);
    // The faulted round still drained its copies within the window.
    assert_eq!(summary.rounds[0].received, 5);
    assert_eq!(summary.rounds[1].faults, 0);
    assert_eq!(summary.rounds[1].received, 5);
}

#[tokio::test]
async fn test_zero_duration_rounds_do_not_hang() {
    let (_, endpoint) = endpoint_with("topic-test", &["subscription01"]);
    let mut provisioner = SharedProvisioner { endpoint };
    let controller = RunController::new(
        settings(&["subscription01"], 3, 0),
        Arc::new(NoopPrompt),
    );

    let summary = tokio::time::timeout(Duration::from_secs(5), controller.run(&mut provisioner))
        .await
        .expect("a zero-duration round must not hang")
        .unwrap();

    assert_eq!(summary.rounds.len(), 1);
    // The round closed immediately; at most the already-dispatched deliveries
    // were handled.
    assert!(summary.rounds[0].received <= 3);
}
