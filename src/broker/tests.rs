use std::time::Duration;

use super::engine::{Broker, BrokerError};
use super::topic::Topic;

fn broker_with_entities() -> Broker {
    let mut broker = Broker::new();
    broker.create_topic("test_topic");
    broker
        .create_subscription("test_topic", "sub_a")
        .unwrap();
    broker
        .create_subscription("test_topic", "sub_b")
        .unwrap();
    broker
}

#[test]
fn test_topic_new() {
    let topic = Topic::new("test_topic");
    assert_eq!(topic.name, "test_topic");
    assert!(topic.subscriptions.is_empty());
}

#[test]
fn test_publish_fans_out_to_all_subscriptions() {
    let mut broker = broker_with_entities();
    broker.publish("test_topic", "hello".to_string()).unwrap();

    assert_eq!(broker.depth("test_topic", "sub_a").unwrap(), (1, 0));
    assert_eq!(broker.depth("test_topic", "sub_b").unwrap(), (1, 0));

    // Consuming one subscription leaves the other untouched.
    let locked = broker.receive_locked("test_topic", "sub_a").unwrap().unwrap();
    assert_eq!(locked.message.body, "hello");
    assert_eq!(broker.depth("test_topic", "sub_a").unwrap(), (0, 1));
    assert_eq!(broker.depth("test_topic", "sub_b").unwrap(), (1, 0));
}

#[test]
fn test_sequence_numbers_are_monotonic_per_topic() {
    let mut broker = broker_with_entities();
    for i in 1..=5u64 {
        let seq = broker
            .publish("test_topic", format!("message-{i}"))
            .unwrap();
        assert_eq!(seq, i);
    }

    for i in 1..=5u64 {
        let locked = broker.receive_locked("test_topic", "sub_a").unwrap().unwrap();
        assert_eq!(locked.message.sequence_number, i);
        assert_eq!(locked.message.body, format!("message-{i}"));
    }
}

#[test]
fn test_locked_message_is_invisible_until_settled() {
    let mut broker = broker_with_entities();
    broker.publish("test_topic", "only".to_string()).unwrap();

    let locked = broker.receive_locked("test_topic", "sub_a").unwrap().unwrap();
    assert!(broker.receive_locked("test_topic", "sub_a").unwrap().is_none());

    assert!(broker
        .acknowledge("test_topic", "sub_a", locked.lock_token)
        .unwrap());
    assert_eq!(broker.depth("test_topic", "sub_a").unwrap(), (0, 0));
}

#[test]
fn test_acknowledge_twice_is_a_noop() {
    let mut broker = broker_with_entities();
    broker.publish("test_topic", "once".to_string()).unwrap();

    let locked = broker.receive_locked("test_topic", "sub_a").unwrap().unwrap();
    assert!(broker
        .acknowledge("test_topic", "sub_a", locked.lock_token)
        .unwrap());
    assert!(!broker
        .acknowledge("test_topic", "sub_a", locked.lock_token)
        .unwrap());
    assert_eq!(broker.depth("test_topic", "sub_a").unwrap(), (0, 0));
}

#[test]
fn test_expired_lock_makes_message_redeliverable() {
    let mut broker = Broker::with_lock_duration(Duration::from_millis(10));
    broker.create_topic("test_topic");
    broker.create_subscription("test_topic", "sub_a").unwrap();
    broker.publish("test_topic", "flaky".to_string()).unwrap();

    let first = broker.receive_locked("test_topic", "sub_a").unwrap().unwrap();
    std::thread::sleep(Duration::from_millis(20));

    let second = broker.receive_locked("test_topic", "sub_a").unwrap().unwrap();
    assert_eq!(second.message.sequence_number, first.message.sequence_number);

    // The lapsed token no longer settles anything.
    assert!(!broker
        .acknowledge("test_topic", "sub_a", first.lock_token)
        .unwrap());
    assert!(broker
        .acknowledge("test_topic", "sub_a", second.lock_token)
        .unwrap());
}

#[test]
fn test_injected_fault_surfaces_exactly_once() {
    let mut broker = broker_with_entities();
    broker.publish("test_topic", "after".to_string()).unwrap();
    broker
        .inject_fault("test_topic", "sub_a", "simulated outage")
        .unwrap();

    match broker.receive_locked("test_topic", "sub_a") {
        Err(BrokerError::Injected(description)) => assert_eq!(description, "simulated outage"),
        other => panic!("expected injected fault, got {other:?}"),
    }

    // The fault is consumed; the next receive delivers normally.
    let locked = broker.receive_locked("test_topic", "sub_a").unwrap().unwrap();
    assert_eq!(locked.message.body, "after");
}

#[test]
fn test_publish_to_unknown_topic_fails() {
    let mut broker = Broker::new();
    match broker.publish("nonexistent", "hello".to_string()) {
        Err(BrokerError::UnknownTopic(name)) => assert_eq!(name, "nonexistent"),
        other => panic!("expected unknown topic error, got {other:?}"),
    }
}

#[test]
fn test_receive_from_unknown_subscription_fails() {
    let mut broker = Broker::new();
    broker.create_topic("test_topic");
    assert!(matches!(
        broker.receive_locked("test_topic", "ghost"),
        Err(BrokerError::UnknownSubscription { .. })
    ));
}
