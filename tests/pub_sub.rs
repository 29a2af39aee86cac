use std::{collections::HashMap, sync::Arc, thread};

use topiq::{Broker, BrokerError, ErrorExt, StatusCode};

fn broker_with(
    topic: &str,
    subscriptions: &[&str],
) -> Broker {
    let broker = Broker::default();
    broker.create_topic(topic).unwrap();
    for s in subscriptions {
        broker.subscribe(topic, s).unwrap();
    }
    broker
}

/// Тест проверяет полный сценарий: создание темы, подписка, публикация и
/// чтение, после которого очередь пуста.
#[test]
fn test_orders_billing_example() {
    let broker = Broker::default();
    broker.create_topic("orders").unwrap();
    broker.subscribe("orders", "billing").unwrap();
    broker.publish("orders", "order#1");

    assert_eq!(broker.consume("orders", "billing").unwrap(), "order#1");

    let err = broker.consume("orders", "billing").unwrap_err();
    assert_eq!(err.status_code(), StatusCode::EmptyQueue);
}

/// Тест проверяет, что повторное создание темы отклоняется, а тема
/// остаётся в единственном экземпляре.
#[test]
fn test_duplicate_topic_rejected() {
    let broker = Broker::default();
    broker.create_topic("t").unwrap();

    let err = broker.create_topic("t").unwrap_err();
    assert!(matches!(err, BrokerError::AlreadyExists { .. }));
    assert_eq!(broker.list_topics(), vec!["t".to_string()]);
}

/// Тест проверяет, что удаление несуществующей темы ничего не меняет.
#[test]
fn test_delete_missing_topic_is_noop() {
    let broker = broker_with("keep", &["s"]);
    broker.publish("keep", "m");

    broker.delete_topic("missing");

    assert_eq!(broker.list_topics(), vec!["keep".to_string()]);
    assert_eq!(broker.consume("keep", "s").unwrap(), "m");
}

/// Тест проверяет подписку до и после создания темы.
#[test]
fn test_subscribe_requires_topic() {
    let broker = Broker::default();

    let err = broker.subscribe("t", "s").unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NotFound);

    broker.create_topic("t").unwrap();
    broker.subscribe("t", "s").unwrap();

    let listed = broker.list_subscriptions("t").unwrap();
    assert_eq!(listed, HashMap::from([("t".to_string(), vec!["s".to_string()])]));
}

/// Тест проверяет порядок FIFO внутри одной подписки.
#[test]
fn test_fifo_order() {
    let broker = broker_with("t", &["s"]);
    broker.publish("t", "m1");
    broker.publish("t", "m2");

    assert_eq!(broker.consume("t", "s").unwrap(), "m1");
    assert_eq!(broker.consume("t", "s").unwrap(), "m2");
}

/// Тест проверяет, что при переполнении сохраняются самые старые C
/// сообщений, а лишнее отбрасывается.
#[test]
fn test_capacity_drops_newest() {
    let capacity = 4;
    let broker = Broker::new(capacity);
    broker.create_topic("t").unwrap();
    broker.subscribe("t", "s").unwrap();

    for i in 0..=capacity {
        broker.publish("t", &format!("m{i}"));
    }

    let received: Vec<String> = std::iter::from_fn(|| broker.consume("t", "s").ok()).collect();
    let expected: Vec<String> = (0..capacity).map(|i| format!("m{i}")).collect();
    assert_eq!(received, expected);

    let stats = broker.stats();
    assert_eq!(stats.dropped_count, 1);
    assert_eq!(stats.delivered_count, capacity as u64);
}

/// Тест проверяет, что подписки одной темы получают независимые копии.
#[test]
fn test_subscriptions_are_isolated() {
    let broker = broker_with("t", &["s1", "s2"]);
    broker.publish("t", "a");
    broker.publish("t", "b");

    assert_eq!(broker.consume("t", "s1").unwrap(), "a");
    assert_eq!(broker.consume("t", "s1").unwrap(), "b");
    assert!(broker.consume("t", "s1").is_err());

    assert_eq!(broker.consume("t", "s2").unwrap(), "a");
    assert_eq!(broker.consume("t", "s2").unwrap(), "b");
}

/// Тест проверяет, что одно имя подписки в разных темах даёт независимые
/// очереди.
#[test]
fn test_same_subscription_name_in_two_topics() {
    let broker = Broker::default();
    broker.create_topic("a").unwrap();
    broker.create_topic("b").unwrap();
    broker.subscribe("a", "s").unwrap();
    broker.subscribe("b", "s").unwrap();

    broker.publish("a", "only-a");

    assert!(matches!(
        broker.consume("b", "s"),
        Err(BrokerError::EmptyQueue { .. })
    ));
    assert_eq!(broker.consume("a", "s").unwrap(), "only-a");

    broker.unsubscribe("a", "s").unwrap();
    assert!(broker.list_subscriptions("a").unwrap()["a"].is_empty());
    assert_eq!(broker.list_subscriptions("b").unwrap()["b"], vec!["s".to_string()]);

    broker.publish("b", "only-b");
    assert_eq!(broker.consume("b", "s").unwrap(), "only-b");
}

/// Тест проверяет, что подписка видит только сообщения, опубликованные
/// после её создания.
#[test]
fn test_late_subscriber_misses_earlier_messages() {
    let broker = broker_with("t", &["early"]);
    broker.publish("t", "before");
    broker.subscribe("t", "late").unwrap();
    broker.publish("t", "after");

    assert_eq!(broker.consume("t", "late").unwrap(), "after");
    assert_eq!(broker.consume("t", "early").unwrap(), "before");
}

/// Тест проверяет, что удаление темы удаляет и подписки.
#[test]
fn test_delete_topic_discards_subscriptions() {
    let broker = broker_with("t", &["s"]);
    broker.publish("t", "m");

    broker.delete_topic("t");

    assert!(broker.subscribe("t", "s").unwrap_err().is_not_found());
    assert!(broker.consume("t", "s").unwrap_err().is_not_found());
    assert_eq!(broker.stats().pending_messages, 0);
}

/// Тест проверяет, что пересозданная тема начинается с пустого набора
/// подписок.
#[test]
fn test_recreated_topic_is_empty() {
    let broker = broker_with("t", &["s"]);
    broker.delete_topic("t");
    broker.create_topic("t").unwrap();

    assert!(broker.list_subscriptions("t").unwrap()["t"].is_empty());
}

/// Тест проверяет, что публикация в несуществующую тему не создаёт её.
#[test]
fn test_publish_to_missing_topic() {
    let broker = Broker::default();
    broker.publish("ghost", "m");

    assert!(broker.list_topics().is_empty());
    assert_eq!(broker.stats().publish_count, 1);
    assert_eq!(broker.stats().delivered_count, 0);
}

/// Тест проверяет, что при конкурентной публикации ни одна очередь не
/// превышает ёмкость, а порядок сообщений каждого издателя сохраняется.
#[test]
fn test_concurrent_publishers_preserve_order_and_capacity() {
    const PUBLISHERS: usize = 4;
    const PER_PUBLISHER: usize = 50;
    let capacity = 64;

    let broker = Arc::new(Broker::new(capacity));
    broker.create_topic("t").unwrap();
    broker.subscribe("t", "s").unwrap();

    let handles: Vec<_> = (0..PUBLISHERS)
        .map(|p| {
            let broker = Arc::clone(&broker);
            thread::spawn(move || {
                for i in 0..PER_PUBLISHER {
                    broker.publish("t", &format!("{p}:{i}"));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let stats = broker.stats();
    assert_eq!(stats.pending_messages, capacity);
    assert_eq!(stats.publish_count, (PUBLISHERS * PER_PUBLISHER) as u64);
    assert_eq!(
        stats.delivered_count + stats.dropped_count,
        (PUBLISHERS * PER_PUBLISHER) as u64
    );

    let mut last_seen: HashMap<usize, usize> = HashMap::new();
    while let Ok(msg) = broker.consume("t", "s") {
        let (p, i) = msg.split_once(':').unwrap();
        let (p, i): (usize, usize) = (p.parse().unwrap(), i.parse().unwrap());
        if let Some(prev) = last_seen.insert(p, i) {
            assert!(i > prev, "publisher {p}: {i} after {prev}");
        }
    }
}

/// Тест проверяет, что конкурентные читатели получают каждое сообщение
/// ровно один раз.
#[test]
fn test_concurrent_consumers_receive_each_message_once() {
    let total = 100;
    let broker = Arc::new(Broker::new(total));
    broker.create_topic("t").unwrap();
    broker.subscribe("t", "s").unwrap();
    for i in 0..total {
        broker.publish("t", &i.to_string());
    }

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let broker = Arc::clone(&broker);
            thread::spawn(move || {
                let mut got = Vec::new();
                while let Ok(m) = broker.consume("t", "s") {
                    got.push(m.parse::<usize>().unwrap());
                }
                got
            })
        })
        .collect();

    let mut all: Vec<usize> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..total).collect::<Vec<_>>());
}
