use std::collections::HashMap;

use parking_lot::RwLock;
use topiq_error::{BrokerError, BrokerResult};
use tracing::{debug, trace, warn};

use super::{
    stats::{BrokerCounters, BrokerStats},
    BoundedQueue, Payload,
};

/// Ёмкость очереди подписки по умолчанию.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Подписки одной темы: имя подписки -> её очередь.
type Subscriptions = HashMap<String, BoundedQueue>;

/// Брокер Pub/Sub сообщений.
///
/// Хранит реестр тема -> подписка -> очередь под одной блокировкой
/// `RwLock`. Все изменяющие операции (включая `publish` и `consume`, так как
/// они меняют содержимое очередей) берут её эксклюзивно, списки тем и
/// подписок читаются под разделяемой. Поэтому все операции упорядочены
/// порядком захвата блокировки, а блокировка никогда не берётся повторно.
///
/// Ни одна операция не ждёт другую сторону: `publish` отбрасывает
/// сообщение для заполненной очереди, `consume` на пустой очереди сразу
/// возвращает [`BrokerError::EmptyQueue`].
#[derive(Debug)]
pub struct Broker {
    /// Темы -> подписки -> очереди
    topics: RwLock<HashMap<String, Subscriptions>>,
    /// Ёмкость каждой очереди подписки
    queue_capacity: usize,
    counters: BrokerCounters,
}

impl Default for Broker {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl Broker {
    /// Создаёт пустой брокер с заданной ёмкостью очередей.
    ///
    /// Ёмкость 0 поднимается до 1.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            queue_capacity: queue_capacity.max(1),
            counters: BrokerCounters::default(),
        }
    }

    /// Ёмкость очереди каждой подписки.
    pub fn capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Создаёт тему без подписок.
    ///
    /// # Ошибки
    /// - [`BrokerError::InvalidArgument`], если имя пустое;
    /// - [`BrokerError::AlreadyExists`], если тема уже есть.
    pub fn create_topic(
        &self,
        name: &str,
    ) -> BrokerResult<()> {
        if name.is_empty() {
            return Err(BrokerError::invalid_argument("topic name must not be empty"));
        }

        let mut topics = self.topics.write();
        if topics.contains_key(name) {
            return Err(BrokerError::AlreadyExists {
                topic: name.to_string(),
            });
        }
        topics.insert(name.to_string(), Subscriptions::new());

        debug!(topic = name, "Topic created");
        Ok(())
    }

    /// Удаляет тему вместе со всеми подписками и их сообщениями.
    ///
    /// Если темы нет — ничего не делает.
    pub fn delete_topic(
        &self,
        name: &str,
    ) {
        let removed = self.topics.write().remove(name);

        if let Some(subscriptions) = removed {
            let discarded: usize = subscriptions.values().map(BoundedQueue::len).sum();
            debug!(
                topic = name,
                subscriptions = subscriptions.len(),
                discarded_messages = discarded,
                "Topic deleted"
            );
        }
    }

    /// Имена всех тем. Порядок не определён.
    pub fn list_topics(&self) -> Vec<String> {
        self.topics.read().keys().cloned().collect()
    }

    /// Создаёт подписку с новой пустой очередью.
    ///
    /// Повторная подписка с тем же именем заменяет очередь: ожидающие
    /// сообщения старой очереди теряются.
    ///
    /// # Ошибки
    /// - [`BrokerError::InvalidArgument`], если имя подписки пустое;
    /// - [`BrokerError::TopicNotFound`], если темы нет.
    pub fn subscribe(
        &self,
        topic: &str,
        subscription: &str,
    ) -> BrokerResult<()> {
        if subscription.is_empty() {
            return Err(BrokerError::invalid_argument(
                "subscription name must not be empty",
            ));
        }

        let mut topics = self.topics.write();
        let subscriptions = topics
            .get_mut(topic)
            .ok_or_else(|| BrokerError::topic_not_found(topic))?;

        let previous = subscriptions.insert(
            subscription.to_string(),
            BoundedQueue::new(self.queue_capacity),
        );

        match previous {
            Some(old) => debug!(
                topic,
                subscription,
                discarded_messages = old.len(),
                "Subscription re-created with a fresh queue"
            ),
            None => debug!(topic, subscription, "Subscription created"),
        }
        Ok(())
    }

    /// Удаляет подписку и её очередь.
    ///
    /// # Ошибки
    /// - [`BrokerError::TopicNotFound`];
    /// - [`BrokerError::SubscriptionNotFound`].
    pub fn unsubscribe(
        &self,
        topic: &str,
        subscription: &str,
    ) -> BrokerResult<()> {
        let mut topics = self.topics.write();
        let subscriptions = topics
            .get_mut(topic)
            .ok_or_else(|| BrokerError::topic_not_found(topic))?;

        let queue = subscriptions
            .remove(subscription)
            .ok_or_else(|| BrokerError::subscription_not_found(topic, subscription))?;

        debug!(
            topic,
            subscription,
            discarded_messages = queue.len(),
            "Subscription removed"
        );
        Ok(())
    }

    /// Подписки по темам.
    ///
    /// Пустое имя темы возвращает все темы с их подписками, иначе — одну
    /// запрошенную тему.
    ///
    /// # Ошибки
    /// - [`BrokerError::TopicNotFound`], если указанной темы нет.
    pub fn list_subscriptions(
        &self,
        topic: &str,
    ) -> BrokerResult<HashMap<String, Vec<String>>> {
        let topics = self.topics.read();

        if topic.is_empty() {
            return Ok(topics
                .iter()
                .map(|(name, subs)| (name.clone(), subs.keys().cloned().collect()))
                .collect());
        }

        let subscriptions = topics
            .get(topic)
            .ok_or_else(|| BrokerError::topic_not_found(topic))?;

        Ok(HashMap::from([(
            topic.to_string(),
            subscriptions.keys().cloned().collect(),
        )]))
    }

    /// Публикация сообщения в тему.
    ///
    /// Копия сообщения кладётся в очередь каждой подписки, существующей на
    /// момент захвата блокировки. Если очередь заполнена, сообщение
    /// отбрасывается только для этой подписки (с записью в лог); публикующий
    /// об этом не узнаёт. Публикация в несуществующую тему или тему без
    /// подписок ничего не делает.
    pub fn publish(
        &self,
        topic: &str,
        message: &str,
    ) {
        let mut topics = self.topics.write();
        self.counters.record_publish();

        let Some(subscriptions) = topics.get_mut(topic) else {
            trace!(topic, "Publish to unknown topic ignored");
            return;
        };
        if subscriptions.is_empty() {
            trace!(topic, "Publish to topic without subscriptions ignored");
            return;
        }

        let payload: Payload = Payload::from(message);
        let (mut delivered, mut dropped) = (0u64, 0u64);

        for (name, queue) in subscriptions.iter_mut() {
            if queue.try_push(payload.clone()) {
                delivered += 1;
            } else {
                dropped += 1;
                warn!(
                    topic,
                    subscription = %name,
                    capacity = queue.capacity(),
                    "Skipping message for subscription as its queue is full"
                );
            }
        }

        self.counters.record_delivered(delivered);
        self.counters.record_dropped(dropped);
    }

    /// Забирает самое старое сообщение подписки.
    ///
    /// Не блокируется: на пустой очереди сразу возвращает ошибку, и
    /// вызывающий должен повторить попытку позже.
    ///
    /// # Ошибки
    /// - [`BrokerError::TopicNotFound`];
    /// - [`BrokerError::SubscriptionNotFound`];
    /// - [`BrokerError::EmptyQueue`].
    pub fn consume(
        &self,
        topic: &str,
        subscription: &str,
    ) -> BrokerResult<String> {
        let mut topics = self.topics.write();
        let queue = topics
            .get_mut(topic)
            .ok_or_else(|| BrokerError::topic_not_found(topic))?
            .get_mut(subscription)
            .ok_or_else(|| BrokerError::subscription_not_found(topic, subscription))?;

        let message = queue.pop().ok_or_else(|| BrokerError::EmptyQueue {
            topic: topic.to_string(),
            subscription: subscription.to_string(),
        })?;

        self.counters.record_consumed();
        Ok(message.to_string())
    }

    /// Снимок размеров реестра и счётчиков.
    pub fn stats(&self) -> BrokerStats {
        let topics = self.topics.read();
        let stats = BrokerStats {
            topics: topics.len(),
            subscriptions: topics.values().map(HashMap::len).sum(),
            pending_messages: topics
                .values()
                .flat_map(HashMap::values)
                .map(BoundedQueue::len)
                .sum(),
            ..Default::default()
        };
        drop(topics);

        stats.with_counters(&self.counters)
    }
}
