use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Счётчики брокера.
///
/// Инкрементируются под блокировкой реестра, но читаются без неё.
#[derive(Debug, Default)]
pub(crate) struct BrokerCounters {
    publish_count: AtomicU64,
    delivered_count: AtomicU64,
    dropped_count: AtomicU64,
    consumed_count: AtomicU64,
}

impl BrokerCounters {
    pub(crate) fn record_publish(&self) {
        self.publish_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(
        &self,
        count: u64,
    ) {
        self.delivered_count.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(
        &self,
        count: u64,
    ) {
        self.dropped_count.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_consumed(&self) {
        self.consumed_count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Снимок состояния брокера.
///
/// # Поля
/// * `topics` - кол-во тем.
/// * `subscriptions` - кол-во подписок во всех темах.
/// * `pending_messages` - сообщений, ожидающих чтения во всех очередях.
/// * `publish_count` - общее число вызовов `publish`.
/// * `delivered_count` - сообщений, положенных в очереди.
/// * `dropped_count` - сообщений, отброшенных из-за заполненной очереди.
/// * `consumed_count` - сообщений, выданных через `consume`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BrokerStats {
    pub topics: usize,
    pub subscriptions: usize,
    pub pending_messages: usize,
    pub publish_count: u64,
    pub delivered_count: u64,
    pub dropped_count: u64,
    pub consumed_count: u64,
}

impl BrokerStats {
    pub(crate) fn with_counters(
        mut self,
        counters: &BrokerCounters,
    ) -> Self {
        self.publish_count = counters.publish_count.load(Ordering::Relaxed);
        self.delivered_count = counters.delivered_count.load(Ordering::Relaxed);
        self.dropped_count = counters.dropped_count.load(Ordering::Relaxed);
        self.consumed_count = counters.consumed_count.load(Ordering::Relaxed);
        self
    }
}
