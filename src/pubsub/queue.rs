use std::{collections::VecDeque, sync::Arc};

/// Тело сообщения.
///
/// Один `Arc<str>` разделяется между всеми очередями темы при fan-out:
/// каждая подписка получает свою ссылку, а сама строка неизменяема.
pub type Payload = Arc<str>;

/// Ограниченная FIFO-очередь сообщений одной подписки.
///
/// Не блокирует ни запись, ни чтение: при заполнении `try_push` возвращает
/// `false` и отбрасывает новое сообщение, а старые остаются на месте.
/// Синхронизация — забота владельца (реестр держит очередь под своей
/// блокировкой).
#[derive(Debug, Clone)]
pub struct BoundedQueue {
    items: VecDeque<Payload>,
    capacity: usize,
}

impl BoundedQueue {
    /// Создаёт пустую очередь заданной ёмкости.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Кладёт сообщение в конец очереди.
    ///
    /// Возвращает `false`, если очередь заполнена; в этом случае сообщение
    /// отбрасывается.
    pub fn try_push(
        &mut self,
        message: Payload,
    ) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push_back(message);
        true
    }

    /// Забирает самое старое сообщение.
    pub fn pop(&mut self) -> Option<Payload> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
