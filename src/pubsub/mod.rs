//! Подсистема Publish–Subscribe (pub/sub).
//!
//! Внутрипроцессный брокер с опросом (pull) вместо push-доставки:
//!
//! - `broker`: реестр тем и подписок, публикация и чтение сообщений.
//! - `queue`: ограниченная FIFO-очередь одной подписки с отбрасыванием
//!   новых сообщений при заполнении.
//! - `stats`: счётчики и снимок состояния брокера.
//!
//! Публичный API переэкспортирует:
//! - `broker::*`
//! - `queue::*`
//! - `stats::BrokerStats`

pub mod broker;
pub mod queue;
mod stats;

pub use broker::*;
pub use queue::*;
pub use stats::BrokerStats;
