//! Сетевой модуль.
//!
//! - `http`: маршруты и обработчики (axum), перевод ошибок брокера в ответы.
//! - `server`: запуск сервера и graceful shutdown.

pub mod http;
pub mod server;

pub use http::router;
