//! Конфигурация сервера.
//!
//! Источники (каждый следующий перекрывает предыдущий):
//! значения по умолчанию -> файл `topiq.toml` (или путь из `--config`) ->
//! переменные окружения `TOPIQ_*` -> аргументы командной строки.

pub mod settings;

pub use settings::{BrokerSettings, ServerSettings, Settings};
