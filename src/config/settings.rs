use std::{net::SocketAddr, path::Path};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{logging::LoggingConfig, pubsub::DEFAULT_QUEUE_CAPACITY};

/// Адрес HTTP-сервера по умолчанию.
pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:8080";
/// Имя файла конфигурации, который ищется в рабочем каталоге.
pub const DEFAULT_CONFIG_FILE: &str = "topiq";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub listen_address: String,
}

/// Настройки брокера. Ёмкость задаётся на весь процесс, а не на подписку.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerSettings {
    pub queue_capacity: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
        }
    }
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Settings {
    /// Загружает настройки.
    ///
    /// Если `path` задан, файл обязателен; иначе `topiq.{toml,yaml,json}` в
    /// рабочем каталоге читается при наличии. Переменные окружения:
    /// `TOPIQ_SERVER__LISTEN_ADDRESS`, `TOPIQ_BROKER__QUEUE_CAPACITY`,
    /// `TOPIQ_LOGGING__LEVEL` и т.д.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("server.listen_address", DEFAULT_LISTEN_ADDRESS)?
            .set_default("broker.queue_capacity", DEFAULT_QUEUE_CAPACITY as u64)?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let cfg = builder
            // Переменные окружения с префиксом TOPIQ_
            .add_source(
                Environment::with_prefix("TOPIQ")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Перекрывает загруженные значения аргументами командной строки.
    pub fn override_with(
        mut self,
        listen_address: Option<String>,
        queue_capacity: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if let Some(addr) = listen_address {
            self.server.listen_address = addr;
        }
        if let Some(capacity) = queue_capacity {
            self.broker.queue_capacity = capacity;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.queue_capacity == 0 {
            return Err(ConfigError::Message(
                "broker.queue_capacity must be at least 1".to_string(),
            ));
        }
        self.listen_addr()?;
        self.logging.validate().map_err(ConfigError::Message)
    }

    /// Адрес для `TcpListener`.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.listen_address.parse().map_err(|e| {
            ConfigError::Message(format!(
                "invalid server.listen_address '{}': {e}",
                self.server.listen_address
            ))
        })
    }
}
