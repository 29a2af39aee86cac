use std::{fs, io, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Формат консольного вывода.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Многострочный человекочитаемый вывод
    Pretty,
    /// Однострочный вывод
    #[default]
    Compact,
    /// Одна JSON-запись на строку
    Json,
}

/// Уровни, которые принимает `level`.
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Настройки логирования.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень для модулей брокера (trace/debug/info/warn/error)
    pub level: String,
    /// Уровень для сторонних крейтов (axum, hyper, ...)
    pub dependency_level: String,
    pub console: ConsoleConfig,
    pub file: FileConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_line_numbers: bool,
}

/// Файловый sink: ежедневная ротация в `dir/filename.YYYY-MM-DD`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub filename: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dependency_level: "warn".to_string(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: LogFormat::default(),
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            with_line_numbers: false,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("logs"),
            filename: "topiq.log".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Директива для `EnvFilter`: сторонние крейты на `dependency_level`,
    /// сам брокер на `level`.
    pub fn build_filter_directive(&self) -> String {
        format!(
            "{},{}={}",
            self.dependency_level.to_lowercase(),
            env!("CARGO_CRATE_NAME"),
            self.level.to_lowercase()
        )
    }

    /// Проверяет уровни и настройки файлового sink.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("level", &self.level),
            ("dependency_level", &self.dependency_level),
        ] {
            if !LEVELS.contains(&value.to_lowercase().as_str()) {
                return Err(format!(
                    "invalid logging.{name} '{value}', expected one of {LEVELS:?}"
                ));
            }
        }
        if self.file.enabled && self.file.filename.trim().is_empty() {
            return Err("logging.file.filename must not be empty".to_string());
        }
        Ok(())
    }

    /// Создаёт каталог для файловых логов, если файловый sink включён.
    pub fn ensure_log_dir(&self) -> io::Result<()> {
        if self.file.enabled {
            fs::create_dir_all(&self.file.dir)?;
        }
        Ok(())
    }
}
