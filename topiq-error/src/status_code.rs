use std::fmt;

use num_enum::TryFromPrimitive;

/// Коды статуса для категоризации ошибок брокера.
///
/// # Диапазоны:
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки данных (темы, подписки, очереди)
/// - 8xxx: Ошибки разбора запросов
///
/// `num_enum::TryFromPrimitive` даёт `TryFrom<u32>`, поэтому код можно
/// передавать клиенту числом и восстанавливать обратно.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 1xxx: Общие ошибки ===
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: Ошибки данных ===
    NotFound = 2000,
    AlreadyExists = 2001,
    EmptyQueue = 2010,

    // === 8xxx: Протокол ===
    ParseError = 8009,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Пытается получить вариант `StatusCode` из `u32`.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Имеет ли смысл повторить операцию позже.
    ///
    /// Пустая очередь — единственное состояние брокера, которое меняется
    /// само по себе (после следующей публикации).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EmptyQueue)
    }

    /// Ошибка на стороне клиента: проблема в запросе или в данных.
    pub fn is_client_error(&self) -> bool {
        let c = self.code();
        (2000..=4999).contains(&c) || matches!(self, Self::InvalidArgs | Self::ParseError)
    }

    /// Внутренняя или инфраструктурная ошибка сервера.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::NotFound | Self::AlreadyExists | Self::EmptyQueue => LogLevel::Debug,
            Self::InvalidArgs | Self::ParseError => LogLevel::Info,
            Self::Internal => LogLevel::Error,
        }
    }

    /// HTTP-статус, соответствующий коду.
    ///
    /// Все клиентские ошибки отдаются как 400: клиент различает их по
    /// числовому коду в теле ответа, а не по HTTP-статусу.
    pub fn http_status(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
