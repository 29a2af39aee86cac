#[cfg(feature = "serde")]
use serde::Serialize;

use crate::ErrorExt;

/// Тело ответа об ошибке для HTTP-слоя.
///
/// `code` — числовой [`StatusCode`](crate::StatusCode), по которому клиент
/// различает `NotFound`, `AlreadyExists` и `EmptyQueue`. `retryable`
/// подсказывает, что тот же запрос может пройти позже.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u32,
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn from_error<E: ErrorExt + ?Sized>(err: &E) -> Self {
        let code = err.status_code();
        Self {
            error: err.client_message(),
            code: code.code(),
            retryable: code.is_retryable(),
        }
    }

    /// HTTP-статус ответа.
    pub fn http_status(&self) -> u16 {
        crate::StatusCode::from_u32(self.code)
            .map(|c| c.http_status())
            .unwrap_or(500)
    }
}
