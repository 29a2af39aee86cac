use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки операций реестра тем и подписок.
///
/// Каждая ошибка возвращается вызывающему синхронно; внутренних повторов
/// нет. Переполнение очереди при публикации сюда не входит: такое сообщение
/// молча отбрасывается для конкретной подписки.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// Пустое или некорректное имя темы/подписки
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Тема с таким именем уже существует
    #[error("topic already exists: {topic}")]
    AlreadyExists { topic: String },

    /// Тема не найдена
    #[error("topic not found: {topic}")]
    TopicNotFound { topic: String },

    /// Подписка не найдена в существующей теме
    #[error("subscription not found: {subscription}")]
    SubscriptionNotFound { topic: String, subscription: String },

    /// В очереди подписки нет сообщений
    #[error("message queue empty")]
    EmptyQueue { topic: String, subscription: String },
}

impl BrokerError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn topic_not_found(topic: impl Into<String>) -> Self {
        Self::TopicNotFound {
            topic: topic.into(),
        }
    }

    pub fn subscription_not_found(
        topic: impl Into<String>,
        subscription: impl Into<String>,
    ) -> Self {
        Self::SubscriptionNotFound {
            topic: topic.into(),
            subscription: subscription.into(),
        }
    }

    /// `true` для обоих вариантов «не найдено» (тема или подписка).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TopicNotFound { .. } | Self::SubscriptionNotFound { .. }
        )
    }

    /// Тема, к которой относится ошибка (если есть).
    pub fn topic(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument { .. } => None,
            Self::AlreadyExists { topic }
            | Self::TopicNotFound { topic }
            | Self::SubscriptionNotFound { topic, .. }
            | Self::EmptyQueue { topic, .. } => Some(topic),
        }
    }
}

impl ErrorExt for BrokerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } => StatusCode::InvalidArgs,
            Self::AlreadyExists { .. } => StatusCode::AlreadyExists,
            Self::TopicNotFound { .. } | Self::SubscriptionNotFound { .. } => StatusCode::NotFound,
            Self::EmptyQueue { .. } => StatusCode::EmptyQueue,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "broker".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        if let Some(topic) = self.topic() {
            tags.push(("topic", topic.to_string()));
        }
        match self {
            Self::SubscriptionNotFound { subscription, .. }
            | Self::EmptyQueue { subscription, .. } => {
                tags.push(("subscription", subscription.clone()));
            }
            _ => {}
        }

        tags
    }
}
