//! HTTP-интерфейс брокера.
//!
//! Каждый обработчик разбирает JSON-тело, вызывает одну операцию
//! [`Broker`] и кодирует результат. Собственного состояния у слоя нет.
//!
//! ## Маршруты
//!
//! - `GET /ping` — health check, `{"message": "pong"}`.
//! - `GET /topics` — `{"topics": [...]}`.
//! - `POST /topics` `{topic}` — 201.
//! - `DELETE /topics` `{topic}` — 204, идемпотентно.
//! - `GET /subscriptions?topic=` — `{topic: [sub, ...]}`.
//! - `POST /subscriptions` `{topic, subscription}` — 201.
//! - `DELETE /subscriptions` `{topic, subscription}` — 204.
//! - `POST /publish` `{topic, content}` — 201.
//! - `POST /consume` `{topic, subscription}` — 200, `{"message": ...}`.
//! - `GET /stats` — снимок [`BrokerStats`](crate::pubsub::BrokerStats).
//!
//! Ошибки: `{"error": ..., "code": ..., "retryable": ...}`, где `code` —
//! числовой [`StatusCode`](topiq_error::StatusCode).

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode as HttpStatus,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use topiq_error::{BrokerError, ErrorExt, ErrorResponse, GenericError, LogLevel, StatusCode};
use tracing::{debug, error, info};

use crate::pubsub::Broker;

type SharedBroker = Arc<Broker>;
type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Тело запросов, адресующих тему.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRequest {
    pub topic: String,
}

/// Тело запросов, адресующих подписку.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub topic: String,
    pub subscription: String,
}

/// Тело запроса публикации.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    pub topic: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionsQuery {
    #[serde(default)]
    pub topic: String,
}

/// Ошибка, готовая к отправке клиенту.
#[derive(Debug)]
pub struct ApiError(ErrorResponse);

impl ApiError {
    fn from_ext<E: ErrorExt>(err: &E) -> Self {
        let code = err.status_code();
        let tags = err.metrics_tags();
        let message = err.log_message();
        match code.log_level() {
            LogLevel::Debug => debug!(?tags, error = %message, "Request failed"),
            LogLevel::Info => info!(?tags, error = %message, "Request failed"),
            LogLevel::Error => error!(?tags, error = %message, "Request failed"),
        }
        Self(ErrorResponse::from_error(err))
    }

    #[cfg(test)]
    fn response(&self) -> &ErrorResponse {
        &self.0
    }
}

impl From<BrokerError> for ApiError {
    fn from(err: BrokerError) -> Self {
        Self::from_ext(&err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::from_ext(&GenericError::new(
            StatusCode::ParseError,
            rejection.body_text(),
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            HttpStatus::from_u16(self.0.http_status()).unwrap_or(HttpStatus::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}

/// Собирает `Router` со всеми маршрутами брокера.
pub fn router(broker: SharedBroker) -> Router {
    Router::new()
        .route("/ping", get(health_check))
        .route(
            "/topics",
            get(list_topics).post(create_topic).delete(delete_topic),
        )
        .route(
            "/subscriptions",
            get(list_subscriptions)
                .post(create_subscription)
                .delete(delete_subscription),
        )
        .route("/publish", post(publish))
        .route("/consume", post(consume))
        .route("/stats", get(stats))
        .with_state(broker)
}

fn decode<T>(body: JsonBody<T>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(ApiError::from)
}

/// `GET /ping`
async fn health_check() -> impl IntoResponse {
    Json(json!({ "message": "pong" }))
}

/// `GET /topics`
async fn list_topics(State(broker): State<SharedBroker>) -> impl IntoResponse {
    Json(json!({ "topics": broker.list_topics() }))
}

/// `POST /topics`
async fn create_topic(
    State(broker): State<SharedBroker>,
    body: JsonBody<TopicRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = decode(body)?;
    broker.create_topic(&req.topic)?;
    Ok((
        HttpStatus::CREATED,
        Json(json!({ "message": format!("Created topic: {}", req.topic) })),
    ))
}

/// `DELETE /topics`
async fn delete_topic(
    State(broker): State<SharedBroker>,
    body: JsonBody<TopicRequest>,
) -> Result<HttpStatus, ApiError> {
    let req = decode(body)?;
    broker.delete_topic(&req.topic);
    Ok(HttpStatus::NO_CONTENT)
}

/// `GET /subscriptions?topic=`
async fn list_subscriptions(
    State(broker): State<SharedBroker>,
    Query(query): Query<SubscriptionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let subscriptions = broker.list_subscriptions(&query.topic)?;
    Ok(Json(subscriptions))
}

/// `POST /subscriptions`
async fn create_subscription(
    State(broker): State<SharedBroker>,
    body: JsonBody<SubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = decode(body)?;
    broker.subscribe(&req.topic, &req.subscription)?;
    Ok((HttpStatus::CREATED, Json(req)))
}

/// `DELETE /subscriptions`
async fn delete_subscription(
    State(broker): State<SharedBroker>,
    body: JsonBody<SubscriptionRequest>,
) -> Result<HttpStatus, ApiError> {
    let req = decode(body)?;
    broker.unsubscribe(&req.topic, &req.subscription)?;
    Ok(HttpStatus::NO_CONTENT)
}

/// `POST /publish`
async fn publish(
    State(broker): State<SharedBroker>,
    body: JsonBody<MessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = decode(body)?;
    broker.publish(&req.topic, &req.content);
    Ok((HttpStatus::CREATED, Json(req)))
}

/// `POST /consume`
async fn consume(
    State(broker): State<SharedBroker>,
    body: JsonBody<SubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = decode(body)?;
    let message = broker.consume(&req.topic, &req.subscription)?;
    Ok(Json(json!({ "message": message })))
}

/// `GET /stats`
async fn stats(State(broker): State<SharedBroker>) -> impl IntoResponse {
    Json(broker.stats())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_broker_errors_map_to_bad_request() {
        let cases = [
            BrokerError::invalid_argument("empty"),
            BrokerError::AlreadyExists { topic: "t".into() },
            BrokerError::topic_not_found("t"),
            BrokerError::subscription_not_found("t", "s"),
            BrokerError::EmptyQueue {
                topic: "t".into(),
                subscription: "s".into(),
            },
        ];
        for err in cases {
            let expected_code = err.status_code().code();
            let api: ApiError = err.into();
            assert_eq!(api.response().code, expected_code);
            assert_eq!(api.into_response().status(), HttpStatus::BAD_REQUEST);
        }
    }

    #[test]
    fn test_error_body_keeps_message() {
        let api: ApiError = BrokerError::topic_not_found("orders").into();
        assert_eq!(api.response().error, "topic not found: orders");
        assert!(!api.response().retryable);
    }

    /// Тест проверяет, что пустая очередь помечается как повторяемая.
    #[test]
    fn test_empty_queue_is_retryable() {
        let api: ApiError = BrokerError::EmptyQueue {
            topic: "orders".into(),
            subscription: "billing".into(),
        }
        .into();
        assert!(api.response().retryable);
    }

    /// Тест проверяет, что в лог ошибки попадают теги темы и подписки.
    #[test]
    fn test_error_log_carries_tags() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let _: ApiError = BrokerError::EmptyQueue {
                topic: "orders".into(),
                subscription: "billing".into(),
            }
            .into();
        });

        let out = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("Request failed"));
        assert!(out.contains("\"topic\", \"orders\""));
        assert!(out.contains("\"subscription\", \"billing\""));
    }
}
