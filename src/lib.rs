/// Configuration loading: defaults, file, environment, CLI overrides.
pub mod config;
/// Flexible logging (formatting, filters, sinks).
pub mod logging;
/// HTTP API and server lifecycle.
pub mod network;
/// Pub/Sub: topic registry, subscriptions, bounded queues.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// config
pub use config::{BrokerSettings, ServerSettings, Settings};
/// Logging configuration and lifetime handle.
pub use logging::{LoggingConfig, LoggingHandle};
/// Pub/Sub API.
pub use pubsub::{BoundedQueue, Broker, BrokerStats, Payload, DEFAULT_QUEUE_CAPACITY};
/// Operation errors and result types.
pub use topiq_error::{BrokerError, BrokerResult, ErrorExt, StatusCode};
