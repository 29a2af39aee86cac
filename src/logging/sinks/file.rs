use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling::daily};
use tracing_subscriber::{fmt, layer::Layer as LayerTrait, registry::LookupSpan};

use crate::logging::config::LoggingConfig;

/// Файловый layer с ежедневной ротацией.
///
/// Запись идёт через non-blocking writer; `WorkerGuard` нужно держать до
/// завершения процесса, иначе хвост логов потеряется.
pub fn layer_with_config<S>(
    config: &LoggingConfig
) -> Option<(Box<dyn LayerTrait<S> + Send + Sync>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    if !config.file.enabled {
        return None;
    }

    let file_appender = daily(&config.file.dir, &config.file.filename);
    let (writer, guard) = non_blocking(file_appender);

    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    Some((Box::new(layer), guard))
}
