use std::{future::Future, io, sync::Arc};

use tokio::net::TcpListener;
use tracing::{error, info};

use super::http;
use crate::pubsub::Broker;

/// Запускает HTTP-сервер брокера на уже привязанном `listener`.
///
/// Сервер работает до завершения `shutdown`; активные запросы
/// дорабатываются (graceful shutdown).
pub async fn serve<F>(
    listener: TcpListener,
    broker: Arc<Broker>,
    shutdown: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(
        %addr,
        queue_capacity = broker.capacity(),
        "Broker listening"
    );

    axum::serve(listener, http::router(broker))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Ждёт Ctrl-C.
///
/// Если обработчик сигнала установить не удалось, future никогда не
/// завершается: сервер без сигнала лучше, чем сервер, остановившийся сразу.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет, что сервер останавливается по сигналу.
    #[tokio::test]
    async fn test_graceful_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(serve(listener, Arc::new(Broker::default()), async move {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        let res = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(res.is_ok());
    }
}
