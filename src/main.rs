use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use topiq::{
    logging::init_logging,
    network::server::{self, shutdown_signal},
    Broker, Settings,
};

#[derive(Parser, Debug)]
#[command(name = "topiq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Topiq - in-memory pub/sub broker with an HTTP API", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        env = "TOPIQ_CONFIG",
        help = "Путь к файлу конфигурации (по умолчанию ./topiq.toml, если есть)"
    )]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Адрес для прослушивания, например 127.0.0.1:8080")]
    listen: Option<String>,

    #[arg(long, help = "Ёмкость очереди каждой подписки")]
    queue_capacity: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())
        .and_then(|s| s.override_with(cli.listen, cli.queue_capacity))
        .context("failed to load configuration")?;

    let logging =
        init_logging(&settings.logging).map_err(|e| anyhow!("failed to init logging: {e}"))?;

    let addr = settings.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let broker = Arc::new(Broker::new(settings.broker.queue_capacity));
    server::serve(listener, broker, shutdown_signal()).await?;

    info!("Topiq stopped");
    logging.shutdown();
    Ok(())
}
