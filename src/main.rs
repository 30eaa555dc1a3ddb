use std::sync::Arc;

use ingest_relay::{serve, Dispatcher, RelayConfig};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!("relay stopped: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = RelayConfig::load()?;
    info!(
        bind_addr = %config.bind_addr,
        webhook_url = %config.webhook_url,
        queue_capacity = config.queue_capacity,
        signed = config.signing_secret.is_some(),
        "starting relay"
    );

    let dispatcher = Arc::new(Dispatcher::new(
        config.dispatcher_config(),
        Arc::new(config.forwarder()),
    ));

    let listener = TcpListener::bind(config.bind_addr).await?;
    serve(listener, dispatcher.clone(), async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl+C received, shutting down..."),
            Err(err) => warn!("failed to listen for Ctrl+C, shutting down: {}", err),
        }
    })
    .await?;

    dispatcher.shutdown().await;
    Ok(())
}
