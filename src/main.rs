use std::sync::Arc;

use anyhow::Result;
use log::info;
use tokio::sync::broadcast;

use alloggio::config::{self, Config};
use alloggio::geo::{geocoding::GeocodeClient, routing::RoutingClient};
use alloggio::logger::setup_logger;
use alloggio::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    setup_logger()?;

    let config: Arc<Config> = Arc::new(config::read_config());

    // External clients are built once here and handed to the handlers.
    let state = AppState {
        routing: Arc::new(RoutingClient::new(config.routing_api_key.clone())),
        geocoding: Arc::new(GeocodeClient::new(&config)),
        config,
    };

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
            let _ = shutdown_tx.send(());
        }
    });

    web::start_http_server(state, shutdown_rx).await;

    Ok(())
}
