//! dealbase HTTP/JSON gateway binary.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dealbase_client::{Client, ClientConfig};
use dealbase_gateway::{create_router, AppState, Args, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dealbase_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    info!(
        listen = %config.listen_addr,
        server = %config.server_addr,
        "starting dealbase gateway"
    );

    let client_config =
        ClientConfig::new(&config.server_addr).with_timeout(config.client_timeout);
    let client = Client::connect(client_config)?;
    info!("connected to record service");

    let state = AppState::new(client, config.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("gateway listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
