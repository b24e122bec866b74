//! Gateway configuration.

use std::time::Duration;

use clap::Parser;

/// dealbase HTTP/JSON gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "dealbase-gateway")]
#[command(about = "HTTP/JSON gateway for the dealbase record service")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Address of the dealbase server (NNG address).
    #[arg(short, long, default_value = "tcp://127.0.0.1:9700")]
    pub server: String,

    /// Client request timeout (ms) for NNG send/recv.
    #[arg(long, default_value_t = 30_000)]
    pub client_timeout_ms: u64,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Address of the dealbase server.
    pub server_addr: String,
    /// Client request timeout for NNG send/recv.
    pub client_timeout: Duration,
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            server_addr: args.server.clone(),
            client_timeout: Duration::from_millis(args.client_timeout_ms),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            server_addr: "tcp://127.0.0.1:9700".to_string(),
            client_timeout: Duration::from_secs(30),
        }
    }
}
