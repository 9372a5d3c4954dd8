//! Saltwire relay server binary.
//!
//! # Usage
//!
//! ```bash
//! # Loopback on the default port
//! saltwire-server
//!
//! # Custom bind address
//! saltwire-server --bind 0.0.0.0:3000
//! ```

use clap::Parser;
use saltwire_server::{RelayConfig, RelayServer};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Saltwire encrypted-chat relay server
#[derive(Parser, Debug)]
#[command(name = "saltwire-server")]
#[command(about = "Broadcast relay for saltwire encrypted chat")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    bind: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("saltwire relay starting");

    let server = RelayServer::bind(RelayConfig { bind_address: args.bind }).await?;

    tracing::info!("listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
