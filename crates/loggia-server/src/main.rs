//! The `loggia-server` binary runs the device resolution and control
//! engine behind a WebSocket session endpoint.
//!
//! Environment:
//!
//! - `LOGGIA_PORT`: server port, defaulting to 3000
//! - `LOGGIA_JOURNAL`: path of the on-disk journal; without it the
//!   registry is purely in-memory.
//!
//! An empty registry is provisioned with the demo home layout on start.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use loggia_engine::engine::Engine;
use loggia_engine::error::Error;
use loggia_engine::registry::MemoryRegistry;

use tokio_util::sync::CancellationToken;

use tracing::info;

use loggia_server::seed;
use loggia_server::server::{DEFAULT_SERVER_PORT, Server};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt().init();

    let registry = match std::env::var("LOGGIA_JOURNAL") {
        Ok(path) => {
            info!("journaling to `{path}`");
            MemoryRegistry::with_journal(path)?
        }
        Err(_) => MemoryRegistry::new(),
    };

    seed::demo_home(&registry).await?;

    let port = std::env::var("LOGGIA_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_SERVER_PORT);

    let cancellation_token = CancellationToken::new();
    let canceller = cancellation_token.clone();
    let _ = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            canceller.cancel();
        }
    });

    Server::new(Engine::new(registry))
        .port(port)
        .run(cancellation_token)
        .await
}
