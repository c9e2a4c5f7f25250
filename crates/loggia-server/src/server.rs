use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::any;

use loggia_engine::engine::Engine;
use loggia_engine::error::{Error, ErrorKind};
use loggia_engine::registry::Registry;

use tokio::net::TcpListener;

use tokio_util::sync::CancellationToken;

use tracing::info;

use crate::session;

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// The WebSocket session server.
///
/// One engine is shared by every session; sessions run concurrently and
/// meet only at the registry, which linearizes updates to a device.
#[derive(Debug)]
pub struct Server<R: Registry + 'static> {
    engine: Arc<Engine<R>>,
    port: u16,
}

impl<R: Registry + 'static> Server<R> {
    /// Creates a [`Server`] over the given [`Engine`], listening on
    /// [`DEFAULT_SERVER_PORT`].
    #[must_use]
    #[inline]
    pub fn new(engine: Engine<R>) -> Self {
        Self {
            engine: Arc::new(engine),
            port: DEFAULT_SERVER_PORT,
        }
    }

    /// Sets the server port.
    #[must_use]
    #[inline]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Runs the server until the [`CancellationToken`] is cancelled.
    ///
    /// Sessions are accepted on the `/session` route; each upgrade spawns
    /// an independent session loop.
    ///
    /// # Errors
    ///
    /// An error is returned when the listener cannot be bound or the
    /// server fails while serving.
    pub async fn run(self, cancellation_token: CancellationToken) -> Result<(), Error> {
        let router = Router::new()
            .route("/session", any(session_upgrade::<R>))
            .with_state(self.engine);

        let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port));
        let listener = TcpListener::bind(address).await.map_err(|e| {
            Error::new(
                ErrorKind::Session,
                format!("Failed to bind `{address}`: {e}."),
            )
        })?;

        info!("listening on {address}");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { cancellation_token.cancelled().await })
            .await
            .map_err(|e| Error::new(ErrorKind::Session, format!("Server failed: {e}.")))
    }
}

async fn session_upgrade<R: Registry + 'static>(
    State(engine): State<Arc<Engine<R>>>,
    upgrade: WebSocketUpgrade,
) -> Response {
    upgrade.on_upgrade(move |socket| async move { session::run(engine.as_ref(), socket).await })
}
