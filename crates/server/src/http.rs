//! Server host utilities.

use std::net::SocketAddr;

use anyhow::{Context, Result, anyhow};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{AppState, router};

/// Host configuration for a Bragi HTTP server instance.
#[derive(Clone)]
pub struct BragiHttpServer {
    bind_address: SocketAddr,
    state: AppState,
}

impl BragiHttpServer {
    pub fn new(bind_address: SocketAddr, state: AppState) -> Self {
        Self { bind_address, state }
    }

    /// Bind the listener and serve in the background.
    ///
    /// Binding to port 0 picks a free port; read it back from
    /// [`RunningBragiHttpServer::bound_address`].
    pub async fn start(self) -> Result<RunningBragiHttpServer> {
        let cancellation_token = CancellationToken::new();
        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .with_context(|| format!("failed to bind {}", self.bind_address))?;
        let bound_address = listener.local_addr()?;
        let app = router(self.state);

        let server_handle = tokio::spawn({
            let shutdown = cancellation_token.child_token();
            async move {
                if let Err(serve_error) = axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        shutdown.cancelled().await;
                    })
                    .await
                {
                    error!(error = %serve_error, "HTTP server terminated");
                }
            }
        });

        info!(address = %bound_address, "HTTP server listening");
        Ok(RunningBragiHttpServer {
            bind_address: bound_address,
            cancellation_token,
            server_handle,
        })
    }
}

/// Runtime handle for a running server.
#[derive(Debug)]
pub struct RunningBragiHttpServer {
    bind_address: SocketAddr,
    cancellation_token: CancellationToken,
    server_handle: JoinHandle<()>,
}

impl RunningBragiHttpServer {
    pub fn bound_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Stop accepting connections, drain in-flight requests, and wait.
    pub async fn stop(self) -> Result<()> {
        self.cancellation_token.cancel();
        self.server_handle
            .await
            .map_err(|error| anyhow!("HTTP server task failed: {error}"))?;
        info!("HTTP server stopped");
        Ok(())
    }
}
