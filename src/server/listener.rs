//! Remoting gateway listener
//!
//! Binds the TCP listener and serves the remoting router on it with peer
//! addresses attached to every request.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::gateway::{Gateway, Responder};
use crate::server::config::ServerConfig;
use crate::server::http::{router, GatewayState};

/// HTTP front end for a [`Gateway`]
pub struct GatewayServer<R: Responder> {
    config: ServerConfig,
    state: GatewayState<R>,
}

impl<R: Responder> GatewayServer<R> {
    /// Create a new server with the given configuration and responder
    ///
    /// Opens the result log when one is configured.
    pub fn new(config: ServerConfig, responder: R) -> Result<Self> {
        config.validate()?;
        let state = GatewayState::new(&config, Gateway::new(responder))?;
        Ok(Self { config, state })
    }

    /// Router for mounting the gateway inside a larger axum app
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Run the server
    ///
    /// This method blocks until the listener fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Remoting gateway listening");
        self.serve_until(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// In-flight requests are answered before this returns.
    pub async fn serve_until<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .tcp_nodelay(self.config.tcp_nodelay)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
            })
            .await?;
        Ok(())
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
