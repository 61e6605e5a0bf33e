//! # HTTP Server
//!
//! Binds the configured address and serves the router until Ctrl-C.

use std::net::SocketAddr;

use axum::Router;
use clinic_core::{ClinicConfig, ClinicService};
use log::info;
use tokio::net::TcpListener;

use crate::routes::router;

/// HTTP server for the clinic records API
pub struct HttpServer {
    config: ClinicConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: ClinicConfig, service: ClinicService) -> Self {
        Self {
            config,
            router: router(service),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until a shutdown signal arrives, then drain in-flight requests.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), err),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!("event=http_start module=server status=ok addr={}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("event=http_stop module=server status=ok");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("event=shutdown_signal module=server status=ok");
    }
}
