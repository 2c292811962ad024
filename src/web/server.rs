//! Web server for the data room.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::file::{DataRoomService, FileStorage};
use crate::{DataRoomError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router, create_swagger_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// Creates the storage directory if needed.
    pub fn new(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.web.host, config.web.port)
            .parse()
            .map_err(|e| {
                DataRoomError::Config(format!(
                    "invalid web server address {}:{}: {}",
                    config.web.host, config.web.port, e
                ))
            })?;

        let storage = FileStorage::new(&config.storage.path)?;
        tracing::info!("File storage initialized at: {}", config.storage.path);

        Ok(Self::with_service(
            addr,
            Arc::new(DataRoomService::new(storage)),
            config.storage.max_upload_bytes(),
            config.web.cors_origins.clone(),
        ))
    }

    /// Create a web server over an existing service.
    pub fn with_service(
        addr: SocketAddr,
        service: Arc<DataRoomService>,
        max_upload_size: u64,
        cors_origins: Vec<String>,
    ) -> Self {
        Self {
            addr,
            app_state: Arc::new(AppState::new(service, max_upload_size)),
            cors_origins,
        }
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Build the full application router.
    pub fn router(&self) -> Router {
        create_router(self.app_state.clone(), &self.cors_origins)
            .merge(create_health_router())
            .merge(create_swagger_router())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
