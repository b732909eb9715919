//! HTTP server lifecycle.

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// HTTP server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("Failed to bind to {0}: {1}")]
    BindFailed(String, String),

    /// Server encountered a fatal error.
    #[error("HTTP server error: {0}")]
    ServerFailed(String),
}

/// HTTP server serving a router until cancelled.
pub struct HttpServer {
    bind_address: String,
    router: Router,
    cancel: CancellationToken,
}

impl HttpServer {
    /// Create a new HTTP server.
    #[must_use]
    pub fn new(bind_address: impl Into<String>, router: Router, cancel: CancellationToken) -> Self {
        Self {
            bind_address: bind_address.into(),
            router,
            cancel,
        }
    }

    /// Bind the listener.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::BindFailed` if the address cannot be bound.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        TcpListener::bind(&self.bind_address)
            .await
            .map_err(|e| ServerError::BindFailed(self.bind_address.clone(), e.to_string()))
    }

    /// Run the server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::ServerFailed` on a fatal serve error.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let local = listener
            .local_addr()
            .map_or_else(|_| self.bind_address.clone(), |addr| addr.to_string());
        tracing::info!(address = %local, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| ServerError::ServerFailed(e.to_string()))?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
