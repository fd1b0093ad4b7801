// src/serve/server.rs

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tracing::{error, trace, warn};

use crate::errors::ServeError;

/// Where to listen and which directory to expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub root: PathBuf,
}

/// Static file router for `root`.
///
/// Missing files yield 404; directory requests get `index.html` appended.
/// Only unsuccessful responses are logged.
pub fn router(root: impl AsRef<Path>) -> Router {
    let files = ServeDir::new(root.as_ref()).append_index_html_on_directories(true);

    Router::new()
        .fallback_service(files)
        .layer(middleware::from_fn(log_unsuccessful))
}

async fn log_unsuccessful(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        warn!(%method, %uri, status = status.as_u16(), "request not served");
    } else {
        trace!(%method, %uri, status = status.as_u16(), "request served");
    }

    response
}

/// A listener that is already bound, together with the router it will serve.
///
/// Binding is split from serving so that a port conflict surfaces before the
/// watcher starts.
pub struct BoundServer {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl std::fmt::Debug for BoundServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundServer")
            .field("local_addr", &self.local_addr)
            .finish()
    }
}

/// Bind the TCP listener for `config`. Fails fast if the port is taken.
pub async fn bind(config: &ServerConfig) -> Result<BoundServer, ServeError> {
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: config.addr,
            source,
        })?;
    let local_addr = listener.local_addr()?;

    Ok(BoundServer {
        listener,
        router: router(&config.root),
        local_addr,
    })
}

impl BoundServer {
    /// Actual bound address; differs from the configured one when port 0 was
    /// requested.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until the listener fails.
    pub async fn serve(self) -> Result<(), ServeError> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Serve on a background task for the rest of the process lifetime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let addr = self.local_addr;
            if let Err(err) = self.serve().await {
                error!(%addr, error = %err, "HTTP server stopped");
            }
        })
    }
}
