use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use axum::{Router, middleware};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::{self, Authenticator};
use crate::config::Config;
use crate::error::StartupError;
use crate::{AppState, handlers, net};

/// Listen settings fixed at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Absolute directory to serve
    pub root_dir: PathBuf,
    /// Explicit listen address; discovered when unset
    pub bind: Option<IpAddr>,
}

impl ServerConfig {
    pub fn new(port: u16, root_dir: PathBuf) -> Self {
        Self {
            port,
            root_dir,
            bind: None,
        }
    }

    pub fn listen_ip(&self) -> IpAddr {
        self.bind.unwrap_or_else(net::listen_ip)
    }
}

/// Canonicalize `root` and check it is a directory.
pub fn resolve_root(root: &Path) -> Result<PathBuf, StartupError> {
    let root_dir = root.canonicalize().map_err(|e| {
        StartupError::RootDirectory(format!(
            "Root directory does not exist: {} ({})",
            root.display(),
            e
        ))
    })?;

    if !root_dir.is_dir() {
        return Err(StartupError::RootDirectory(format!(
            "Root path is not a directory: {}",
            root_dir.display()
        )));
    }

    Ok(root_dir)
}

/// Build the application router: auth gate in front of one catch-all handler.
pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(handlers::serve_path)
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A ready-to-run server. Construction needs a finished [`Authenticator`],
/// so the password hash always exists before anything is bound.
pub struct Server {
    server: ServerConfig,
    state: AppState,
}

impl Server {
    pub fn new(server: ServerConfig, config: Config, auth: Authenticator) -> Self {
        let state = AppState::new(server.root_dir.clone(), config, auth);
        Self { server, state }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Bind and serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<(), StartupError> {
        let ip = self.server.listen_ip();
        let addr = SocketAddr::new(ip, self.server.port);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| StartupError::Bind { addr, source })?;
        let local = listener.local_addr().map_err(StartupError::Serve)?;

        info!("Serving files from: {}", self.server.root_dir.display());
        info!(
            "Server is running on http://{}:{}",
            net::display_host(local.ip()),
            local.port()
        );
        if self.state.auth.is_protected() {
            info!("Password protection is enabled.");
        } else {
            info!("No password protection. Accessible by anyone on the local network.");
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(StartupError::Serve)?;

        info!("Server stopped");
        Ok(())
    }
}

/// Hash the password, then bind and serve.
///
/// A hashing failure returns before the [`Server`] exists, so no socket is
/// ever opened for it.
pub async fn start(
    server: ServerConfig,
    config: Config,
    password: Option<String>,
    hash_cost: u32,
) -> Result<(), StartupError> {
    let auth = Authenticator::configure_with_cost(password, hash_cost).await?;
    Server::new(server, config, auth).run().await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
