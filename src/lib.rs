//! Local-network file server.
//!
//! Serves a directory tree over plain HTTP: directories become HTML link
//! lists, files are streamed with a content type picked from their
//! extension. An optional shared password gates every request through HTTP
//! Basic authentication.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod mime;
pub mod net;
pub mod paths;
pub mod server;
pub mod stream;

use std::path::PathBuf;
use std::sync::Arc;

pub use auth::{AuthDecision, Authenticator};
pub use config::Config;
pub use error::{FileServerError, StartupError};
pub use mime::MimeResolver;
pub use server::{Server, ServerConfig, router};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Root directory to serve files from
    pub root_dir: PathBuf,
    /// Configuration
    pub config: Arc<Config>,
    /// Password gate
    pub auth: Authenticator,
    /// Content-type lookup
    pub mime: Arc<MimeResolver>,
}

impl AppState {
    pub fn new(root_dir: PathBuf, config: Config, auth: Authenticator) -> Self {
        let mime = MimeResolver::with_overrides(&config.mime_types, config.guess_mime_types);
        Self {
            root_dir,
            config: Arc::new(config),
            auth,
            mime: Arc::new(mime),
        }
    }
}
