use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors raised while handling a single request.
///
/// Every variant is converted into a plain-text HTTP response; none of them
/// ever reaches the process.
#[derive(Error, Debug)]
pub enum FileServerError {
    #[error("Authentication required.")]
    Unauthorized { realm: String },

    #[error("File {} not found!", .0.display())]
    NotFound(PathBuf),

    #[error("Error reading directory: {0}.")]
    DirectoryRead(std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path is outside root directory")]
    PathTraversal,
}

impl FileServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            FileServerError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            FileServerError::NotFound(_) => StatusCode::NOT_FOUND,
            FileServerError::DirectoryRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FileServerError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            FileServerError::PathTraversal => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for FileServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, self.to_string()).into_response();

        if let FileServerError::Unauthorized { realm } = &self {
            let challenge = format!("Basic realm=\"{}\"", realm.replace('"', "'"));
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }

        response
    }
}

/// Errors that abort startup before any connection is accepted.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Error generating password hash: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    HashTask(#[from] tokio::task::JoinError),

    #[error("Failed to load config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    RootDirectory(String),

    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path() {
        let err = FileServerError::NotFound(PathBuf::from("/srv/missing.txt"));
        assert_eq!(err.to_string(), "File /srv/missing.txt not found!");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_directory_read_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = FileServerError::DirectoryRead(io);
        assert_eq!(err.to_string(), "Error reading directory: denied.");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthorized_response_carries_challenge() {
        let response = FileServerError::Unauthorized {
            realm: "Protected Area".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"Protected Area\""
        );
    }

    #[test]
    fn test_other_errors_have_no_challenge() {
        let response = FileServerError::PathTraversal.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
