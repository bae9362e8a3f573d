//! Shared-password HTTP Basic authentication.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};

use crate::AppState;
use crate::error::{FileServerError, StartupError};

/// bcrypt work factor used for the startup hash.
pub const HASH_COST: u32 = 10;

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingHeader,
    InvalidHeader,
    MalformedCredentials,
    WrongPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed,
    Rejected(RejectReason),
}

impl AuthDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthDecision::Allowed)
    }
}

/// Holds the process-wide password hash, or nothing in open mode.
///
/// The hash is fixed at construction; clones share it.
#[derive(Clone, Default)]
pub struct Authenticator {
    password_hash: Option<Arc<str>>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("protected", &self.is_protected())
            .finish()
    }
}

impl Authenticator {
    /// Every request is allowed.
    pub fn open() -> Self {
        Self::default()
    }

    /// Hash `password` (if any) with [`HASH_COST`].
    ///
    /// Hashing runs on the blocking pool; the returned authenticator is ready
    /// to gate requests.
    pub async fn configure(password: Option<String>) -> Result<Self, StartupError> {
        Self::configure_with_cost(password, HASH_COST).await
    }

    pub async fn configure_with_cost(
        password: Option<String>,
        cost: u32,
    ) -> Result<Self, StartupError> {
        let Some(password) = password else {
            return Ok(Self::open());
        };

        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

        Ok(Self::from_hash(hash))
    }

    /// Use an existing bcrypt hash.
    pub fn from_hash(hash: impl Into<Arc<str>>) -> Self {
        Self {
            password_hash: Some(hash.into()),
        }
    }

    pub fn is_protected(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Check a candidate password against the stored hash. Always true in
    /// open mode.
    pub fn verify_password(&self, candidate: &[u8]) -> bool {
        match &self.password_hash {
            None => true,
            Some(hash) => bcrypt::verify(candidate, hash).unwrap_or(false),
        }
    }

    /// Decide whether the request carrying `headers` may proceed.
    pub async fn authorize(&self, headers: &HeaderMap) -> AuthDecision {
        if !self.is_protected() {
            return AuthDecision::Allowed;
        }

        let candidate = match password_from_headers(headers) {
            Ok(candidate) => candidate,
            Err(reason) => return AuthDecision::Rejected(reason),
        };

        let auth = self.clone();
        let matched = tokio::task::spawn_blocking(move || auth.verify_password(&candidate))
            .await
            .unwrap_or(false);

        if matched {
            AuthDecision::Allowed
        } else {
            AuthDecision::Rejected(RejectReason::WrongPassword)
        }
    }
}

/// Extract the password half of `Authorization: Basic <base64(user:pass)>`.
///
/// Everything after the first colon is the password; the user part is
/// ignored.
fn password_from_headers(headers: &HeaderMap) -> Result<Vec<u8>, RejectReason> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(RejectReason::MissingHeader)?
        .to_str()
        .map_err(|_| RejectReason::InvalidHeader)?;

    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or(RejectReason::InvalidHeader)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(RejectReason::InvalidHeader);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| RejectReason::InvalidHeader)?;

    let colon = decoded
        .iter()
        .position(|b| *b == b':')
        .ok_or(RejectReason::MalformedCredentials)?;

    Ok(decoded[colon + 1..].to_vec())
}

/// Authentication middleware.
///
/// Runs in front of every route; rejected requests get a 401 challenge and
/// never reach the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, FileServerError> {
    let headers = req.headers();
    let decision = state.auth.authorize(headers).await;

    match decision {
        AuthDecision::Allowed => Ok(next.run(req).await),
        AuthDecision::Rejected(reason) => {
            if reason == RejectReason::MissingHeader {
                debug!("No credentials for {}", req.uri().path());
            } else {
                warn!("Rejected credentials for {}: {:?}", req.uri().path(), reason);
            }
            Err(FileServerError::Unauthorized {
                realm: state.config.realm.clone(),
            })
        }
    }
}
