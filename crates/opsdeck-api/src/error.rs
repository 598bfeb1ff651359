use thiserror::Error;

/// Top-level error type for the `opsdeck-api` crate.
///
/// Covers every failure mode of the transport layer: connectivity,
/// authentication (including a refresh that did not stick), typed HTTP
/// rejections, and malformed response bodies. `opsdeck-core` maps these
/// into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    /// The request never produced a usable response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Authentication ──────────────────────────────────────────────
    /// 401 that survived the single refresh attempt, a refresh that was
    /// itself rejected, or a plain credential failure on login.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    // ── HTTP rejections ─────────────────────────────────────────────
    /// 409 — the server rejected a mutation over a uniqueness or state
    /// conflict (e.g. duplicate supplier).
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// 404 — the addressed resource does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other 4xx.
    #[error("request rejected (HTTP {status}): {message}")]
    Client { status: u16, message: String },

    /// 5xx.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization of a success body failed, with the raw body
    /// for debugging.
    #[error("malformed response: {message}")]
    Decode { message: String, body: String },

    // ── Session persistence ─────────────────────────────────────────
    /// Reading or writing the persisted session failed.
    #[error("session storage error: {message}")]
    Storage { message: String },
}

impl Error {
    /// Returns `true` if this error means the session is no longer valid
    /// and re-authentication is required.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns `true` if this is a "not found" rejection.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a conflict rejection (409).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Conflict { .. } => Some(409),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}
