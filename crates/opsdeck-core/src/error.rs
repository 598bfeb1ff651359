// ── Core error types ──
//
// User-facing errors from opsdeck-core. Consumers never see raw
// transport errors; the `From<opsdeck_api::Error>` impl translates them
// into the taxonomy the stores and views work with. Client-side
// validation failures never reach the network and carry the full
// field-error map for form rendering.

use thiserror::Error;

use crate::validate::FieldErrors;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // ── Transport ────────────────────────────────────────────────────
    /// The request never reached the server (connectivity, DNS, timeout).
    #[error("network error: {message}")]
    Network { message: String },

    // ── Authentication ───────────────────────────────────────────────
    /// Credentials rejected, or a 401 that survived the token refresh.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    // ── Client-side validation ───────────────────────────────────────
    /// Form input rejected before dispatch; nothing was sent.
    #[error("validation failed: {fields}")]
    Validation { fields: FieldErrors },

    // ── Server rejections ────────────────────────────────────────────
    /// Uniqueness or state conflict (e.g. duplicate supplier).
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The addressed record does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// 5xx, or a response body that did not match its schema.
    #[error("server error: {message}")]
    Server { status: Option<u16>, message: String },

    /// Any other HTTP rejection.
    #[error("request rejected (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Local failures ───────────────────────────────────────────────
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Session persistence failed.
    #[error("session storage error: {message}")]
    Storage { message: String },
}

impl CoreError {
    /// Returns `true` if this error should send the user back to login.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The field-error map, when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { fields } => Some(fields),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<opsdeck_api::Error> for CoreError {
    fn from(err: opsdeck_api::Error) -> Self {
        match err {
            opsdeck_api::Error::Network(e) => CoreError::Network {
                message: e.to_string(),
            },
            opsdeck_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            opsdeck_api::Error::Auth { message } => CoreError::Auth { message },
            opsdeck_api::Error::Conflict { message } => CoreError::Conflict { message },
            opsdeck_api::Error::NotFound { message } => CoreError::NotFound { message },
            opsdeck_api::Error::Client { status, message } => CoreError::Api { status, message },
            opsdeck_api::Error::Server { status, message } => CoreError::Server {
                status: Some(status),
                message,
            },
            opsdeck_api::Error::Decode { message, body: _ } => CoreError::Server {
                status: None,
                message: format!("malformed response: {message}"),
            },
            opsdeck_api::Error::Storage { message } => CoreError::Storage { message },
        }
    }
}

impl From<FieldErrors> for CoreError {
    fn from(fields: FieldErrors) -> Self {
        CoreError::Validation { fields }
    }
}
