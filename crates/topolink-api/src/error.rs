use thiserror::Error;

/// Top-level error type for the `topolink-api` crate.
///
/// Covers every failure mode of the two TOPOS endpoints: authentication,
/// transport, HTTP status and response decoding. `topolink-core` attaches
/// the pipeline stage and maps these into its own error kinds.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, or a later call answered HTTP 401 (session invalid).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The login response did not carry a `new_JWT` token.
    #[error("Login response did not contain a token")]
    MissingToken,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-2xx HTTP status other than 401.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Body was not valid JSON, or did not match the expected type.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Body was valid JSON but had an unexpected shape.
    #[error("Unexpected response shape: {0}")]
    Format(String),
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// HTTP status code attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
