// ── Core error types ──
//
// Every provisioning failure is terminal for the run. Each variant names the
// pipeline stage that failed so the CLI can tell the operator where the run
// stopped. `CoreError::api` translates transport-layer errors and attaches
// the stage.

use std::path::PathBuf;

use strum::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    Authenticate,
    SiteLookup,
    EquipmentList,
    Selection,
    EquipmentDetail,
    Derive,
    Render,
    Write,
}

impl Stage {
    /// Human-readable description used in progress output.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Authenticate => "Authenticating with TOPOS",
            Self::SiteLookup => "Fetching installation record",
            Self::EquipmentList => "Fetching equipment list",
            Self::Selection => "Selecting equipment",
            Self::EquipmentDetail => "Fetching equipment record",
            Self::Derive => "Deriving link parameters",
            Self::Render => "Rendering configuration",
            Self::Write => "Writing configuration file",
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote service ───────────────────────────────────────────────
    #[error("[{stage}] authentication failed: {message}")]
    Auth { stage: Stage, message: String },

    #[error("[{stage}] remote call failed: {message}")]
    Remote {
        stage: Stage,
        message: String,
        /// HTTP status code (if one was received).
        status: Option<u16>,
    },

    #[error("[{stage}] unexpected response shape: {message}")]
    Format { stage: Stage, message: String },

    #[error("[{stage}] {entity} record is missing required field `{field}`")]
    DataMissing {
        stage: Stage,
        entity: &'static str,
        field: &'static str,
    },

    // ── Operator input ───────────────────────────────────────────────
    #[error("[selection] equipment {requested} is not in the list of {available} equipment(s)")]
    Selection { requested: String, available: usize },

    #[error("[{stage}] could not read operator input: {message}")]
    Input { stage: Stage, message: String },

    // ── Derivation ───────────────────────────────────────────────────
    #[error("[derive] management IP '{address}' has no usable last octet (expected 1-6)")]
    InvalidAddress { address: String },

    #[error("[{stage}] context field {key} is already set")]
    ContextConflict { stage: Stage, key: &'static str },

    // ── Local files ──────────────────────────────────────────────────
    #[error("[render] cannot read template {}: {reason}", .path.display())]
    Render { path: PathBuf, reason: String },

    #[error("[render] context is missing mandatory field(s): {}", .missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },

    #[error("[write] cannot write {}: {reason}", .path.display())]
    Output { path: PathBuf, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Translate a transport-layer error raised during `stage`.
    pub fn api(stage: Stage, err: topolink_api::Error) -> Self {
        use topolink_api::Error as Api;

        let status = err.status();
        match err {
            Api::Authentication { message } => Self::Auth { stage, message },
            Api::MissingToken => Self::Auth {
                stage,
                message: "login response did not contain a token".into(),
            },
            Api::Transport(e) => Self::Remote {
                stage,
                status,
                message: e.to_string(),
            },
            Api::Tls(message) => Self::Remote {
                stage,
                message: format!("TLS error: {message}"),
                status: None,
            },
            Api::Status { status: code, body } => Self::Remote {
                stage,
                message: if body.is_empty() {
                    format!("HTTP {code}")
                } else {
                    format!("HTTP {code}: {body}")
                },
                status,
            },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Deserialization { message, body: _ } => Self::Format { stage, message },
            Api::Format(message) => Self::Format { stage, message },
        }
    }

    /// The stage this error aborted, if it is tied to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Auth { stage, .. }
            | Self::Remote { stage, .. }
            | Self::Format { stage, .. }
            | Self::DataMissing { stage, .. }
            | Self::Input { stage, .. }
            | Self::ContextConflict { stage, .. } => Some(*stage),
            Self::Selection { .. } => Some(Stage::Selection),
            Self::InvalidAddress { .. } => Some(Stage::Derive),
            Self::Render { .. } | Self::Incomplete { .. } => Some(Stage::Render),
            Self::Output { .. } => Some(Stage::Write),
            Self::Config { .. } => None,
        }
    }

    /// Returns `true` if logging in again might resolve this error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}
