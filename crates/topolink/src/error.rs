//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use topolink_config::ConfigError;
use topolink_core::{CoreError, Stage};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const DATA: i32 = 4;
    pub const RENDER: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach TOPOS during {stage}: {reason}")]
    #[diagnostic(
        code(topolink::connection_failed),
        help(
            "Check network access to the TOPOS service and the configured URL.\n\
             Override it with --url or `url` in your profile."
        )
    )]
    ConnectionFailed { stage: Stage, reason: String },

    #[error("TLS verification failed during {stage}")]
    #[diagnostic(
        code(topolink::tls_error),
        help(
            "{reason}\n\
             Configure ca_cert in your profile, or use --insecure (-k) if you trust the network."
        )
    )]
    TlsError { stage: Stage, reason: String },

    #[error("TOPOS returned an error during {stage}: {message}")]
    #[diagnostic(code(topolink::api_error))]
    ApiError { stage: Stage, message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed during {stage}: {message}")]
    #[diagnostic(
        code(topolink::auth_failed),
        help(
            "Verify your TOPOS username and password.\n\
             A session rejected after login has expired: run the command again."
        )
    )]
    AuthFailed { stage: Stage, message: String },

    // ── Remote data ──────────────────────────────────────────────────

    #[error("The {entity} record has no `{field}`")]
    #[diagnostic(
        code(topolink::data_missing),
        help("Complete the {entity} record in TOPOS, then run the command again.")
    )]
    DataMissing {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Unexpected TOPOS response during {stage}: {message}")]
    #[diagnostic(code(topolink::format))]
    Format { stage: Stage, message: String },

    #[error("Management IP '{address}' does not map to a link")]
    #[diagnostic(
        code(topolink::invalid_address),
        help(
            "The last octet must be 1-6 (1,2 → lien1; 3,4 → lien2; 5,6 → lien3).\n\
             Drop --strict-octet to fall back to lien1."
        )
    )]
    InvalidAddress { address: String },

    // ── Operator input ───────────────────────────────────────────────

    #[error("Equipment {requested} is not available ({available} listed)")]
    #[diagnostic(
        code(topolink::selection),
        help("Run: topolink equipments --client <CLIENT> --site <SITE> to see the list")
    )]
    Selection { requested: String, available: usize },

    #[error("{message}")]
    #[diagnostic(code(topolink::input))]
    Input { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(topolink::validation))]
    Validation { field: String, reason: String },

    // ── Local files ──────────────────────────────────────────────────

    #[error("Cannot render the configuration: {reason}")]
    #[diagnostic(
        code(topolink::render),
        help("Point --template at a readable RouterOS template (default: templates/mikrotik_config.j2).")
    )]
    Render { reason: String },

    #[error("Cannot write {path}: {reason}")]
    #[diagnostic(code(topolink::output), help("Check that --output-dir exists and is writable."))]
    Output { path: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(topolink::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: topolink config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(topolink::config))]
    Config(Box<figment::Error>),

    #[error("Internal error: {0}")]
    #[diagnostic(code(topolink::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::DataMissing { .. } | Self::Format { .. } | Self::InvalidAddress { .. } => {
                exit_code::DATA
            }
            Self::Selection { .. }
            | Self::Input { .. }
            | Self::Validation { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            Self::Render { .. } | Self::Output { .. } => exit_code::RENDER,
            Self::ApiError { .. } | Self::Config(_) | Self::Internal(_) | Self::Io(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Auth { stage, message } => CliError::AuthFailed { stage, message },

            CoreError::Remote {
                stage,
                message,
                status: None,
            } => {
                if message.starts_with("TLS error") {
                    CliError::TlsError {
                        stage,
                        reason: message,
                    }
                } else {
                    CliError::ConnectionFailed {
                        stage,
                        reason: message,
                    }
                }
            }

            CoreError::Remote { stage, message, .. } => CliError::ApiError { stage, message },

            CoreError::Format { stage, message } => CliError::Format { stage, message },

            CoreError::DataMissing { entity, field, .. } => CliError::DataMissing { entity, field },

            CoreError::Selection {
                requested,
                available,
            } => CliError::Selection {
                requested,
                available,
            },

            CoreError::Input { message, .. } => CliError::Input { message },

            CoreError::InvalidAddress { address } => CliError::InvalidAddress { address },

            err @ (CoreError::Render { .. } | CoreError::Incomplete { .. }) => CliError::Render {
                reason: err.to_string(),
            },

            CoreError::Output { path, reason } => CliError::Output {
                path: path.display().to_string(),
                reason,
            },

            err @ CoreError::ContextConflict { .. } => CliError::Internal(err.to_string()),

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => {
                let cfg = topolink_config::load_config_or_default();
                let available: Vec<_> = cfg.profiles.keys().cloned().collect();
                CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                }
            }
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_kind() {
        let cases: Vec<(CoreError, i32)> = vec![
            (
                CoreError::Auth {
                    stage: Stage::Authenticate,
                    message: "x".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::Selection {
                    requested: "#9".into(),
                    available: 2,
                },
                exit_code::USAGE,
            ),
            (
                CoreError::DataMissing {
                    stage: Stage::EquipmentDetail,
                    entity: "equipment",
                    field: "AdminIP",
                },
                exit_code::DATA,
            ),
            (
                CoreError::Remote {
                    stage: Stage::SiteLookup,
                    message: "connection refused".into(),
                    status: None,
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::Render {
                    path: "t.j2".into(),
                    reason: "not found".into(),
                },
                exit_code::RENDER,
            ),
            (
                CoreError::Output {
                    path: "out".into(),
                    reason: "denied".into(),
                },
                exit_code::RENDER,
            ),
        ];
        for (core, code) in cases {
            let text = core.to_string();
            assert_eq!(CliError::from(core).exit_code(), code, "{text}");
        }
    }

    #[test]
    fn tls_failures_are_connection_errors() {
        let err = CliError::from(CoreError::Remote {
            stage: Stage::Authenticate,
            message: "TLS error: bad certificate".into(),
            status: None,
        });
        assert!(matches!(err, CliError::TlsError { .. }));
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn http_status_is_api_error() {
        let err = CliError::from(CoreError::Remote {
            stage: Stage::EquipmentList,
            message: "HTTP 500".into(),
            status: Some(500),
        });
        assert!(matches!(err, CliError::ApiError { stage: Stage::EquipmentList, .. }));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
