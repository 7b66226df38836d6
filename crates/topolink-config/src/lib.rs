//! Shared configuration for the topolink CLI.
//!
//! TOML profiles merged with `TOPOLINK_` environment variables, credential
//! resolution (env + prompt, never stored), and translation to
//! `topolink_core::ServiceConfig` / `ProvisionOptions`. The CLI layers its
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use topolink_core::{LinkMode, OctetPolicy, ProvisionOptions, ServiceConfig, TlsMode};

/// Environment variable holding the TOPOS username.
pub const USERNAME_ENV: &str = "TOPOLINK_USERNAME";
/// Environment variable holding the TOPOS password.
pub const PASSWORD_ENV: &str = "TOPOLINK_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named TOPOS profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

/// Name of the implicit profile.
pub const DEFAULT_PROFILE: &str = "default";

/// Connection settings shared by every profile unless the profile overrides
/// them.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds. Unset means no timeout.
    pub timeout: Option<u64>,
}

/// A named TOPOS profile. Passwords are never stored here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// TOPOS base URL. Defaults to the public service.
    pub url: Option<String>,

    pub username: Option<String>,

    /// TOPOS client number, used to list equipment.
    pub client_id: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Override the default timeout (seconds).
    pub timeout: Option<u64>,

    /// RouterOS template path.
    pub template: Option<PathBuf>,

    /// Directory the `.rsc` file is written to.
    pub output_dir: Option<PathBuf>,

    pub mode: Option<LinkMode>,

    /// Reject management IPs whose last octet is outside 1-6.
    pub strict_octet: Option<bool>,

    /// Application name sent with the login call.
    pub application: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("tech", "dc-wifi", "topolink").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("topolink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Nested keys use a double underscore: `TOPOLINK_DEFAULTS__TIMEOUT=10`.
/// The credential variables are left to [`resolve_username`] and
/// [`resolve_password`].
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("TOPOLINK_")
                .ignore(&["USERNAME", "PASSWORD"])
                .split("__"),
        );

    Ok(figment.extract()?)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile selection ───────────────────────────────────────────────

impl Config {
    /// Name of the profile to use: the explicit one, else `default_profile`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.into())
    }

    /// Look up the active profile. An explicitly requested profile must
    /// exist; the implicit default falls back to an empty profile.
    pub fn profile(&self, requested: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = self.active_profile_name(requested);
        match self.profiles.get(&name) {
            Some(p) => Ok((name, p.clone())),
            None if requested.is_none() => Ok((name, Profile::default())),
            None => Err(ConfigError::UnknownProfile { name }),
        }
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Username from `TOPOLINK_USERNAME`, else the profile.
pub fn resolve_username(profile: &Profile) -> Option<String> {
    std::env::var(USERNAME_ENV)
        .ok()
        .filter(|u| !u.is_empty())
        .or_else(|| profile.username.clone())
}

/// Password from `TOPOLINK_PASSWORD`. There is no stored fallback; the CLI
/// prompts when this returns `None`.
pub fn resolve_password() -> Option<SecretString> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
}

// ── Translation to core types ───────────────────────────────────────

/// Build a `ServiceConfig` from a profile and global defaults, without CLI
/// flag overrides.
pub fn profile_to_service_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ServiceConfig, ConfigError> {
    let mut cfg = match &profile.url {
        Some(raw) => {
            let url = raw.parse().map_err(|_| ConfigError::Validation {
                field: "url".into(),
                reason: format!("invalid URL: {raw}"),
            })?;
            ServiceConfig::new(url)
        }
        None => ServiceConfig::production().map_err(|e| ConfigError::Validation {
            field: "url".into(),
            reason: e.to_string(),
        })?,
    };

    cfg.tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };
    cfg.timeout = profile
        .timeout
        .or(defaults.timeout)
        .map(Duration::from_secs);
    cfg.login_application.clone_from(&profile.application);

    Ok(cfg)
}

/// Pipeline options configured by a profile.
pub fn profile_to_options(profile: &Profile) -> ProvisionOptions {
    let base = ProvisionOptions::default();
    ProvisionOptions {
        template_path: profile.template.clone().unwrap_or(base.template_path),
        output_dir: profile.output_dir.clone().or(base.output_dir),
        mode: profile.mode.unwrap_or(base.mode),
        octet_policy: if profile.strict_octet.unwrap_or(false) {
            OctetPolicy::Strict
        } else {
            base.octet_policy
        },
    }
}
