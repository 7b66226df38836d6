// ── Runtime connection configuration ──
//
// Describes how to reach the TOPOS service. Built by the CLI from profile
// settings and flags; core never reads config files.

use std::time::Duration;

use topolink_api::client::DEFAULT_BASE_URL;
use topolink_api::{TlsMode, ToposClient, TransportConfig};
use url::Url;

use crate::error::{CoreError, Stage};

/// Connection settings for one TOPOS endpoint.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL; endpoint paths are appended to it.
    pub url: Url,
    pub tls: TlsMode,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Application name sent with the login call, if any.
    pub login_application: Option<String>,
}

impl ServiceConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsMode::default(),
            timeout: None,
            login_application: None,
        }
    }

    /// Settings for the public TOPOS service.
    pub fn production() -> Result<Self, CoreError> {
        let url = Url::parse(DEFAULT_BASE_URL).map_err(|e| CoreError::Config {
            message: format!("invalid default URL: {e}"),
        })?;
        Ok(Self::new(url))
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }

    /// Build the HTTP client for this endpoint.
    pub fn connect(&self) -> Result<ToposClient, CoreError> {
        let client = ToposClient::new(self.url.clone(), &self.transport())
            .map_err(|e| CoreError::api(Stage::Authenticate, e))?;
        Ok(match &self.login_application {
            Some(app) => client.with_login_application(app.clone()),
            None => client,
        })
    }
}
