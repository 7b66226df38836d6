// TOPOS authentication
//
// `login` posts the credentials to the webservice and returns a bearer
// token. The token is never refreshed: a 401 on any later call surfaces as
// `Error::Authentication` and the caller has to log in again.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::ToposClient;
use crate::error::Error;

/// Username and password for the TOPOS webservice.
///
/// Provided once per run, never persisted.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// An authenticated TOPOS session: the bearer token from `login`.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// The raw bearer token.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// Attach `Authorization: Bearer <token>` to a request.
    pub(crate) fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(self.token.expose_secret())
    }
}

impl ToposClient {
    /// Authenticate with username/password.
    ///
    /// `POST webservice_passconfig {method: "login"}`. The token is read
    /// from `response.new_JWT`. Any other reply, including a rejection
    /// message in place of the `response` object, is
    /// [`Error::MissingToken`].
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, Error> {
        let mut parameters = Map::new();
        parameters.insert("username".into(), Value::from(credentials.username.clone()));
        parameters.insert(
            "password".into(),
            Value::from(credentials.password.expose_secret()),
        );
        if let Some(app) = self.login_application() {
            parameters.insert("application".into(), Value::from(app));
        }

        debug!(username = %credentials.username, "logging in");

        let body = self.invoke(None, "login", &parameters).await?;
        let token = login_token(&body).ok_or(Error::MissingToken)?;

        debug!("login successful");
        Ok(Session::new(token))
    }
}

/// Non-empty string at `response.new_JWT`.
fn login_token(body: &Value) -> Option<&str> {
    body.pointer("/response/new_JWT")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}
