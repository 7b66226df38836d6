// TOPOS HTTP client
//
// Wraps `reqwest::Client` with TOPOS URL construction, bearer-token headers
// and envelope decoding. Endpoint helpers (login, site, equipment) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::auth::Session;
use crate::error::Error;
use crate::models::RecordReply;
use crate::transport::TransportConfig;

/// Default TOPOS host.
pub const DEFAULT_BASE_URL: &str = "https://www.dc-wifi.tech";

const WEBSERVICE_PATH: &str = "interactions-equipements/webservice_passconfig";
const EQUIPMENT_LIST_PATH: &str = "interactions-equipements/installations-immediate-interactions";

/// Raw HTTP client for the TOPOS webservice.
///
/// Holds no session state: every authenticated call takes the [`Session`]
/// returned by [`login`](Self::login).
pub struct ToposClient {
    http: reqwest::Client,
    base_url: Url,
    /// Optional `application` parameter sent with `login`.
    login_application: Option<String>,
}

impl ToposClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the TOPOS host root (e.g. `https://www.dc-wifi.tech`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            login_application: None,
        }
    }

    /// Send `application` alongside the credentials on login.
    pub fn with_login_application(mut self, application: impl Into<String>) -> Self {
        self.login_application = Some(application.into());
        self
    }

    pub(crate) fn login_application(&self) -> Option<&str> {
        self.login_application.as_deref()
    }

    /// The TOPOS base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn join(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// `{base}/interactions-equipements/webservice_passconfig`
    pub(crate) fn webservice_url(&self) -> Result<Url, Error> {
        self.join(WEBSERVICE_PATH)
    }

    /// `{base}/interactions-equipements/installations-immediate-interactions/{client}/{site}`
    pub(crate) fn equipment_list_url(&self, client_id: &str, site_id: &str) -> Result<Url, Error> {
        let mut url = self.join(EQUIPMENT_LIST_PATH)?;
        url.path_segments_mut()
            .map_err(|()| Error::Format(format!("base URL cannot be a base: {}", self.base_url)))?
            .push(client_id)
            .push(site_id);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Call a webservice method with the session's bearer token and return
    /// the raw JSON body.
    pub async fn call(
        &self,
        session: &Session,
        method: &str,
        parameters: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        self.invoke(Some(session), method, parameters).await
    }

    /// Call a method whose reply is `{ response: { record: {...} } }` and
    /// return the record.
    pub(crate) async fn fetch_record<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: &str,
        parameters: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let body = self.call(session, method, parameters).await?;
        let reply: RecordReply<T> = decode(body)?;
        reply
            .response
            .ok_or_else(|| Error::Format(format!("{method}: missing `response` object")))?
            .record
            .ok_or_else(|| Error::Format(format!("{method}: missing `response.record` object")))
    }

    /// POST `{ method, parameters }` to the webservice endpoint.
    pub(crate) async fn invoke(
        &self,
        session: Option<&Session>,
        method: &str,
        parameters: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        let url = self.webservice_url()?;
        debug!(method, "POST {}", url);

        let body = json!({
            "method": method,
            "parameters": parameters,
        });

        let mut builder = self.http.post(url).json(&body);
        if let Some(session) = session {
            builder = session.authorize(builder);
        }
        let resp = builder.send().await.map_err(Error::Transport)?;

        parse_json(resp).await
    }

    /// Send a PUT without a body, authenticated with the session token.
    pub(crate) async fn put(&self, session: &Session, url: Url) -> Result<Value, Error> {
        debug!("PUT {}", url);

        let resp = session
            .authorize(self.http.put(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_json(resp).await
    }
}

/// Check the HTTP status and parse the body as JSON.
pub(crate) async fn parse_json(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: "session expired or invalid credentials".into(),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}

/// Decode an already-parsed JSON body into a typed reply.
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T, Error> {
    let raw = body.to_string();
    serde_json::from_value(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: raw,
    })
}
