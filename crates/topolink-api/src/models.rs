// TOPOS webservice response types
//
// The webservice wraps every answer as `{ "response": { ... } }`; lookups
// carry a `record` object (login replies are read in `auth`). Record fields
// use TOPOS' own PascalCase names and are all optional here; which ones are
// required is decided by the caller, not by deserialization. Scalars accept
// a JSON string or number.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

// ── Envelopes ────────────────────────────────────────────────────────

/// `{ "response": { "record": { ... } } }`
#[derive(Debug, Deserialize)]
pub struct RecordReply<T> {
    pub response: Option<RecordBody<T>>,
}

#[derive(Debug, Deserialize)]
pub struct RecordBody<T> {
    pub record: Option<T>,
}

// ── Site ─────────────────────────────────────────────────────────────

/// Installation record from `installations_fiche`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteRecord {
    /// Echoed installation number; may be a JSON string or number.
    #[serde(
        default,
        rename = "IDInstallation",
        deserialize_with = "opt_string_or_number"
    )]
    pub installation_id: Option<String>,
    #[serde(
        default,
        rename = "SnmpCommunity",
        deserialize_with = "opt_string_or_number"
    )]
    pub snmp_community: Option<String>,
    #[serde(
        default,
        rename = "PasswordRW",
        deserialize_with = "opt_string_or_number"
    )]
    pub rw_password: Option<String>,
    /// Catch-all for fields we don't model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Equipment ────────────────────────────────────────────────────────

/// Equipment identifier as TOPOS sends it: a JSON number or a string.
///
/// Kept in its original JSON type so `equipements_fiche` receives the same
/// value the list returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EquipmentId {
    Numeric(i64),
    Text(String),
}

impl EquipmentId {
    /// Whether this id designates the same equipment as `raw` (operator
    /// input), comparing textual forms.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Self::Numeric(n) => raw.trim().parse::<i64>().is_ok_and(|r| r == *n),
            Self::Text(s) => s == raw.trim(),
        }
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for EquipmentId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<i64> for EquipmentId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

/// One entry of the site's equipment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSummary {
    pub id: EquipmentId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "modele")]
    pub model: Option<String>,
}

/// The equipment-list endpoint answers either with a bare array or with
/// the array wrapped under `equipments`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EquipmentListing {
    Bare(Vec<EquipmentSummary>),
    Wrapped { equipments: Vec<EquipmentSummary> },
}

impl EquipmentListing {
    pub fn into_vec(self) -> Vec<EquipmentSummary> {
        match self {
            Self::Bare(list) | Self::Wrapped { equipments: list } => list,
        }
    }
}

/// Equipment record from `equipements_fiche`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentRecord {
    #[serde(
        default,
        rename = "Hostname",
        deserialize_with = "opt_string_or_number"
    )]
    pub hostname: Option<String>,
    #[serde(
        default,
        rename = "AdminIP",
        deserialize_with = "opt_string_or_number"
    )]
    pub admin_ip: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Helpers ──────────────────────────────────────────────────────────

fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(d)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
