// ── Domain model ──
//
// Validated counterparts of the raw TOPOS records. A `Site` or
// `EquipmentDetail` only exists once every field the configuration needs
// has been checked (see `convert`).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

pub use topolink_api::EquipmentId;

/// A physical installation and its shared management credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    pub installation_id: String,
    pub snmp_community: String,
    #[serde(skip_serializing)]
    pub rw_password: String,
}

/// One equipment entry offered for selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: Option<String>,
    pub category: Option<String>,
    pub model: Option<String>,
}

impl Equipment {
    /// Display name, falling back to the id.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// Management identity of the selected equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentDetail {
    pub hostname: String,
    pub management_ip: String,
}

/// Logical link identifier derived from the management IP.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LinkLabel {
    Lien1,
    Lien2,
    Lien3,
}

/// Radio mode written to the wAP 60G interface.
///
/// One canonical value with two spellings: [`code`](Self::code) is the
/// RouterOS keyword, [`label`](Self::label) the descriptive text.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LinkMode {
    #[default]
    Bridge,
    ApBridge,
    StationBridge,
}

impl LinkMode {
    /// RouterOS `mode=` keyword.
    pub fn code(self) -> &'static str {
        match self {
            Self::Bridge => "bridge",
            Self::ApBridge => "ap-bridge",
            Self::StationBridge => "station-bridge",
        }
    }

    /// Descriptive spelling. `bridge` keeps its historical text so
    /// existing templates render unchanged.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bridge => "bridge",
            Self::ApBridge => "access point bridge",
            Self::StationBridge => "station bridge",
        }
    }
}
