// ── Link parameter derivation ──
//
// Pure mapping from the management IP's last octet to the link label, and
// from label + installation id to the SSID. No I/O.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::context::{ContextKey, ProvisioningContext};
use crate::error::{CoreError, Stage};
use crate::model::LinkLabel;

/// What to do when the last octet is not one of 1-6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OctetPolicy {
    /// Fall back to `lien1` (historical output).
    #[default]
    Lenient,
    /// Reject the address.
    Strict,
}

/// Derived link parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkParameters {
    pub label: LinkLabel,
    pub ssid: String,
}

/// Label for a known octet value, `None` outside 1-6.
pub fn label_for_octet(octet: i64) -> Option<LinkLabel> {
    match octet {
        1 | 2 => Some(LinkLabel::Lien1),
        3 | 4 => Some(LinkLabel::Lien2),
        5 | 6 => Some(LinkLabel::Lien3),
        _ => None,
    }
}

/// Last dot-delimited segment of `address`, parsed as an integer.
pub fn last_octet(address: &str) -> Option<i64> {
    address.trim().rsplit('.').next()?.trim().parse().ok()
}

/// Map a management IP to its link label.
pub fn link_label(address: &str, policy: OctetPolicy) -> Result<LinkLabel, CoreError> {
    if let Some(label) = last_octet(address).and_then(label_for_octet) {
        return Ok(label);
    }
    match policy {
        OctetPolicy::Lenient => {
            warn!(address, "management IP last octet outside 1-6, using lien1");
            Ok(LinkLabel::Lien1)
        }
        OctetPolicy::Strict => Err(CoreError::InvalidAddress {
            address: address.to_owned(),
        }),
    }
}

/// `{label}-{installation_id}`
pub fn ssid(label: LinkLabel, installation_id: &str) -> String {
    format!("{label}-{installation_id}")
}

/// Derive label and SSID from the management IP and installation id.
pub fn derive_link_parameters(
    management_ip: &str,
    installation_id: &str,
    policy: OctetPolicy,
) -> Result<LinkParameters, CoreError> {
    let label = link_label(management_ip, policy)?;
    Ok(LinkParameters {
        label,
        ssid: ssid(label, installation_id),
    })
}

/// Derive from the fields already in `ctx` and add SSID and label to it.
pub fn enrich_context(
    ctx: &mut ProvisioningContext,
    policy: OctetPolicy,
) -> Result<LinkParameters, CoreError> {
    let ip = ctx
        .get(ContextKey::ManagementIp)
        .ok_or(CoreError::Incomplete {
            missing: vec![ContextKey::ManagementIp.template_key()],
        })?;
    let installation_id = ctx
        .get(ContextKey::InstallationId)
        .ok_or(CoreError::Incomplete {
            missing: vec![ContextKey::InstallationId.template_key()],
        })?;

    let params = derive_link_parameters(ip, installation_id, policy)?;
    ctx.enrich(Stage::Derive, ContextKey::Ssid, params.ssid.clone())?;
    ctx.enrich(Stage::Derive, ContextKey::LinkLabel, params.label.to_string())?;
    Ok(params)
}
