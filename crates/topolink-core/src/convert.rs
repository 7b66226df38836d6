// ── API-to-domain conversions ──
//
// Bridges raw `topolink_api` records into validated domain types. Required
// fields that are absent or blank become `CoreError::DataMissing`; the only
// tolerated gap is the echoed installation id, which falls back to the id the
// operator asked for.

use topolink_api::{EquipmentRecord, EquipmentSummary, SiteRecord};
use tracing::debug;

use crate::error::{CoreError, Stage};
use crate::model::{Equipment, EquipmentDetail, Site};

fn required(
    value: Option<String>,
    stage: Stage,
    entity: &'static str,
    field: &'static str,
) -> Result<String, CoreError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(CoreError::DataMissing {
            stage,
            entity,
            field,
        })
}

/// Validate an installation record fetched for `requested_site_id`.
pub fn site_from_record(record: SiteRecord, requested_site_id: &str) -> Result<Site, CoreError> {
    let snmp_community = required(
        record.snmp_community,
        Stage::SiteLookup,
        "installation",
        "SnmpCommunity",
    )?;
    let rw_password = required(
        record.rw_password,
        Stage::SiteLookup,
        "installation",
        "PasswordRW",
    )?;

    let installation_id = match record
        .installation_id
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty())
    {
        Some(id) => id,
        None => {
            debug!(
                site_id = requested_site_id,
                "IDInstallation absent, using requested site id"
            );
            requested_site_id.trim().to_owned()
        }
    };

    Ok(Site {
        installation_id,
        snmp_community,
        rw_password,
    })
}

/// Validate the equipment record of the selected equipment.
pub fn detail_from_record(record: EquipmentRecord) -> Result<EquipmentDetail, CoreError> {
    Ok(EquipmentDetail {
        hostname: required(
            record.hostname,
            Stage::EquipmentDetail,
            "equipment",
            "Hostname",
        )?,
        management_ip: required(
            record.admin_ip,
            Stage::EquipmentDetail,
            "equipment",
            "AdminIP",
        )?,
    })
}

impl From<EquipmentSummary> for Equipment {
    fn from(raw: EquipmentSummary) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            category: raw.category,
            model: raw.model,
        }
    }
}
