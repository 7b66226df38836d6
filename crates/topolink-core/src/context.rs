// ── Provisioning context ──
//
// The flat key/value record handed to the renderer. Stages only ever add
// keys: setting a key twice is a `ContextConflict`, and there is no removal.

use indexmap::IndexMap;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::{CoreError, Stage};
use crate::model::{EquipmentDetail, LinkMode, Site};

/// Keys of the provisioning context. The `Display` form is the template
/// placeholder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum ContextKey {
    #[strum(serialize = "NUMINSTALLATION")]
    InstallationId,
    #[strum(serialize = "TOPOSSNMP")]
    SnmpCommunity,
    #[strum(serialize = "TOPOSRW")]
    RwPassword,
    #[strum(serialize = "TOPOSHOSTNAME")]
    Hostname,
    #[strum(serialize = "TOPOSIP")]
    ManagementIp,
    #[strum(serialize = "NEWSSID")]
    Ssid,
    #[strum(serialize = "LINKLABEL")]
    LinkLabel,
    #[strum(serialize = "MODE")]
    Mode,
    #[strum(serialize = "MODE_TEXT")]
    ModeText,
}

impl ContextKey {
    /// Placeholder name used in templates.
    pub fn template_key(self) -> &'static str {
        self.into()
    }

    /// Whether rendering requires this key.
    pub fn is_mandatory(self) -> bool {
        !matches!(self, Self::LinkLabel)
    }
}

/// Accumulated, monotonically enriched record passed to the renderer.
#[derive(Debug, Clone, Default)]
pub struct ProvisioningContext {
    fields: IndexMap<ContextKey, String>,
}

impl ProvisioningContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Fails if `key` is already present.
    pub fn enrich(
        &mut self,
        stage: Stage,
        key: ContextKey,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        if self.fields.contains_key(&key) {
            return Err(CoreError::ContextConflict {
                stage,
                key: key.template_key(),
            });
        }
        self.fields.insert(key, value.into());
        Ok(())
    }

    /// Add the installation fields.
    pub fn add_site(&mut self, site: &Site) -> Result<(), CoreError> {
        self.enrich(
            Stage::SiteLookup,
            ContextKey::InstallationId,
            &site.installation_id,
        )?;
        self.enrich(
            Stage::SiteLookup,
            ContextKey::SnmpCommunity,
            &site.snmp_community,
        )?;
        self.enrich(Stage::SiteLookup, ContextKey::RwPassword, &site.rw_password)
    }

    /// Add the equipment identity fields.
    pub fn add_equipment(&mut self, detail: &EquipmentDetail) -> Result<(), CoreError> {
        self.enrich(
            Stage::EquipmentDetail,
            ContextKey::Hostname,
            &detail.hostname,
        )?;
        self.enrich(
            Stage::EquipmentDetail,
            ContextKey::ManagementIp,
            &detail.management_ip,
        )
    }

    /// Add both spellings of the link mode from one canonical value.
    pub fn add_mode(&mut self, mode: LinkMode) -> Result<(), CoreError> {
        self.enrich(Stage::Derive, ContextKey::Mode, mode.code())?;
        self.enrich(Stage::Derive, ContextKey::ModeText, mode.label())
    }

    pub fn get(&self, key: ContextKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: ContextKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Mandatory keys not yet set, as template names.
    pub fn missing_mandatory(&self) -> Vec<&'static str> {
        ContextKey::iter()
            .filter(|k| k.is_mandatory() && !self.contains(*k))
            .map(ContextKey::template_key)
            .collect()
    }

    /// Fields in insertion order, keyed by template name.
    pub fn template_vars(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.template_key(), v.as_str()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn site() -> Site {
        Site {
            installation_id: "4821".into(),
            snmp_community: "snmp".into(),
            rw_password: "rw".into(),
        }
    }

    #[test]
    fn template_keys() {
        assert_eq!(ContextKey::InstallationId.template_key(), "NUMINSTALLATION");
        assert_eq!(ContextKey::ModeText.template_key(), "MODE_TEXT");
        assert_eq!(ContextKey::Ssid.to_string(), "NEWSSID");
    }

    #[test]
    fn enrich_refuses_overwrite() {
        let mut ctx = ProvisioningContext::new();
        ctx.enrich(Stage::Derive, ContextKey::Ssid, "lien1-1").unwrap();
        let err = ctx
            .enrich(Stage::Derive, ContextKey::Ssid, "lien2-1")
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::ContextConflict {
                key: "NEWSSID",
                ..
            }
        ));
        assert_eq!(ctx.get(ContextKey::Ssid), Some("lien1-1"));
    }

    #[test]
    fn adding_site_twice_conflicts() {
        let mut ctx = ProvisioningContext::new();
        ctx.add_site(&site()).unwrap();
        assert!(ctx.add_site(&site()).is_err());
        assert_eq!(ctx.len(), 3);
    }

    #[test]
    fn mode_populates_both_spellings() {
        let mut ctx = ProvisioningContext::new();
        ctx.add_mode(LinkMode::StationBridge).unwrap();
        assert_eq!(ctx.get(ContextKey::Mode), Some("station-bridge"));
        assert_eq!(ctx.get(ContextKey::ModeText), Some("station bridge"));
    }

    #[test]
    fn missing_mandatory_excludes_link_label() {
        let mut ctx = ProvisioningContext::new();
        ctx.add_site(&site()).unwrap();
        ctx.add_equipment(&EquipmentDetail {
            hostname: "wap-a".into(),
            management_ip: "10.0.0.2".into(),
        })
        .unwrap();
        ctx.add_mode(LinkMode::Bridge).unwrap();
        assert_eq!(ctx.missing_mandatory(), vec!["NEWSSID"]);

        ctx.enrich(Stage::Derive, ContextKey::Ssid, "lien1-4821").unwrap();
        assert!(ctx.missing_mandatory().is_empty());
    }

    #[test]
    fn template_vars_keep_insertion_order() {
        let mut ctx = ProvisioningContext::new();
        ctx.add_site(&site()).unwrap();
        let keys: Vec<_> = ctx.template_vars().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["NUMINSTALLATION", "TOPOSSNMP", "TOPOSRW"]);
    }
}
