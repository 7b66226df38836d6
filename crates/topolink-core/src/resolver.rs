// ── Inventory resolver ──
//
// Runs the dependent TOPOS lookups in order: installation record, then the
// equipment list, then (after the operator picks one) the equipment record.
// Every call is awaited before the next one starts and each object is fetched
// once per resolver.

use topolink_api::{Session, ToposClient};
use tracing::{debug, info};

use crate::context::{ContextKey, ProvisioningContext};
use crate::convert::{detail_from_record, site_from_record};
use crate::error::{CoreError, Stage};
use crate::model::{Equipment, EquipmentDetail, EquipmentId, Site};

/// Holds the installation record and equipment list while the operator
/// chooses which equipment to provision.
pub struct InventoryResolver<'a> {
    client: &'a ToposClient,
    site: Option<Site>,
    equipments: Vec<Equipment>,
}

impl<'a> InventoryResolver<'a> {
    pub fn new(client: &'a ToposClient) -> Self {
        Self {
            client,
            site: None,
            equipments: Vec::new(),
        }
    }

    /// Fetch the installation record for `site_id`, then the equipment list
    /// for `(client_id, site_id)`.
    pub async fn resolve(
        &mut self,
        session: &Session,
        client_id: &str,
        site_id: &str,
    ) -> Result<&[Equipment], CoreError> {
        self.lookup_site(session, site_id).await?;
        self.list_equipments(session, client_id, site_id).await
    }

    /// `installations_fiche` for `site_id`.
    pub async fn lookup_site(&mut self, session: &Session, site_id: &str) -> Result<&Site, CoreError> {
        info!(site_id, "{}", Stage::SiteLookup.describe());
        let record = self
            .client
            .installation_record(session, site_id)
            .await
            .map_err(|e| CoreError::api(Stage::SiteLookup, e))?;
        let site = site_from_record(record, site_id)?;
        debug!(installation_id = %site.installation_id, "installation record resolved");

        Ok(self.site.insert(site))
    }

    /// Equipment installed at `(client_id, site_id)`, in TOPOS order.
    pub async fn list_equipments(
        &mut self,
        session: &Session,
        client_id: &str,
        site_id: &str,
    ) -> Result<&[Equipment], CoreError> {
        info!(client_id, site_id, "{}", Stage::EquipmentList.describe());
        let listing = self
            .client
            .list_equipments(session, client_id, site_id)
            .await
            .map_err(|e| CoreError::api(Stage::EquipmentList, e))?;
        self.equipments = listing.into_vec().into_iter().map(Equipment::from).collect();
        debug!(count = self.equipments.len(), "equipment list resolved");

        Ok(&self.equipments)
    }

    /// The installation record, once [`resolve`](Self::resolve) has run.
    pub fn site(&self) -> Option<&Site> {
        self.site.as_ref()
    }

    pub fn equipments(&self) -> &[Equipment] {
        &self.equipments
    }

    /// Pick an equipment by zero-based position in the list. Negative or
    /// out-of-range indexes are a `Selection` error.
    pub fn select(&self, index: i64) -> Result<&Equipment, CoreError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.equipments.get(i))
            .ok_or_else(|| CoreError::Selection {
                requested: format!("#{index}"),
                available: self.equipments.len(),
            })
    }

    /// Pick an equipment by its TOPOS id.
    pub fn select_by_id(&self, raw_id: &str) -> Result<&Equipment, CoreError> {
        self.equipments
            .iter()
            .find(|e| e.id.matches(raw_id))
            .ok_or_else(|| CoreError::Selection {
                requested: format!("id {}", raw_id.trim()),
                available: self.equipments.len(),
            })
    }

    /// `equipements_fiche` for `equipment_id`. Needs no installation record.
    pub async fn lookup_equipment(
        &self,
        session: &Session,
        equipment_id: &EquipmentId,
    ) -> Result<EquipmentDetail, CoreError> {
        info!(%equipment_id, "{}", Stage::EquipmentDetail.describe());
        let record = self
            .client
            .equipment_record(session, equipment_id)
            .await
            .map_err(|e| CoreError::api(Stage::EquipmentDetail, e))?;
        let detail = detail_from_record(record)?;
        debug!(hostname = %detail.hostname, ip = %detail.management_ip, "equipment record resolved");
        Ok(detail)
    }

    /// Fetch the selected equipment's record and assemble the raw context
    /// (installation fields plus hostname and management IP).
    pub async fn resolve_detail(
        &self,
        session: &Session,
        equipment_id: &EquipmentId,
    ) -> Result<(EquipmentDetail, ProvisioningContext), CoreError> {
        let Some(site) = self.site.as_ref() else {
            return Err(CoreError::Incomplete {
                missing: vec![
                    ContextKey::InstallationId.template_key(),
                    ContextKey::SnmpCommunity.template_key(),
                    ContextKey::RwPassword.template_key(),
                ],
            });
        };

        let detail = self.lookup_equipment(session, equipment_id).await?;

        let mut ctx = ProvisioningContext::new();
        ctx.add_site(site)?;
        ctx.add_equipment(&detail)?;
        Ok((detail, ctx))
    }
}
