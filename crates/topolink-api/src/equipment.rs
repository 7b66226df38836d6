// Equipment endpoints
//
// The list lives on a separate REST-style route (PUT, path-parameterized by
// client and site); the per-equipment record is a webservice method.

use serde_json::json;
use tracing::debug;

use crate::auth::Session;
use crate::client::{ToposClient, decode};
use crate::error::Error;
use crate::models::{EquipmentId, EquipmentListing, EquipmentRecord};

impl ToposClient {
    /// List the equipment installed at a site.
    ///
    /// `PUT installations-immediate-interactions/{client_id}/{site_id}`.
    /// Accepts a bare array or `{equipments: [...]}`; anything else is
    /// [`Error::Format`].
    pub async fn list_equipments(
        &self,
        session: &Session,
        client_id: &str,
        site_id: &str,
    ) -> Result<EquipmentListing, Error> {
        let url = self.equipment_list_url(client_id, site_id)?;
        debug!(client_id, site_id, "listing equipments");

        let body = self.put(session, url).await?;
        if !(body.is_array() || body.get("equipments").is_some()) {
            return Err(Error::Format(format!(
                "equipment list is neither an array nor an object with `equipments`: {}",
                preview(&body)
            )));
        }
        decode(body)
    }

    /// Fetch the detail record for one equipment.
    ///
    /// `POST webservice_passconfig {method: "equipements_fiche", parameters: {ID}}`
    pub async fn equipment_record(
        &self,
        session: &Session,
        equipment_id: &EquipmentId,
    ) -> Result<EquipmentRecord, Error> {
        debug!(%equipment_id, "fetching equipment record");
        self.fetch_record(session, "equipements_fiche", &json!({ "ID": equipment_id }))
            .await
    }
}

fn preview(body: &serde_json::Value) -> String {
    body.to_string().chars().take(120).collect()
}
