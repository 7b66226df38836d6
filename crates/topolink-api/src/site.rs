// Site (installation) endpoint
//
// `installations_fiche` is a webservice method keyed by the installation
// number entered by the operator.

use serde_json::json;
use tracing::debug;

use crate::auth::Session;
use crate::client::ToposClient;
use crate::error::Error;
use crate::models::SiteRecord;

impl ToposClient {
    /// Fetch the installation record for a site.
    ///
    /// `POST webservice_passconfig {method: "installations_fiche", parameters: {ID}}`
    pub async fn installation_record(
        &self,
        session: &Session,
        site_id: &str,
    ) -> Result<SiteRecord, Error> {
        debug!(site_id, "fetching installation record");
        self.fetch_record(session, "installations_fiche", &json!({ "ID": site_id }))
            .await
    }
}
