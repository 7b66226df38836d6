// ── Provisioning pipeline ──
//
// Drives one complete run: collect operator input, authenticate, resolve the
// installation and its equipment, let the operator choose, derive the link
// parameters, render the template and write the script. Any failure ends the
// run; nothing is written unless rendering succeeded.

use std::path::PathBuf;

use serde::Serialize;
use topolink_api::{Credentials, ToposClient};
use tracing::info;

use crate::derive::{OctetPolicy, enrich_context};
use crate::error::{CoreError, Stage};
use crate::model::{Equipment, LinkLabel, LinkMode};
use crate::render::{ConfigDocument, render_file};
use crate::resolver::InventoryResolver;

/// How the operator designated the equipment to provision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipmentChoice {
    /// Zero-based position in the listed equipment.
    Index(i64),
    /// TOPOS equipment id.
    Id(String),
}

/// Source of operator input. The CLI implements this with terminal prompts
/// or with command-line flags.
pub trait InputProvider {
    fn credentials(&mut self) -> Result<Credentials, CoreError>;

    fn client_id(&mut self) -> Result<String, CoreError>;

    fn site_id(&mut self) -> Result<String, CoreError>;

    /// Called once with the resolved equipment list.
    fn select_equipment(&mut self, equipments: &[Equipment]) -> Result<EquipmentChoice, CoreError>;
}

/// Stage notifications for progress display.
pub trait ProgressObserver {
    fn stage_started(&mut self, _stage: Stage) {}

    fn stage_finished(&mut self, _stage: Stage) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Run settings that do not come from the operator prompt.
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    pub template_path: PathBuf,
    /// Where to write the script. `None` renders without writing.
    pub output_dir: Option<PathBuf>,
    pub mode: LinkMode,
    pub octet_policy: OctetPolicy,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(crate::DEFAULT_TEMPLATE_PATH),
            output_dir: Some(PathBuf::from(".")),
            mode: LinkMode::default(),
            octet_policy: OctetPolicy::default(),
        }
    }
}

/// What was provisioned, for the closing recap.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionSummary {
    pub client_id: String,
    pub site_id: String,
    pub installation_id: String,
    pub equipment: Equipment,
    pub hostname: String,
    pub management_ip: String,
    pub ssid: String,
    pub link_label: LinkLabel,
    pub mode: LinkMode,
    pub snmp_community: String,
    #[serde(skip_serializing)]
    pub rw_password: String,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    pub document: ConfigDocument,
    /// Set when the document was written to disk.
    pub path: Option<PathBuf>,
    pub summary: ProvisionSummary,
}

/// Runs the provisioning pipeline against one TOPOS endpoint.
pub struct Provisioner<'a> {
    client: &'a ToposClient,
    options: ProvisionOptions,
}

impl<'a> Provisioner<'a> {
    pub fn new(client: &'a ToposClient, options: ProvisionOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &ProvisionOptions {
        &self.options
    }

    pub async fn run<I, P>(&self, input: &mut I, progress: &mut P) -> Result<ProvisionOutcome, CoreError>
    where
        I: InputProvider + ?Sized,
        P: ProgressObserver + ?Sized,
    {
        let credentials = input.credentials()?;
        let client_id = input.client_id()?;
        let site_id = input.site_id()?;

        // ── Authenticate ──
        progress.stage_started(Stage::Authenticate);
        info!(username = %credentials.username, "{}", Stage::Authenticate.describe());
        let session = self
            .client
            .login(&credentials)
            .await
            .map_err(|e| CoreError::api(Stage::Authenticate, e))?;
        drop(credentials);
        progress.stage_finished(Stage::Authenticate);

        // ── Installation + equipment list ──
        let mut resolver = InventoryResolver::new(self.client);
        progress.stage_started(Stage::SiteLookup);
        let site = resolver.lookup_site(&session, &site_id).await?.clone();
        progress.stage_finished(Stage::SiteLookup);

        progress.stage_started(Stage::EquipmentList);
        let listed = resolver
            .list_equipments(&session, &client_id, &site_id)
            .await?
            .len();
        progress.stage_finished(Stage::EquipmentList);

        // ── Selection ──
        progress.stage_started(Stage::Selection);
        if listed == 0 {
            return Err(CoreError::Selection {
                requested: "any equipment".into(),
                available: 0,
            });
        }
        let equipment = match input.select_equipment(resolver.equipments())? {
            EquipmentChoice::Index(index) => resolver.select(index)?,
            EquipmentChoice::Id(id) => resolver.select_by_id(&id)?,
        }
        .clone();
        info!(equipment = %equipment.display_name(), id = %equipment.id, "equipment selected");
        progress.stage_finished(Stage::Selection);

        // ── Equipment detail ──
        progress.stage_started(Stage::EquipmentDetail);
        let (detail, mut ctx) = resolver.resolve_detail(&session, &equipment.id).await?;
        progress.stage_finished(Stage::EquipmentDetail);

        // ── Derive ──
        progress.stage_started(Stage::Derive);
        let params = enrich_context(&mut ctx, self.options.octet_policy)?;
        ctx.add_mode(self.options.mode)?;
        info!(ssid = %params.ssid, label = %params.label, mode = %self.options.mode, "{}", Stage::Derive.describe());
        progress.stage_finished(Stage::Derive);

        // ── Render ──
        progress.stage_started(Stage::Render);
        let document = render_file(&self.options.template_path, &ctx)?;
        progress.stage_finished(Stage::Render);

        // ── Write ──
        let path = match &self.options.output_dir {
            Some(dir) => {
                progress.stage_started(Stage::Write);
                let path = document.write_to(dir)?;
                progress.stage_finished(Stage::Write);
                Some(path)
            }
            None => None,
        };

        let summary = ProvisionSummary {
            client_id,
            site_id,
            installation_id: site.installation_id,
            equipment,
            hostname: detail.hostname,
            management_ip: detail.management_ip,
            ssid: params.ssid,
            link_label: params.label,
            mode: self.options.mode,
            snmp_community: site.snmp_community,
            rw_password: site.rw_password,
        };

        Ok(ProvisionOutcome {
            document,
            path,
            summary,
        })
    }
}
