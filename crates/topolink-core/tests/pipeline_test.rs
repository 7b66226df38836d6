#![allow(clippy::unwrap_used)]
// End-to-end pipeline tests against a wiremock TOPOS.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use topolink_core::{
    CoreError, Credentials, Equipment, EquipmentChoice, EquipmentId, InputProvider,
    InventoryResolver, LinkLabel, LinkMode, OctetPolicy, ProgressObserver, ProvisionOptions,
    Provisioner, ServiceConfig, Stage, ToposClient,
};

// ── Helpers ─────────────────────────────────────────────────────────

const WEBSERVICE: &str = "/interactions-equipements/webservice_passconfig";
const LIST: &str = "/interactions-equipements/installations-immediate-interactions/12/4821";

const TEMPLATE: &str = "\
/system identity set name={{ TOPOSHOSTNAME }}
/snmp community set [ find default=yes ] name={{ TOPOSSNMP }}
/user set admin password={{ TOPOSRW }}
/interface w60g set wlan60-1 mode={{ MODE }} ssid={{ NEWSSID }} comment=\"{{ MODE_TEXT }} site {{ NUMINSTALLATION }}\"
/ip address add address={{ TOPOSIP }}/24 interface=bridge
# {{ UNUSED }}
";

struct Scripted {
    choice: EquipmentChoice,
    offered: Vec<Equipment>,
}

impl Scripted {
    fn pick(choice: EquipmentChoice) -> Self {
        Self {
            choice,
            offered: Vec::new(),
        }
    }
}

impl InputProvider for Scripted {
    fn credentials(&mut self) -> Result<Credentials, CoreError> {
        Ok(Credentials::new("jdoe", "hunter2"))
    }

    fn client_id(&mut self) -> Result<String, CoreError> {
        Ok("12".into())
    }

    fn site_id(&mut self) -> Result<String, CoreError> {
        Ok("4821".into())
    }

    fn select_equipment(&mut self, equipments: &[Equipment]) -> Result<EquipmentChoice, CoreError> {
        self.offered = equipments.to_vec();
        Ok(self.choice.clone())
    }
}

#[derive(Default)]
struct Stages(Vec<Stage>);

impl ProgressObserver for Stages {
    fn stage_finished(&mut self, stage: Stage) {
        self.0.push(stage);
    }
}

struct Fixture {
    server: MockServer,
    client: ToposClient,
    dir: tempfile::TempDir,
}

impl Fixture {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let client = ServiceConfig::new(Url::parse(&server.uri()).unwrap())
            .connect()
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("template.j2"), TEMPLATE).unwrap();
        Self {
            server,
            client,
            dir,
        }
    }

    fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn options(&self) -> ProvisionOptions {
        ProvisionOptions {
            template_path: self.dir.path().join("template.j2"),
            output_dir: Some(self.out_dir()),
            mode: LinkMode::Bridge,
            octet_policy: OctetPolicy::Lenient,
        }
    }

    async fn mount_rpc(&self, rpc: &str, reply: Value, times: u64) {
        Mock::given(method("POST"))
            .and(path(WEBSERVICE))
            .and(body_partial_json(json!({ "method": rpc })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    async fn mount_login(&self) {
        self.mount_rpc("login", json!({ "response": { "new_JWT": "jwt-1" } }), 1)
            .await;
    }

    async fn mount_site(&self, times: u64) {
        self.mount_rpc(
            "installations_fiche",
            json!({ "response": { "record": {
                "IDInstallation": 4821,
                "SnmpCommunity": "ro-4821",
                "PasswordRW": "rw-secret"
            } } }),
            times,
        )
        .await;
    }

    async fn mount_list(&self, body: Value, times: u64) {
        Mock::given(method("PUT"))
            .and(path(LIST))
            .and(header("authorization", "Bearer jwt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    async fn mount_detail(&self, admin_ip: &str, times: u64) {
        self.mount_rpc(
            "equipements_fiche",
            json!({ "response": { "record": { "Hostname": "wap-a", "AdminIP": admin_ip } } }),
            times,
        )
        .await;
    }

    fn written_files(&self) -> Vec<String> {
        list_dir(&self.out_dir())
    }
}

fn list_dir(dir: &Path) -> Vec<String> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn two_equipments() -> Value {
    json!({ "equipments": [
        { "id": 55, "name": "wAP A", "category": "radio", "modele": "wAP 60G" },
        { "id": "56", "name": "wAP B" }
    ] })
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_run_writes_rendered_script() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_site(1).await;
    fx.mount_list(two_equipments(), 1).await;
    fx.mount_detail("10.0.0.2", 1).await;

    let mut input = Scripted::pick(EquipmentChoice::Index(0));
    let mut stages = Stages::default();
    let outcome = Provisioner::new(&fx.client, fx.options())
        .run(&mut input, &mut stages)
        .await
        .unwrap();

    assert_eq!(input.offered.len(), 2);
    assert_eq!(input.offered[0].model.as_deref(), Some("wAP 60G"));

    let path = outcome.path.unwrap();
    assert_eq!(path, fx.out_dir().join("mikrotik_wap-a.rsc"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "\
/system identity set name=wap-a
/snmp community set [ find default=yes ] name=ro-4821
/user set admin password=rw-secret
/interface w60g set wlan60-1 mode=bridge ssid=lien1-4821 comment=\"bridge site 4821\"
/ip address add address=10.0.0.2/24 interface=bridge
# {{ UNUSED }}
"
    );

    let summary = outcome.summary;
    assert_eq!(summary.installation_id, "4821");
    assert_eq!(summary.ssid, "lien1-4821");
    assert_eq!(summary.link_label, LinkLabel::Lien1);
    assert_eq!(summary.hostname, "wap-a");
    assert_eq!(summary.rw_password, "rw-secret");

    assert_eq!(
        stages.0,
        vec![
            Stage::Authenticate,
            Stage::SiteLookup,
            Stage::EquipmentList,
            Stage::Selection,
            Stage::EquipmentDetail,
            Stage::Derive,
            Stage::Render,
            Stage::Write,
        ]
    );
}

#[tokio::test]
async fn test_select_by_id_and_station_mode() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_site(1).await;
    fx.mount_list(two_equipments(), 1).await;
    Mock::given(method("POST"))
        .and(path(WEBSERVICE))
        .and(body_partial_json(json!({
            "method": "equipements_fiche",
            "parameters": { "ID": "56" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "record": { "Hostname": "wap-b", "AdminIP": "10.0.0.4" } }
        })))
        .expect(1)
        .mount(&fx.server)
        .await;

    let options = ProvisionOptions {
        mode: LinkMode::StationBridge,
        output_dir: None,
        ..fx.options()
    };
    let outcome = Provisioner::new(&fx.client, options)
        .run(&mut Scripted::pick(EquipmentChoice::Id("56".into())), &mut Stages::default())
        .await
        .unwrap();

    assert!(outcome.path.is_none());
    assert!(fx.written_files().is_empty());
    assert_eq!(outcome.document.file_name, "mikrotik_wap-b.rsc");
    assert!(outcome.document.text.contains("mode=station-bridge ssid=lien2-4821"));
    assert!(outcome.document.text.contains("comment=\"station bridge site 4821\""));
}

#[tokio::test]
async fn test_bare_array_listing() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_site(1).await;
    fx.mount_list(json!([{ "id": 55, "name": "wAP A" }]), 1).await;
    fx.mount_detail("10.0.0.6", 1).await;

    let outcome = Provisioner::new(&fx.client, fx.options())
        .run(&mut Scripted::pick(EquipmentChoice::Index(0)), &mut Stages::default())
        .await
        .unwrap();
    assert_eq!(outcome.summary.ssid, "lien3-4821");
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_without_token_stops_the_run() {
    let fx = Fixture::new().await;
    fx.mount_rpc("login", json!({ "response": {} }), 1).await;
    fx.mount_site(0).await;
    fx.mount_list(two_equipments(), 0).await;
    fx.mount_detail("10.0.0.2", 0).await;

    let err = Provisioner::new(&fx.client, fx.options())
        .run(&mut Scripted::pick(EquipmentChoice::Index(0)), &mut Stages::default())
        .await
        .unwrap_err();

    assert!(err.is_auth());
    assert_eq!(err.stage(), Some(Stage::Authenticate));
    assert!(fx.written_files().is_empty());
}

#[tokio::test]
async fn test_login_rejection_message_is_auth_error() {
    let fx = Fixture::new().await;
    fx.mount_rpc("login", json!({ "response": "Identifiants invalides" }), 1)
        .await;
    fx.mount_site(0).await;

    let err = Provisioner::new(&fx.client, fx.options())
        .run(&mut Scripted::pick(EquipmentChoice::Index(0)), &mut Stages::default())
        .await
        .unwrap_err();

    assert!(err.is_auth(), "{err}");
    assert_eq!(err.stage(), Some(Stage::Authenticate));
}

#[tokio::test]
async fn test_out_of_range_selection_makes_no_detail_call() {
    for index in [-1, 2] {
        let fx = Fixture::new().await;
        fx.mount_login().await;
        fx.mount_site(1).await;
        fx.mount_list(two_equipments(), 1).await;
        fx.mount_detail("10.0.0.2", 0).await;

        let err = Provisioner::new(&fx.client, fx.options())
            .run(&mut Scripted::pick(EquipmentChoice::Index(index)), &mut Stages::default())
            .await
            .unwrap_err();

        assert!(
            matches!(err, CoreError::Selection { available: 2, .. }),
            "index {index}: {err:?}"
        );
        assert!(fx.written_files().is_empty());
    }
}

#[tokio::test]
async fn test_empty_listing_is_selection_error() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_site(1).await;
    fx.mount_list(json!({ "equipments": [] }), 1).await;
    fx.mount_detail("10.0.0.2", 0).await;

    let err = Provisioner::new(&fx.client, fx.options())
        .run(&mut Scripted::pick(EquipmentChoice::Index(0)), &mut Stages::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Selection { available: 0, .. }));
}

#[tokio::test]
async fn test_missing_snmp_community_stops_before_listing() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_rpc(
        "installations_fiche",
        json!({ "response": { "record": { "IDInstallation": "4821", "PasswordRW": "rw" } } }),
        1,
    )
    .await;
    fx.mount_list(two_equipments(), 0).await;

    let err = Provisioner::new(&fx.client, fx.options())
        .run(&mut Scripted::pick(EquipmentChoice::Index(0)), &mut Stages::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::DataMissing {
            stage: Stage::SiteLookup,
            field: "SnmpCommunity",
            ..
        }
    ));
}

#[tokio::test]
async fn test_unexpected_listing_shape_is_format_error() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_site(1).await;
    fx.mount_list(json!({ "items": [] }), 1).await;

    let err = Provisioner::new(&fx.client, fx.options())
        .run(&mut Scripted::pick(EquipmentChoice::Index(0)), &mut Stages::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Format {
            stage: Stage::EquipmentList,
            ..
        }
    ));
}

#[tokio::test]
async fn test_expired_session_during_listing_is_auth_error() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_site(1).await;
    Mock::given(method("PUT"))
        .and(path(LIST))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&fx.server)
        .await;

    let err = Provisioner::new(&fx.client, fx.options())
        .run(&mut Scripted::pick(EquipmentChoice::Index(0)), &mut Stages::default())
        .await
        .unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.stage(), Some(Stage::EquipmentList));
}

#[tokio::test]
async fn test_strict_octet_rejects_unmapped_address() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_site(1).await;
    fx.mount_list(two_equipments(), 1).await;
    fx.mount_detail("10.0.0.9", 1).await;

    let options = ProvisionOptions {
        octet_policy: OctetPolicy::Strict,
        ..fx.options()
    };
    let err = Provisioner::new(&fx.client, options)
        .run(&mut Scripted::pick(EquipmentChoice::Index(0)), &mut Stages::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidAddress { .. }));
    assert!(fx.written_files().is_empty());
}

#[tokio::test]
async fn test_lenient_octet_falls_back_to_lien1() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_site(1).await;
    fx.mount_list(two_equipments(), 1).await;
    fx.mount_detail("10.0.0.9", 1).await;

    let outcome = Provisioner::new(&fx.client, fx.options())
        .run(&mut Scripted::pick(EquipmentChoice::Index(0)), &mut Stages::default())
        .await
        .unwrap();
    assert_eq!(outcome.summary.ssid, "lien1-4821");
}

#[tokio::test]
async fn test_missing_template_writes_nothing() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_site(1).await;
    fx.mount_list(two_equipments(), 1).await;
    fx.mount_detail("10.0.0.2", 1).await;

    let options = ProvisionOptions {
        template_path: fx.dir.path().join("missing.j2"),
        ..fx.options()
    };
    let err = Provisioner::new(&fx.client, options)
        .run(&mut Scripted::pick(EquipmentChoice::Index(0)), &mut Stages::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Render { .. }));
    assert!(fx.written_files().is_empty());
}

// ── Direct lookups ──────────────────────────────────────────────────

#[tokio::test]
async fn test_equipment_lookup_without_site() {
    let fx = Fixture::new().await;
    fx.mount_login().await;
    fx.mount_site(0).await;
    fx.mount_detail("10.0.0.5", 1).await;

    let session = fx
        .client
        .login(&Credentials::new("jdoe", "hunter2"))
        .await
        .unwrap();
    let resolver = InventoryResolver::new(&fx.client);
    let detail = resolver
        .lookup_equipment(&session, &EquipmentId::Numeric(55))
        .await
        .unwrap();

    assert_eq!(detail.hostname, "wap-a");
    assert_eq!(detail.management_ip, "10.0.0.5");
    assert!(resolver.site().is_none());
}
