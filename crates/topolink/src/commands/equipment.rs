//! `equipment`: show one equipment record by TOPOS id.

use serde::Serialize;

use topolink_core::{
    CoreError, EquipmentDetail, EquipmentId, InputProvider, InventoryResolver, Stage,
};

use crate::cli::{EquipmentArgs, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util::{TerminalInput, sign_in};

#[derive(Serialize)]
struct EquipmentReport {
    id: EquipmentId,
    #[serde(flatten)]
    detail: EquipmentDetail,
}

/// Operator input as an id: integers keep the numeric JSON type TOPOS lists use.
fn parse_id(raw: &str) -> Result<EquipmentId, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::Input {
            stage: Stage::EquipmentDetail,
            message: "equipment id cannot be empty".into(),
        });
    }
    Ok(raw
        .parse::<i64>()
        .map_or_else(|_| EquipmentId::from(raw), EquipmentId::Numeric))
}

pub async fn handle(
    resolved: &Resolved,
    args: &EquipmentArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = parse_id(&args.id)?;
    let mut input = TerminalInput::login(args.username.as_deref(), &resolved.profile);
    let credentials = input.credentials()?;

    let client = resolved.service.connect()?;
    let session = sign_in(&client, &credentials).await?;

    let detail = InventoryResolver::new(&client)
        .lookup_equipment(&session, &id)
        .await?;
    let report = EquipmentReport { id, detail };

    let out = output::render_single(&global.output, &report, table, |r| {
        r.detail.hostname.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn table(r: &EquipmentReport) -> String {
    format!(
        "ID:             {}\nHostname:       {}\nManagement IP:  {}",
        r.id, r.detail.hostname, r.detail.management_ip
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_keeps_numeric_type() {
        assert_eq!(parse_id(" 55 ").unwrap(), EquipmentId::Numeric(55));
        assert_eq!(parse_id("AB-9").unwrap(), EquipmentId::Text("AB-9".into()));
        assert!(matches!(
            parse_id("  "),
            Err(CoreError::Input {
                stage: Stage::EquipmentDetail,
                ..
            })
        ));
    }

    #[test]
    fn report_flattens_detail() {
        let report = EquipmentReport {
            id: EquipmentId::Numeric(55),
            detail: EquipmentDetail {
                hostname: "wap-a".into(),
                management_ip: "10.0.0.3".into(),
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["id"], 55);
        assert_eq!(json["hostname"], "wap-a");
        assert!(table(&report).contains("10.0.0.3"));
    }
}
