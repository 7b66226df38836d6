//! `equipments`: list the equipment installed at a site.

use serde::Serialize;
use tabled::Tabled;

use topolink_core::{Equipment, InputProvider, InventoryResolver};

use crate::cli::{EquipmentsArgs, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util::{TerminalInput, sign_in};

/// An equipment with its position in the list, the value `--equipment-index` takes.
#[derive(Serialize)]
struct Listed<'a> {
    index: usize,
    #[serde(flatten)]
    equipment: &'a Equipment,
}

#[derive(Tabled)]
struct EquipmentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Model")]
    model: String,
}

fn to_row(l: &Listed<'_>) -> EquipmentRow {
    EquipmentRow {
        index: l.index,
        id: l.equipment.id.to_string(),
        name: l.equipment.display_name(),
        category: l.equipment.category.clone().unwrap_or_default(),
        model: l.equipment.model.clone().unwrap_or_default(),
    }
}

fn listed(equipments: &[Equipment]) -> Vec<Listed<'_>> {
    equipments
        .iter()
        .enumerate()
        .map(|(index, equipment)| Listed { index, equipment })
        .collect()
}

pub async fn handle(
    resolved: &Resolved,
    args: &EquipmentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut input = TerminalInput::new(&args.site, &resolved.profile);
    let credentials = input.credentials()?;
    let client_id = input.client_id()?;
    let site_id = input.site_id()?;

    let client = resolved.service.connect()?;
    let session = sign_in(&client, &credentials).await?;

    let mut resolver = InventoryResolver::new(&client);
    let equipments = resolver.resolve(&session, &client_id, &site_id).await?;
    if equipments.is_empty() {
        if !global.quiet {
            eprintln!("No equipment recorded for site {site_id}");
        }
        return Ok(());
    }

    let out = output::render_list(
        &global.output,
        &listed(equipments),
        to_row,
        |l| l.equipment.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use topolink_core::EquipmentId;

    use super::*;

    #[test]
    fn rows_keep_list_position() {
        let equipments = vec![
            Equipment {
                id: EquipmentId::Numeric(55),
                name: Some("wAP A".into()),
                category: Some("radio".into()),
                model: None,
            },
            Equipment {
                id: EquipmentId::Text("X-2".into()),
                name: None,
                category: None,
                model: Some("wAP 60G".into()),
            },
        ];
        let items = listed(&equipments);
        let row = to_row(&items[1]);
        assert_eq!(row.index, 1);
        assert_eq!(row.name, "X-2");
        assert_eq!(row.model, "wAP 60G");

        let json = serde_json::to_value(&items[0]).unwrap();
        assert_eq!(json["index"], 0);
        assert_eq!(json["name"], "wAP A");
    }
}
