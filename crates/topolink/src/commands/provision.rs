//! `provision`: run the full pipeline for one equipment.

use std::io::IsTerminal;
use std::path::PathBuf;

use serde::Serialize;

use topolink_core::{EquipmentChoice, ProvisionOutcome, ProvisionSummary, Provisioner};

use crate::cli::{GlobalOpts, OutputFormat, ProvisionArgs};
use crate::config::{self, Resolved};
use crate::error::CliError;
use crate::output;

use super::util::{StageSpinner, TerminalInput};

/// Address of a factory-reset wAP 60G.
const DEVICE_DEFAULT_URL: &str = "https://192.168.88.2";

#[derive(Serialize)]
struct ProvisionReport<'a> {
    #[serde(flatten)]
    summary: &'a ProvisionSummary,
    file_name: &'a str,
    path: Option<&'a PathBuf>,
}

pub async fn handle(
    resolved: &Resolved,
    args: ProvisionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let options = config::provision_options(&resolved.profile, &args);
    let dry_run = options.output_dir.is_none();

    let choice = match (args.equipment_index, args.equipment_id) {
        (Some(index), _) => Some(EquipmentChoice::Index(index)),
        (None, Some(id)) => Some(EquipmentChoice::Id(id)),
        (None, None) => None,
    };
    let mut input = TerminalInput::new(&args.site, &resolved.profile).with_choice(choice);

    let color = output::should_color(&global.color);
    let show_progress = !global.quiet && std::io::stderr().is_terminal();
    let mut progress = StageSpinner::new(show_progress, color);

    let client = resolved.service.connect()?;
    let provisioner = Provisioner::new(&client, options);
    let outcome = provisioner.run(&mut input, &mut progress).await?;
    drop(progress);

    if dry_run {
        return output::print_raw(&outcome.document.text);
    }

    let report = ProvisionReport {
        summary: &outcome.summary,
        file_name: &outcome.document.file_name,
        path: outcome.path.as_ref(),
    };
    let out = output::render_single(
        &global.output,
        &report,
        |_| recap(&outcome, color),
        |r| {
            r.path
                .map_or_else(|| r.file_name.to_owned(), |p| p.display().to_string())
        },
    )?;

    // The recap is operator-facing; structured formats go to stdout as usual.
    if matches!(global.output, OutputFormat::Table) {
        if !global.quiet {
            eprintln!("{out}");
        }
    } else {
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

/// Closing summary with the steps to apply the script on the device.
fn recap(outcome: &ProvisionOutcome, color: bool) -> String {
    let s = &outcome.summary;
    let file = outcome.path.as_ref().map_or_else(
        || outcome.document.file_name.clone(),
        |p| p.display().to_string(),
    );

    let rows = [
        ("Site", s.installation_id.clone()),
        ("Equipment", format!("{} (ID: {})", s.equipment.display_name(), s.equipment.id)),
        ("Hostname", s.hostname.clone()),
        ("Management IP", s.management_ip.clone()),
        ("SSID", s.ssid.clone()),
        ("Link", s.link_label.to_string()),
        ("Mode", s.mode.code().to_owned()),
        ("Password", s.rw_password.clone()),
        ("SNMP Community", s.snmp_community.clone()),
        ("File", file.clone()),
    ];
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    let mut lines = vec![String::new(), output::heading("Configuration generated", color)];
    for (key, value) in rows {
        lines.push(format!("  {key:<width$}  {value}"));
    }
    lines.push(String::new());
    lines.push(output::heading("Apply it", color));
    lines.push(format!("  1. Connect to the wAP 60G at {DEVICE_DEFAULT_URL}"));
    lines.push("  2. Open Terminal".into());
    lines.push(format!("  3. Paste the contents of {file}"));
    lines.join("\n")
}
