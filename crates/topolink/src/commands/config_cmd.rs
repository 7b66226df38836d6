//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use strum::IntoEnumIterator;

use topolink_config::Profile;
use topolink_core::{DEFAULT_BASE_URL, DEFAULT_TEMPLATE_PATH, LinkMode};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::{is_interactive, prompt_err};

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = topolink_config::load_config()?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("# {e}")),
                |c| c.active_profile_name(global.profile.as_deref()),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = topolink_config::config_path();
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    if !is_interactive() {
        return Err(CliError::Input {
            message: "`config init` needs a terminal; edit the file at `topolink config path` instead"
                .into(),
        });
    }

    let mut cfg = topolink_config::load_config_or_default();
    let config_path = topolink_config::config_path();
    eprintln!("topolink configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(cfg.active_profile_name(global.profile.as_deref()))
        .interact_text()
        .map_err(prompt_err)?;
    let existing = cfg.profiles.get(&profile_name).cloned().unwrap_or_default();

    let url: String = Input::new()
        .with_prompt("TOPOS URL")
        .default(existing.url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.into()))
        .interact_text()
        .map_err(prompt_err)?;
    if url.parse::<url::Url>().is_err() {
        return Err(CliError::Validation {
            field: "url".into(),
            reason: format!("invalid URL: {url}"),
        });
    }

    let username = optional(
        "TOPOS username (blank to be prompted each run)",
        existing.username.as_deref(),
    )?;
    let client_id = optional("Default client number (blank for none)", existing.client_id.as_deref())?;

    let template: String = Input::new()
        .with_prompt("Template path")
        .default(
            existing
                .template
                .as_ref()
                .map_or_else(|| DEFAULT_TEMPLATE_PATH.into(), |p| p.display().to_string()),
        )
        .interact_text()
        .map_err(prompt_err)?;

    let output_dir: String = Input::new()
        .with_prompt("Output directory")
        .default(
            existing
                .output_dir
                .as_ref()
                .map_or_else(|| ".".into(), |p| p.display().to_string()),
        )
        .interact_text()
        .map_err(prompt_err)?;

    let modes: Vec<LinkMode> = LinkMode::iter().collect();
    let labels: Vec<&str> = modes.iter().map(|m| m.code()).collect();
    let current = existing
        .mode
        .and_then(|m| modes.iter().position(|x| *x == m))
        .unwrap_or(0);
    let mode_idx = Select::new()
        .with_prompt("Radio mode")
        .items(&labels)
        .default(current)
        .interact()
        .map_err(prompt_err)?;

    let profile = Profile {
        url: Some(url),
        username,
        client_id,
        template: Some(PathBuf::from(template)),
        output_dir: Some(PathBuf::from(output_dir)),
        mode: modes.get(mode_idx).copied(),
        ..existing
    };
    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }

    let path = topolink_config::save_config(&cfg)?;

    eprintln!(
        "\n{}",
        output::ok_line(
            &format!("Configuration written to {}", path.display()),
            output::should_color(&global.color)
        )
    );
    eprintln!("  Profile: {profile_name}");
    eprintln!("  Passwords are never stored; set TOPOLINK_PASSWORD or answer the prompt.");
    eprintln!("\n  Try it: topolink --profile {profile_name} equipments --site <SITE>");
    Ok(())
}

fn optional(prompt: &str, current: Option<&str>) -> Result<Option<String>, CliError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(current.unwrap_or_default().to_owned())
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_owned()))
}
