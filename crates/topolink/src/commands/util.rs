//! Shared helpers for command handlers: operator input and stage progress.

use std::io::{self, IsTerminal};
use std::time::Duration;

use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use strum::IntoEnumIterator;

use topolink_config::Profile;
use topolink_core::{
    CoreError, Credentials, Equipment, EquipmentChoice, InputProvider, ProgressObserver, Session,
    Stage, ToposClient,
};

use crate::cli::SiteArgs;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Input {
        message: format!("prompt failed: {e}"),
    }
}

/// Whether prompts can be shown.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

// ── Operator input ──────────────────────────────────────────────────

/// `InputProvider` backed by flags and env vars, falling back to terminal
/// prompts for anything missing. Without a terminal, a missing value is an
/// input error naming the flag to pass.
pub struct TerminalInput {
    username: Option<String>,
    password: Option<SecretString>,
    client_id: Option<String>,
    site_id: Option<String>,
    choice: Option<EquipmentChoice>,
    interactive: bool,
}

impl TerminalInput {
    pub fn new(args: &SiteArgs, profile: &Profile) -> Self {
        Self {
            client_id: args.client.clone().or_else(|| profile.client_id.clone()),
            site_id: args.site.clone(),
            ..Self::login(args.username.as_deref(), profile)
        }
    }

    /// Input for lookups that only need a login.
    pub fn login(username: Option<&str>, profile: &Profile) -> Self {
        Self {
            username: username
                .map(str::to_owned)
                .or_else(|| topolink_config::resolve_username(profile)),
            password: topolink_config::resolve_password(),
            client_id: None,
            site_id: None,
            choice: None,
            interactive: is_interactive(),
        }
    }

    pub fn with_site(mut self, site_id: Option<String>) -> Self {
        self.site_id = site_id;
        self
    }

    pub fn with_choice(mut self, choice: Option<EquipmentChoice>) -> Self {
        self.choice = choice;
        self
    }

    /// A value given by flag, env or profile, trimmed. Blank is an error.
    fn preset(value: &str, stage: Stage, prompt: &str) -> Result<String, CoreError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CoreError::Input {
                stage,
                message: format!("{prompt} cannot be empty"),
            });
        }
        Ok(value.to_owned())
    }

    fn ask(&self, stage: Stage, prompt: &str, flag: &str) -> Result<String, CoreError> {
        if !self.interactive {
            return Err(CoreError::Input {
                stage,
                message: format!("{prompt} is required: pass {flag}"),
            });
        }
        let value: String = Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| input_err(stage, &e))?;
        let value = value.trim().to_owned();
        if value.is_empty() {
            return Err(CoreError::Input {
                stage,
                message: format!("{prompt} cannot be empty"),
            });
        }
        Ok(value)
    }
}

pub async fn sign_in(client: &ToposClient, credentials: &Credentials) -> Result<Session, CoreError> {
    client
        .login(credentials)
        .await
        .map_err(|e| CoreError::api(Stage::Authenticate, e))
}

fn input_err(stage: Stage, e: &dyn std::fmt::Display) -> CoreError {
    CoreError::Input {
        stage,
        message: format!("prompt failed: {e}"),
    }
}

impl InputProvider for TerminalInput {
    fn credentials(&mut self) -> Result<Credentials, CoreError> {
        let username = match self.username.take() {
            Some(u) => Self::preset(&u, Stage::Authenticate, "TOPOS username")?,
            None => self.ask(Stage::Authenticate, "TOPOS username", "--username or TOPOLINK_USERNAME")?,
        };
        let password = match self.password.take() {
            Some(p) => p,
            None if self.interactive => rpassword::prompt_password("TOPOS password: ")
                .map(SecretString::from)
                .map_err(|e| input_err(Stage::Authenticate, &e))?,
            None => {
                return Err(CoreError::Input {
                    stage: Stage::Authenticate,
                    message: "TOPOS password is required: set TOPOLINK_PASSWORD".into(),
                });
            }
        };
        Ok(Credentials { username, password })
    }

    fn client_id(&mut self) -> Result<String, CoreError> {
        match self.client_id.take() {
            Some(id) => Self::preset(&id, Stage::EquipmentList, "Client number"),
            None => self.ask(Stage::EquipmentList, "Client number", "--client"),
        }
    }

    fn site_id(&mut self) -> Result<String, CoreError> {
        match self.site_id.take() {
            Some(id) => Self::preset(&id, Stage::SiteLookup, "Installation id (site number)"),
            None => self.ask(Stage::SiteLookup, "Installation id (site number)", "--site"),
        }
    }

    fn select_equipment(&mut self, equipments: &[Equipment]) -> Result<EquipmentChoice, CoreError> {
        if let Some(choice) = self.choice.take() {
            return Ok(choice);
        }
        if !self.interactive {
            return Err(CoreError::Input {
                stage: Stage::Selection,
                message: "equipment is required: pass --equipment-index or --equipment-id".into(),
            });
        }

        eprintln!();
        eprintln!("Available equipment:");
        for (idx, eq) in equipments.iter().enumerate() {
            eprintln!("  {}", equipment_line(idx, eq));
        }
        eprintln!();

        let index: i64 = Input::new()
            .with_prompt("Equipment number")
            .interact_text()
            .map_err(|e| input_err(Stage::Selection, &e))?;
        Ok(EquipmentChoice::Index(index))
    }
}

/// `[idx] name (ID: id) [category] - model`
pub fn equipment_line(idx: usize, eq: &Equipment) -> String {
    format!(
        "[{idx}] {} (ID: {}) [{}] - {}",
        eq.display_name(),
        eq.id,
        eq.category.as_deref().unwrap_or("N/A"),
        eq.model.as_deref().unwrap_or("N/A"),
    )
}

// ── Progress ────────────────────────────────────────────────────────

/// Spinner per pipeline stage on stderr, with a check line once each stage
/// completes. Paused during selection so the prompt stays readable.
pub struct StageSpinner {
    current: Option<ProgressBar>,
    total: usize,
    step: usize,
    visible: bool,
    color: bool,
}

impl StageSpinner {
    pub fn new(visible: bool, color: bool) -> Self {
        Self {
            current: None,
            total: Stage::iter().count(),
            step: 0,
            visible,
            color,
        }
    }

    fn spinner(message: String) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl ProgressObserver for StageSpinner {
    fn stage_started(&mut self, stage: Stage) {
        self.step += 1;
        if !self.visible || stage == Stage::Selection {
            return;
        }
        let message = format!("[{}/{}] {}...", self.step, self.total, stage.describe());
        self.current = Some(Self::spinner(message));
    }

    fn stage_finished(&mut self, stage: Stage) {
        if let Some(pb) = self.current.take() {
            pb.finish_and_clear();
        }
        if self.visible {
            eprintln!("{}", output::ok_line(stage.describe(), self.color));
        }
    }
}

impl Drop for StageSpinner {
    fn drop(&mut self) {
        if let Some(pb) = self.current.take() {
            pb.finish_and_clear();
        }
    }
}
