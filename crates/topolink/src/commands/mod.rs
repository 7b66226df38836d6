//! Command dispatch: bridges CLI args -> core pipeline -> output formatting.

pub mod config_cmd;
pub mod derive;
pub mod equipment;
pub mod equipments;
pub mod provision;
pub mod site;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a TOPOS-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Provision(args) => provision::handle(resolved, args, global).await,
        Command::Equipments(args) => equipments::handle(resolved, &args, global).await,
        Command::Site(args) => site::handle(resolved, &args, global).await,
        Command::Equipment(args) => equipment::handle(resolved, &args, global).await,
        // Handled before a profile is resolved
        Command::Derive(_) | Command::Config(_) | Command::Completions(_) => Err(
            CliError::Internal("offline command reached remote dispatch".into()),
        ),
    }
}
