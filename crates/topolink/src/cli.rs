//! Clap derive structures for the `topolink` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This file
//! is also compiled by `build.rs` for man page generation, so it may only
//! depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// topolink -- provision MikroTik wAP 60G links from TOPOS inventory
#[derive(Debug, Parser)]
#[command(
    name = "topolink",
    version,
    about = "Generate wAP 60G RouterOS configuration from TOPOS inventory data",
    long_about = "Pulls installation and equipment records from the TOPOS management\n\
        service, derives the radio link label and SSID from the management IP,\n\
        and renders a RouterOS script ready to paste into the device terminal.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "TOPOLINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// TOPOS base URL (overrides profile)
    #[arg(long, env = "TOPOLINK_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TOPOLINK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "TOPOLINK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: none)
    #[arg(long, env = "TOPOLINK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Radio mode written to the wAP 60G interface.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Transparent bridge (default)
    Bridge,
    /// Access point side of the link
    ApBridge,
    /// Station side of the link
    StationBridge,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the RouterOS script for one equipment
    #[command(alias = "prov")]
    Provision(ProvisionArgs),

    /// List the equipment installed at a site
    #[command(alias = "eq")]
    Equipments(EquipmentsArgs),

    /// Show an installation record
    Site(SiteLookupArgs),

    /// Show one equipment record by TOPOS id
    Equipment(EquipmentArgs),

    /// Compute link label and SSID offline
    Derive(DeriveArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Site addressing and login arguments shared by remote commands.
#[derive(Debug, Args)]
pub struct SiteArgs {
    /// TOPOS client number (prompted when omitted)
    #[arg(long)]
    pub client: Option<String>,

    /// Installation / site id (prompted when omitted)
    #[arg(long)]
    pub site: Option<String>,

    /// TOPOS username (also TOPOLINK_USERNAME; prompted when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

// ── Provision ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProvisionArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Zero-based position of the equipment in the listed order
    #[arg(long, allow_negative_numbers = true, conflicts_with = "equipment_id")]
    pub equipment_index: Option<i64>,

    /// TOPOS id of the equipment to provision
    #[arg(long)]
    pub equipment_id: Option<String>,

    /// RouterOS template (default: templates/mikrotik_config.j2)
    #[arg(long, short = 't')]
    pub template: Option<PathBuf>,

    /// Directory the .rsc file is written to (default: .)
    #[arg(long, short = 'd')]
    pub output_dir: Option<PathBuf>,

    /// Radio mode
    #[arg(long, short = 'm')]
    pub mode: Option<ModeArg>,

    /// Fail when the management IP's last octet is not 1-6
    #[arg(long)]
    pub strict_octet: bool,

    /// Print the script to stdout instead of writing a file
    #[arg(long)]
    pub dry_run: bool,
}

// ── Equipments ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EquipmentsArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

// ── Site / Equipment ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SiteLookupArgs {
    /// Installation / site id (prompted when omitted)
    #[arg(long)]
    pub site: Option<String>,

    /// TOPOS username (also TOPOLINK_USERNAME; prompted when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

#[derive(Debug, Args)]
pub struct EquipmentArgs {
    /// TOPOS id of the equipment
    #[arg(long)]
    pub id: String,

    /// TOPOS username (also TOPOLINK_USERNAME; prompted when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

// ── Derive ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeriveArgs {
    /// Management IP of the equipment
    #[arg(long)]
    pub ip: String,

    /// Installation id used in the SSID
    #[arg(long)]
    pub installation: String,

    /// Fail when the last octet is not 1-6
    #[arg(long)]
    pub strict_octet: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive profile wizard
    Init,

    /// Show the merged configuration
    Show,

    /// Print the configuration file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
