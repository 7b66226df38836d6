//! Flag-aware wrappers over `topolink_config`.
//!
//! Precedence for every setting is flag > environment > profile > default.
//! This is the single boundary where CLI options cross into core types.

use std::time::Duration;

use topolink_config::{Config, Profile};
use topolink_core::{LinkMode, OctetPolicy, ProvisionOptions, ServiceConfig, TlsMode};

use crate::cli::{GlobalOpts, ModeArg, ProvisionArgs};
use crate::error::CliError;

/// Active profile plus the connection settings derived from it.
pub struct Resolved {
    pub profile_name: String,
    pub profile: Profile,
    pub service: ServiceConfig,
}

/// Load the config file and resolve the active profile against global flags.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = topolink_config::load_config()?;
    resolve_with(&cfg, global)
}

pub fn resolve_with(cfg: &Config, global: &GlobalOpts) -> Result<Resolved, CliError> {
    let (profile_name, profile) = cfg.profile(global.profile.as_deref())?;
    let mut service = topolink_config::profile_to_service_config(&profile, &cfg.defaults)?;

    if let Some(ref raw) = global.url {
        service.url = raw.parse().map_err(|_| CliError::Validation {
            field: "url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }
    if global.insecure {
        service.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        service.timeout = Some(Duration::from_secs(secs));
    }

    tracing::debug!(
        profile = %profile_name,
        url = %service.url,
        tls = ?service.tls,
        "resolved service configuration"
    );

    Ok(Resolved {
        profile_name,
        profile,
        service,
    })
}

impl From<ModeArg> for LinkMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Bridge => Self::Bridge,
            ModeArg::ApBridge => Self::ApBridge,
            ModeArg::StationBridge => Self::StationBridge,
        }
    }
}

/// Pipeline options from the profile, overridden by `provision` flags.
pub fn provision_options(profile: &Profile, args: &ProvisionArgs) -> ProvisionOptions {
    let mut opts = topolink_config::profile_to_options(profile);

    if let Some(ref template) = args.template {
        opts.template_path.clone_from(template);
    }
    if let Some(ref dir) = args.output_dir {
        opts.output_dir = Some(dir.clone());
    }
    if args.dry_run {
        opts.output_dir = None;
    }
    if let Some(mode) = args.mode {
        opts.mode = mode.into();
    }
    if args.strict_octet {
        opts.octet_policy = OctetPolicy::Strict;
    }
    opts
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn config_with(profile: Profile) -> Config {
        let mut profiles = BTreeMap::new();
        profiles.insert("default".to_owned(), profile);
        Config {
            profiles,
            ..Config::default()
        }
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with(Profile {
            url: Some("https://profile.example/".into()),
            timeout: Some(10),
            ..Profile::default()
        });
        let cli = parse(&[
            "topolink",
            "--url",
            "https://flag.example/",
            "--insecure",
            "--timeout",
            "3",
            "derive",
            "--ip",
            "10.0.0.1",
            "--installation",
            "1",
        ]);
        let resolved = resolve_with(&cfg, &cli.global).unwrap();
        assert_eq!(resolved.service.url.as_str(), "https://flag.example/");
        assert_eq!(resolved.service.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(resolved.service.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn profile_applies_without_flags() {
        let cfg = config_with(Profile {
            url: Some("https://profile.example/".into()),
            ..Profile::default()
        });
        let cli = parse(&["topolink", "config", "path"]);
        let resolved = resolve_with(&cfg, &cli.global).unwrap();
        assert_eq!(resolved.profile_name, "default");
        assert_eq!(resolved.service.url.as_str(), "https://profile.example/");
        assert_eq!(resolved.service.tls, TlsMode::System);
        assert!(resolved.service.timeout.is_none());
    }

    #[test]
    fn unknown_profile_flag_is_error() {
        let cli = parse(&["topolink", "--profile", "lab", "config", "path"]);
        assert!(matches!(
            resolve_with(&Config::default(), &cli.global),
            Err(CliError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn provision_flags_override_profile_options() {
        let profile = Profile {
            mode: Some(LinkMode::ApBridge),
            output_dir: Some("configs".into()),
            ..Profile::default()
        };
        let cli = parse(&[
            "topolink",
            "provision",
            "--mode",
            "station-bridge",
            "--strict-octet",
            "--dry-run",
            "--template",
            "t.j2",
        ]);
        let Command::Provision(args) = cli.command else {
            panic!("expected provision");
        };
        let opts = provision_options(&profile, &args);
        assert_eq!(opts.mode, LinkMode::StationBridge);
        assert_eq!(opts.octet_policy, OctetPolicy::Strict);
        assert_eq!(opts.output_dir, None);
        assert_eq!(opts.template_path, PathBuf::from("t.j2"));
    }

    #[test]
    fn profile_options_apply_without_flags() {
        let profile = Profile {
            mode: Some(LinkMode::ApBridge),
            output_dir: Some("configs".into()),
            ..Profile::default()
        };
        let cli = parse(&["topolink", "provision"]);
        let Command::Provision(args) = cli.command else {
            panic!("expected provision");
        };
        let opts = provision_options(&profile, &args);
        assert_eq!(opts.mode, LinkMode::ApBridge);
        assert_eq!(opts.output_dir, Some(PathBuf::from("configs")));
        assert_eq!(opts.octet_policy, OctetPolicy::Lenient);
    }
}
