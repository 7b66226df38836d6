//! `site`: show the installation record behind a site id.

use topolink_core::{InputProvider, InventoryResolver, Site};

use crate::cli::{GlobalOpts, SiteLookupArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util::{TerminalInput, sign_in};

pub async fn handle(
    resolved: &Resolved,
    args: &SiteLookupArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut input =
        TerminalInput::login(args.username.as_deref(), &resolved.profile).with_site(args.site.clone());
    let credentials = input.credentials()?;
    let site_id = input.site_id()?;

    let client = resolved.service.connect()?;
    let session = sign_in(&client, &credentials).await?;

    let mut resolver = InventoryResolver::new(&client);
    let site = resolver.lookup_site(&session, &site_id).await?;

    let out = output::render_single(&global.output, site, detail, |s| {
        s.installation_id.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// The RW password stays out of every format; `provision` prints it in its recap.
fn detail(s: &Site) -> String {
    format!(
        "Installation:    {}\nSNMP community:  {}",
        s.installation_id, s.snmp_community
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_hides_password() {
        let site = Site {
            installation_id: "4821".into(),
            snmp_community: "ro-4821".into(),
            rw_password: "rw-secret".into(),
        };
        let text = detail(&site);
        assert!(text.contains("4821"));
        assert!(text.contains("ro-4821"));
        assert!(!text.contains("rw-secret"));
    }
}
