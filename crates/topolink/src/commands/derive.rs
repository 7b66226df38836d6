//! `derive`: link label and SSID without contacting TOPOS.

use topolink_core::{LinkParameters, OctetPolicy, derive_link_parameters};

use crate::cli::{DeriveArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &DeriveArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let policy = if args.strict_octet {
        OctetPolicy::Strict
    } else {
        OctetPolicy::Lenient
    };
    let params = derive_link_parameters(&args.ip, &args.installation, policy)?;

    let out = output::render_single(&global.output, &params, detail, |p| p.ssid.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(p: &LinkParameters) -> String {
    format!("Link:  {}\nSSID:  {}", p.label, p.ssid)
}
