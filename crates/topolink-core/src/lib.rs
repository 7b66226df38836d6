//! Provisioning pipeline between `topolink-api` and the CLI.
//!
//! - **[`InventoryResolver`]** runs the dependent TOPOS lookups
//!   (installation, equipment list, equipment record) and assembles the
//!   [`ProvisioningContext`].
//! - **[`derive`]** maps a management IP to its link label and SSID.
//! - **[`render`]** substitutes `{{ KEY }}` placeholders and writes the
//!   RouterOS script.
//! - **[`Provisioner`]** chains all of the above behind the
//!   [`InputProvider`] and [`ProgressObserver`] seams.

pub mod config;
pub mod context;
pub mod convert;
pub mod derive;
pub mod error;
pub mod model;
pub mod provision;
pub mod render;
pub mod resolver;

/// Template read when none is configured, relative to the working directory.
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/mikrotik_config.j2";

pub use config::ServiceConfig;
pub use context::{ContextKey, ProvisioningContext};
pub use derive::{LinkParameters, OctetPolicy, derive_link_parameters};
pub use error::{CoreError, Stage};
pub use model::{Equipment, EquipmentDetail, EquipmentId, LinkLabel, LinkMode, Site};
pub use provision::{
    EquipmentChoice, InputProvider, NoProgress, ProgressObserver, ProvisionOptions,
    ProvisionOutcome, ProvisionSummary, Provisioner,
};
pub use render::{ConfigDocument, render_template};
pub use resolver::InventoryResolver;

pub use topolink_api::client::DEFAULT_BASE_URL;
pub use topolink_api::{Credentials, Session, TlsMode, ToposClient};
