// topolink-api: Async Rust client for the TOPOS equipment inventory webservice.

pub mod auth;
pub mod client;
pub mod equipment;
pub mod error;
pub mod models;
pub mod site;
pub mod transport;

pub use auth::{Credentials, Session};
pub use client::ToposClient;
pub use error::Error;
pub use models::{EquipmentId, EquipmentListing, EquipmentRecord, EquipmentSummary, SiteRecord};
pub use transport::{TlsMode, TransportConfig};
