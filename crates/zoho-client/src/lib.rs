//! # zoho-api-client
//!
//! Core call dispatcher for the Zoho API.
//!
//! This crate provides the pieces every Zoho API group shares:
//! - [`ZohoClient`] — form-encoded HTTP POST dispatch with session state
//!   (ticket, auth token, scope) merged into each call
//! - [`Params`] — per-call parameter sets, stringified and never shared
//!   between calls
//! - [`Element`] — outgoing XML payload trees for write operations
//! - [`response`] — interpreters for the service's XML/JSON reply shapes
//! - [`Error`] — the one domain error type shared across the workspace
//!
//! Session establishment lives in `zoho-api-auth`; that crate's session
//! manager implements [`CallCredentials`] so it can be handed to
//! [`ZohoClient::do_call`] directly.
//!
//! ## Example
//!
//! ```rust,ignore
//! use zoho_api_client::{response, Params, ZohoClient};
//!
//! let client = ZohoClient::default_client()?;
//! let body = client
//!     .do_call(
//!         "https://crm.zoho.com/crm/private/xml/Leads/insertRecords",
//!         &Params::new().with("newFormat", 1),
//!         &session,
//!     )
//!     .await?;
//! let records = response::get_inserted_records(&body)?;
//! ```

mod client;
mod error;
mod params;
pub mod response;
mod xml;

pub use client::{CallCredentials, ClientConfig, ZohoClient};
pub use error::{Error, ErrorKind, Result};
pub use params::Params;
pub use response::Record;
pub use xml::Element;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("zoho-api/", env!("CARGO_PKG_VERSION"));
