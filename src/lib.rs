//! # zoho-api
//!
//! A Zoho API client library for Rust.
//!
//! Zoho's legacy APIs share one contract across API groups: open a session
//! ("ticket") against the accounts endpoint, POST form-encoded parameters —
//! optionally carrying an XML document — to a group-specific URL, and
//! interpret the XML or JSON reply. This workspace provides exactly that
//! contract; concrete API groups supply their service name, endpoint paths,
//! and payload schemas on top of it.
//!
//! ## Crates
//!
//! - **zoho-api-client** - Call dispatcher, parameter sets, outgoing XML,
//!   response interpreters, shared error type
//! - **zoho-api-auth** - Credentials, ticket handshake, session management
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zoho_api::{response, Credentials, Params, Session, ZohoClient, ZohoService};
//!
//! struct Crm;
//!
//! impl ZohoService for Crm {
//!     fn service_name(&self) -> &str {
//!         "ZohoCRM"
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), zoho_api::Error> {
//!     let mut session = Session::new(
//!         Credentials::password("user@example.com", "password"),
//!         "crmapi",
//!     )?;
//!     session.open(&Crm).await?;
//!
//!     let client = ZohoClient::default_client()?;
//!     let body = client
//!         .do_call(
//!             "https://crm.zoho.com/crm/private/xml/Leads/getRecords",
//!             &Params::new().with("newFormat", 1),
//!             &session,
//!         )
//!         .await?;
//!     response::check_successful_xml(&body)?;
//!
//!     Ok(())
//! }
//! ```

// Re-export the crates for convenient access
pub use zoho_api_auth as auth;
pub use zoho_api_client as client;

// Re-export commonly used types at the top level
pub use zoho_api_auth::{Credentials, Session, ZohoService, DEFAULT_AUTH_URL};
pub use zoho_api_client::{
    response, CallCredentials, ClientConfig, Element, Error, ErrorKind, Params, Record, Result,
    ZohoClient,
};
