//! # zoho-api-auth
//!
//! Zoho API authentication: the ticket handshake, credential types, and
//! session management.
//!
//! ## Security
//!
//! - Passwords, tokens, and tickets are redacted in Debug output
//! - Tracing skips credential parameters
//!
//! ## Example
//!
//! ```rust,ignore
//! use zoho_api_auth::{Credentials, Session, ZohoService};
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
//! async fn main() -> Result<(), zoho_api_client::Error> {
//!     let mut session = Session::new(
//!         Credentials::password("user@example.com", "password"),
//!         "crmapi",
//!     )?;
//!     session.open(&Crm).await?;
//!
//!     // The session now carries a ticket and can be handed to
//!     // ZohoClient::do_call as its CallCredentials.
//!     Ok(())
//! }
//! ```

mod credentials;
mod session;
mod ticket;

pub use credentials::Credentials;
pub use session::{Session, ZohoService, DEFAULT_AUTH_URL};
