//! Session management: the ticket handshake against the accounts endpoint.

use tracing::{debug, instrument};

use zoho_api_client::{CallCredentials, Error, ErrorKind, Params, Result};

use crate::credentials::Credentials;
use crate::ticket::parse_ticket_body;

/// Default Zoho accounts login URL.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.zoho.com/login";

/// Identifies one Zoho API group to the accounts endpoint.
///
/// Each concrete API client (CRM, Sheet, ...) implements this and composes
/// a [`Session`] with a [`ZohoClient`](zoho_api_client::ZohoClient) rather
/// than inheriting from either.
pub trait ZohoService {
    /// The service name sent as the `servicename` login parameter,
    /// e.g. `"ZohoCRM"`.
    fn service_name(&self) -> &str;
}

/// A Zoho API session.
///
/// Holds the credentials and scope for one API group and, after a
/// successful [`open`](Self::open), the session ticket. The ticket is
/// valid until the remote service expires it; there is no local expiry
/// tracking and no automatic renewal, so a caller seeing an expired-ticket
/// failure reopens the session and reissues the call.
///
/// One session per logical task: the ticket field is plain mutable state
/// written by `open()`, and sharing a session across concurrent calls is
/// not a supported pattern.
pub struct Session {
    credentials: Credentials,
    auth_url: String,
    scope: String,
    extra_auth_params: Params,
    ticket: Option<String>,
    http: reqwest::Client,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.credentials)
            .field("auth_url", &self.auth_url)
            .field("scope", &self.scope)
            .field("ticket", &self.ticket.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session for the given API group scope, e.g. `"crmapi"`.
    ///
    /// Fails with [`ErrorKind::InvalidCredentials`] when `scope` is empty.
    pub fn new(credentials: Credentials, scope: impl Into<String>) -> Result<Self> {
        let scope = scope.into();
        if scope.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "scope must not be empty".to_string(),
            )));
        }

        Ok(Self {
            credentials,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            scope,
            extra_auth_params: Params::new(),
            ticket: None,
            http: reqwest::Client::new(),
        })
    }

    /// Override the accounts login URL.
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    /// Add an extra form parameter to the login call.
    pub fn with_extra_auth_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra_auth_params.set(key, value);
        self
    }

    /// The session ticket, once obtained.
    pub fn ticket(&self) -> Option<&str> {
        self.ticket.as_deref()
    }

    /// The API group scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Open the session: exchange username/password for a ticket.
    ///
    /// Performs a single POST to the accounts endpoint and stores the
    /// returned ticket. Calling this again re-authenticates and replaces
    /// the ticket. Token-based sessions have nothing to open and get
    /// [`ErrorKind::InvalidCredentials`].
    #[instrument(skip(self, service), fields(scope = %self.scope))]
    pub async fn open(&mut self, service: &dyn ZohoService) -> Result<&str> {
        let (username, password) = match &self.credentials {
            Credentials::Password { username, password } => (username, password),
            Credentials::AuthToken(_) => {
                return Err(Error::new(ErrorKind::InvalidCredentials(
                    "token-based sessions do not use tickets".to_string(),
                )))
            }
        };

        let mut params = self.extra_auth_params.clone();
        params.set("servicename", service.service_name());
        params.set("FROM_AGENT", "true");
        params.set("LOGIN_ID", username);
        params.set("PASSWORD", password);

        let pairs: Vec<(&str, &str)> = params.iter().collect();
        let body = serde_urlencoded::to_string(pairs)?;

        let response = self
            .http
            .post(&self.auth_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let body = response.text().await?;
        let fields = parse_ticket_body(&body)?;

        let warning = require_field(&fields, "WARNING")?;
        if warning != "null" {
            return Err(Error::new(ErrorKind::Auth {
                warning: warning.to_string(),
            }));
        }

        let result = require_field(&fields, "RESULT")?;
        if result != "TRUE" {
            return Err(Error::new(ErrorKind::Auth {
                warning: format!("ticket result was not valid: {result}"),
            }));
        }

        let ticket = require_field(&fields, "TICKET")?.to_string();
        debug!("session opened");
        Ok(self.ticket.insert(ticket).as_str())
    }

    /// Check that the session is ready for calls.
    ///
    /// Password-based sessions need a ticket; token-based sessions are
    /// always ready. This check is advisory — the dispatcher never calls
    /// it on the caller's behalf.
    pub fn ensure_opened(&self) -> Result<()> {
        match self.credentials {
            Credentials::Password { .. } if self.ticket.is_none() => {
                Err(Error::new(ErrorKind::SessionNotOpened))
            }
            _ => Ok(()),
        }
    }
}

impl CallCredentials for Session {
    fn ticket(&self) -> Option<&str> {
        self.ticket.as_deref()
    }

    fn auth_token(&self) -> Option<&str> {
        self.credentials.token()
    }

    fn scope(&self) -> &str {
        &self.scope
    }
}

fn require_field<'a>(
    fields: &'a std::collections::BTreeMap<String, String>,
    key: &str,
) -> Result<&'a str> {
    fields
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| Error::new(ErrorKind::TicketResponse(format!("missing {key} field"))))
}
