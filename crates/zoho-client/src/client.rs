//! Call dispatcher: form-encoded HTTP POST with session state merged in.

use std::time::Duration;

use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::params::Params;
use crate::xml::Element;

/// Form parameters whose values are never written to the log.
const REDACTED_PARAMETERS: &[&str] = &["ticket", "authtoken", "PASSWORD"];

/// Session state the dispatcher merges into every outgoing call.
///
/// Implemented by the session manager in `zoho-api-auth`; defined here so
/// the dispatcher does not depend on how the session was established.
pub trait CallCredentials: Send + Sync {
    /// The session ticket, once `open()` has obtained one.
    fn ticket(&self) -> Option<&str>;

    /// The long-lived auth token, for token-based sessions.
    fn auth_token(&self) -> Option<&str>;

    /// The API group being accessed, e.g. `"crmapi"`.
    fn scope(&self) -> &str;
}

/// Configuration for [`ZohoClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent header value.
    pub user_agent: String,
    /// Request timeout. None means the transport default (no timeout).
    pub timeout: Option<Duration>,
    /// Form parameter carrying the serialized XML document.
    pub xml_parameter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: crate::USER_AGENT.to_string(),
            timeout: None,
            xml_parameter: "xmlData".to_string(),
        }
    }
}

impl ClientConfig {
    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Change the form parameter name used for XML payloads.
    pub fn with_xml_parameter(mut self, name: impl Into<String>) -> Self {
        self.xml_parameter = name.into();
        self
    }
}

/// Dispatcher for Zoho API calls.
///
/// Builds a fresh parameter set per call (caller parameters plus ticket,
/// auth token, and scope), POSTs it form-encoded, and returns the raw
/// response body for the response interpreters in
/// [`response`](crate::response). No status-code interpretation, no retry:
/// every service reply comes back as text for the caller to interpret.
#[derive(Debug, Clone)]
pub struct ZohoClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl ZohoClient {
    /// Create a dispatcher with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a dispatcher with the default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Do a Zoho API call.
    ///
    /// Ticket, auth token, and scope are added automatically; the caller's
    /// parameter set is left untouched. Returns the raw response body.
    #[instrument(skip(self, params, auth))]
    pub async fn do_call(
        &self,
        url: &str,
        params: &Params,
        auth: &dyn CallCredentials,
    ) -> Result<String> {
        let merged = merge_session_params(params, auth);
        self.post_form(url, &merged).await
    }

    /// Do a Zoho API call with an outgoing XML payload.
    ///
    /// `root` is serialized and inserted under the configured XML parameter
    /// (`xmlData` by default); the document's schema is the caller's
    /// responsibility.
    #[instrument(skip(self, params, auth, root))]
    pub async fn do_xml_call(
        &self,
        url: &str,
        params: &Params,
        auth: &dyn CallCredentials,
        root: &Element,
    ) -> Result<String> {
        let mut merged = merge_session_params(params, auth);
        merged.set(self.config.xml_parameter.as_str(), root.to_xml()?);
        self.post_form(url, &merged).await
    }

    async fn post_form(&self, url: &str, params: &Params) -> Result<String> {
        for (key, value) in params.iter() {
            if REDACTED_PARAMETERS.contains(&key) {
                debug!(key, value = "[REDACTED]", "request parameter");
            } else {
                debug!(key, value, "request parameter");
            }
        }

        let pairs: Vec<(&str, &str)> = params.iter().collect();
        let body = serde_urlencoded::to_string(pairs)?;

        let response = self
            .inner
            .post(url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let body = response.text().await?;
        debug!(len = body.len(), "response body received");
        Ok(body)
    }
}

/// Build the outgoing parameter set: caller parameters plus session state.
fn merge_session_params(params: &Params, auth: &dyn CallCredentials) -> Params {
    let mut merged = params.clone();
    if let Some(ticket) = auth.ticket() {
        merged.set("ticket", ticket);
    }
    if let Some(token) = auth.auth_token() {
        merged.set("authtoken", token);
    }
    merged.set("scope", auth.scope());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct TestAuth {
        ticket: Option<String>,
        token: Option<String>,
    }

    impl CallCredentials for TestAuth {
        fn ticket(&self) -> Option<&str> {
            self.ticket.as_deref()
        }

        fn auth_token(&self) -> Option<&str> {
            self.token.as_deref()
        }

        fn scope(&self) -> &str {
            "crmapi"
        }
    }

    fn ticket_auth() -> TestAuth {
        TestAuth {
            ticket: Some("abc123".to_string()),
            token: None,
        }
    }

    #[test]
    fn test_merge_does_not_mutate_caller_params() {
        let params = Params::new().with("newFormat", 1);
        let before = params.clone();

        let merged = merge_session_params(&params, &ticket_auth());

        assert_eq!(params, before);
        assert_eq!(merged.get("ticket"), Some("abc123"));
        assert_eq!(merged.get("scope"), Some("crmapi"));
        assert_eq!(merged.get("newFormat"), Some("1"));
    }

    #[test]
    fn test_merge_skips_absent_session_fields() {
        let auth = TestAuth {
            ticket: None,
            token: Some("token456".to_string()),
        };
        let merged = merge_session_params(&Params::new(), &auth);

        assert_eq!(merged.get("ticket"), None);
        assert_eq!(merged.get("authtoken"), Some("token456"));
    }

    #[tokio::test]
    async fn test_do_call_posts_form_and_returns_raw_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/crm/private/xml/Leads/getRecords"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("ticket=abc123"))
            .and(body_string_contains("scope=crmapi"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<response/>"))
            .mount(&mock_server)
            .await;

        let client = ZohoClient::default_client().unwrap();
        let body = client
            .do_call(
                &format!("{}/crm/private/xml/Leads/getRecords", mock_server.uri()),
                &Params::new(),
                &ticket_auth(),
            )
            .await
            .unwrap();

        assert_eq!(body, "<response/>");
    }

    #[tokio::test]
    async fn test_do_xml_call_carries_serialized_payload() {
        let mock_server = MockServer::start().await;

        // Form-encoded: '<' is %3C, '"' is %22, space is '+'
        Mock::given(method("POST"))
            .and(path("/insert"))
            .and(body_string_contains("xmlData=%3CLeads%3E"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<response/>"))
            .mount(&mock_server)
            .await;

        let client = ZohoClient::default_client().unwrap();
        let root = Element::new("Leads").child(
            Element::new("row")
                .attr("no", 1)
                .child(Element::new("FL").attr("val", "Company").text("mFabrik")),
        );

        let body = client
            .do_xml_call(
                &format!("{}/insert", mock_server.uri()),
                &Params::new(),
                &ticket_auth(),
                &root,
            )
            .await
            .unwrap();

        assert_eq!(body, "<response/>");
    }

    #[tokio::test]
    async fn test_non_success_status_body_is_returned_verbatim() {
        // The dispatcher does not interpret status codes; a 500 body is
        // handed to the caller like any other response.
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&mock_server)
            .await;

        let client = ZohoClient::default_client().unwrap();
        let body = client
            .do_call(
                &format!("{}/broken", mock_server.uri()),
                &Params::new(),
                &ticket_auth(),
            )
            .await
            .unwrap();

        assert_eq!(body, "internal error");
    }
}
