//! Error types shared across the Zoho API crates.
//!
//! Error messages are designed to avoid exposing ticket or token values.

/// Result type alias for Zoho API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Zoho API operations.
///
/// One domain error covers every failure category the service can report;
/// callers distinguish cases through [`ErrorKind`].
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Login rejected by the accounts endpoint.
    #[error("Authentication rejected: {warning}")]
    Auth { warning: String },

    /// Malformed line-oriented ticket response body.
    #[error("Bad ticket response: {0}")]
    TicketResponse(String),

    /// Invalid credentials or session configuration.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// A password-based session was used before a ticket was obtained.
    #[error("Session not opened: call open() to obtain a ticket first")]
    SessionNotOpened,

    /// Error reported by the service inside an XML or JSON response.
    #[error("Zoho API error: {message}")]
    Service { message: String },

    /// A response element the interpreter requires is absent.
    #[error("Missing element in response: {0}")]
    MissingElement(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// XML parse or serialization error.
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Form-encoding error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Client configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Sanitize the message so a URL carrying a ticket cannot leak
        let message = err.to_string();
        let sanitized = if message.contains("ticket=") || message.contains("authtoken=") {
            "HTTP request failed (details redacted for security)".to_string()
        } else {
            message
        };
        Error::with_source(ErrorKind::Http(sanitized), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::with_source(ErrorKind::Xml(err.to_string()), err)
    }
}
