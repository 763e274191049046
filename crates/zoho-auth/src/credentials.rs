//! Credential variants for Zoho sessions.
//!
//! Custom Debug redacts sensitive data.

/// Credentials for a Zoho session.
///
/// Exactly one form is active per session: a username/password pair that
/// is exchanged for a ticket by [`Session::open`](crate::Session::open),
/// or a long-lived auth token issued by Zoho that needs no handshake.
#[derive(Clone)]
pub enum Credentials {
    /// Username/password pair for the ticket handshake.
    Password { username: String, password: String },
    /// Long-lived auth token, e.g. `123123123-rVI20JVBveUOHIeRYWV5b5kQaMGWeIdlI$`.
    AuthToken(String),
}

impl Credentials {
    /// Password credentials.
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Static auth token credentials.
    pub fn auth_token(token: impl Into<String>) -> Self {
        Self::AuthToken(token.into())
    }

    /// The auth token, when this is a token-based credential.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::AuthToken(token) => Some(token),
            Self::Password { .. } => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::AuthToken(_) => f.debug_tuple("AuthToken").field(&"[REDACTED]").finish(),
        }
    }
}
