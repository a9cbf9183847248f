//! Signing credentials.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::time::now;

/// Refresh credentials this long before they expire.
const EXPIRY_BUFFER_SECS: i64 = 120;

/// Credential that holds the access key, secret key and optional session token.
///
/// Secrets are redacted in `Debug` output.
#[derive(Debug)]
pub struct Credential {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: SecretString,
    /// Session token for temporary credentials.
    pub session_token: Option<SecretString>,
    /// Expiration time for temporary credentials.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a long-lived credential.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::from(secret_access_key.into()),
            session_token: None,
            expires_at: None,
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the expiration time.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Secret access key as plain text, for key derivation.
    pub(crate) fn secret(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    /// Session token as plain text.
    pub(crate) fn token(&self) -> Option<&str> {
        self.session_token.as_ref().map(|t| t.expose_secret())
    }

    /// Whether the credential can sign a request right now.
    ///
    /// Temporary credentials count as expired two minutes early.
    pub fn is_valid(&self) -> bool {
        if self.access_key_id.is_empty() || self.secret().is_empty() {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => expires_at > now() + TimeDelta::seconds(EXPIRY_BUFFER_SECS),
            None => true,
        }
    }
}
