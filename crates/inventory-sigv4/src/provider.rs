//! Credential providers.
//!
//! Each signing transport resolves credentials through exactly one
//! [`ProvideCredential`] implementation, chosen from a
//! [`CredentialSource`](crate::CredentialSource) when the transport is built.

use async_trait::async_trait;
use inventory_core::{Error, Result};
use ini::Ini;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::constants::{
    AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_SESSION_TOKEN, AWS_SHARED_CREDENTIALS_FILE,
};
use crate::credential::Credential;

/// Resolves the credential used to sign the next request.
#[async_trait]
pub trait ProvideCredential: Send + Sync + fmt::Debug {
    /// Return a credential valid for signing right now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialError`] if no usable credential is available.
    async fn provide_credential(&self) -> Result<Arc<Credential>>;
}

/// Source of short-lived credentials, such as a secret-management service.
///
/// The broker protocol is opaque to this crate; implementors exchange a role
/// name for a temporary credential, typically carrying a session token and
/// an expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialBroker: Send + Sync {
    /// Issue a credential for `role`.
    ///
    /// # Errors
    ///
    /// Returns an error if the broker cannot issue a credential.
    async fn issue_credential(&self, role: &str) -> Result<Credential>;
}

/// Fixed credentials supplied by the caller.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Arc<Credential>,
}

impl StaticCredentialProvider {
    /// Wrap an existing credential.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential: Arc::new(credential),
        }
    }

    pub(crate) fn from_shared(credential: Arc<Credential>) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    async fn provide_credential(&self) -> Result<Arc<Credential>> {
        if !self.credential.is_valid() {
            return Err(Error::CredentialError(
                "static credential is empty or expired".to_string(),
            ));
        }
        Ok(Arc::clone(&self.credential))
    }
}

/// Credentials from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and
/// `AWS_SESSION_TOKEN`, read at signing time.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentCredentialProvider;

impl EnvironmentCredentialProvider {
    /// Create a provider reading the process environment.
    pub fn new() -> Self {
        Self
    }

    fn load<F>(lookup: F) -> Result<Credential>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        match (non_empty(AWS_ACCESS_KEY_ID), non_empty(AWS_SECRET_ACCESS_KEY)) {
            (Some(ak), Some(sk)) => {
                let credential = Credential::new(ak, sk);
                Ok(match non_empty(AWS_SESSION_TOKEN) {
                    Some(token) => credential.with_session_token(token),
                    None => credential,
                })
            }
            _ => Err(Error::CredentialError(format!(
                "{AWS_ACCESS_KEY_ID} and {AWS_SECRET_ACCESS_KEY} must both be set"
            ))),
        }
    }
}

#[async_trait]
impl ProvideCredential for EnvironmentCredentialProvider {
    async fn provide_credential(&self) -> Result<Arc<Credential>> {
        Self::load(|name| std::env::var(name).ok()).map(Arc::new)
    }
}

/// Credentials from a named section of the shared credentials file.
///
/// The file is `AWS_SHARED_CREDENTIALS_FILE` when set, otherwise
/// `~/.aws/credentials`. It is re-read on every resolution so rotated keys
/// are picked up without rebuilding the client.
#[derive(Debug, Clone)]
pub struct ProfileCredentialProvider {
    profile: String,
    credentials_file: Option<PathBuf>,
}

impl ProfileCredentialProvider {
    /// Create a provider for `profile`.
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            credentials_file: None,
        }
    }

    /// Read this file instead of the default location.
    #[must_use]
    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    fn credentials_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.credentials_file {
            return Ok(path.clone());
        }
        if let Some(path) = std::env::var_os(AWS_SHARED_CREDENTIALS_FILE) {
            return Ok(PathBuf::from(path));
        }
        dirs::home_dir()
            .map(|home| home.join(".aws").join("credentials"))
            .ok_or_else(|| {
                Error::CredentialError("cannot locate home directory for ~/.aws/credentials".into())
            })
    }

    fn parse(&self, contents: &str) -> Result<Credential> {
        let conf = Ini::load_from_str(contents).map_err(|e| {
            Error::CredentialError(format!("failed to parse credentials file: {e}"))
        })?;

        let props = conf.section(Some(self.profile.as_str())).ok_or_else(|| {
            Error::CredentialError(format!(
                "profile `{}` not found in credentials file",
                self.profile
            ))
        })?;

        match (
            props.get("aws_access_key_id"),
            props.get("aws_secret_access_key"),
        ) {
            (Some(ak), Some(sk)) => {
                let credential = Credential::new(ak, sk);
                Ok(match props.get("aws_session_token") {
                    Some(token) => credential.with_session_token(token),
                    None => credential,
                })
            }
            _ => Err(Error::CredentialError(format!(
                "profile `{}` is missing aws_access_key_id or aws_secret_access_key",
                self.profile
            ))),
        }
    }
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    async fn provide_credential(&self) -> Result<Arc<Credential>> {
        let path = self.credentials_path()?;
        debug!(profile = %self.profile, path = %path.display(), "loading shared credentials");

        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            Error::CredentialError(format!(
                "failed to read credentials file {}: {e}",
                path.display()
            ))
        })?;
        self.parse(&contents).map(Arc::new)
    }
}

/// Broker-issued credentials for a role, cached until shortly before expiry.
pub struct BrokerCredentialProvider {
    role: String,
    broker: Arc<dyn CredentialBroker>,
    cached: Mutex<Option<Arc<Credential>>>,
}

impl BrokerCredentialProvider {
    /// Create a provider asking `broker` for credentials for `role`.
    pub fn new(role: impl Into<String>, broker: Arc<dyn CredentialBroker>) -> Self {
        Self {
            role: role.into(),
            broker,
            cached: Mutex::new(None),
        }
    }
}

impl fmt::Debug for BrokerCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerCredentialProvider")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProvideCredential for BrokerCredentialProvider {
    async fn provide_credential(&self) -> Result<Arc<Credential>> {
        let mut cached = self.cached.lock().await;
        if let Some(credential) = cached.as_ref().filter(|c| c.is_valid()) {
            return Ok(Arc::clone(credential));
        }

        debug!(role = %self.role, "requesting credential from broker");
        let issued = self.broker.issue_credential(&self.role).await.map_err(|err| {
            Error::CredentialError(format!(
                "broker could not issue credential for role `{}`: {err}",
                self.role
            ))
        })?;
        if !issued.is_valid() {
            return Err(Error::CredentialError(format!(
                "broker issued an empty or expired credential for role `{}`",
                self.role
            )));
        }

        let issued = Arc::new(issued);
        *cached = Some(Arc::clone(&issued));
        Ok(issued)
    }
}
