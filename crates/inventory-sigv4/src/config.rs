//! Signing configuration: region plus exactly one credential source.

use inventory_core::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::constants::{AWS_DEFAULT_REGION, AWS_REGION};
use crate::credential::Credential;
use crate::provider::{
    BrokerCredentialProvider, CredentialBroker, EnvironmentCredentialProvider,
    ProfileCredentialProvider, ProvideCredential, StaticCredentialProvider,
};

/// Where signing credentials come from.
#[derive(Clone)]
pub enum CredentialSource {
    /// Fixed credentials supplied by the caller
    Static(Arc<Credential>),
    /// A section of the shared credentials file
    SharedProfile {
        /// Profile (section) name
        profile: String,
        /// Explicit credentials file; defaults to `~/.aws/credentials`
        credentials_file: Option<PathBuf>,
    },
    /// Short-lived credentials issued by a broker for a role
    Broker {
        /// Role requested from the broker
        role: String,
        /// Broker implementation
        broker: Arc<dyn CredentialBroker>,
    },
    /// `AWS_ACCESS_KEY_ID` and friends
    Environment,
}

impl CredentialSource {
    /// Fixed credentials.
    #[must_use]
    pub fn static_credential(credential: Credential) -> Self {
        Self::Static(Arc::new(credential))
    }

    /// Named profile from the default shared credentials file.
    #[must_use]
    pub fn shared_profile(profile: impl Into<String>) -> Self {
        Self::SharedProfile {
            profile: profile.into(),
            credentials_file: None,
        }
    }

    /// Broker-issued credentials for `role`.
    #[must_use]
    pub fn broker(role: impl Into<String>, broker: Arc<dyn CredentialBroker>) -> Self {
        Self::Broker {
            role: role.into(),
            broker,
        }
    }

    fn into_provider(self) -> Arc<dyn ProvideCredential> {
        match self {
            Self::Static(credential) => Arc::new(StaticCredentialProvider::from_shared(credential)),
            Self::SharedProfile {
                profile,
                credentials_file,
            } => {
                let provider = ProfileCredentialProvider::new(profile);
                match credentials_file {
                    Some(path) => Arc::new(provider.with_credentials_file(path)),
                    None => Arc::new(provider),
                }
            }
            Self::Broker { role, broker } => Arc::new(BrokerCredentialProvider::new(role, broker)),
            Self::Environment => Arc::new(EnvironmentCredentialProvider::new()),
        }
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(credential) => f.debug_tuple("Static").field(credential).finish(),
            Self::SharedProfile {
                profile,
                credentials_file,
            } => f
                .debug_struct("SharedProfile")
                .field("profile", profile)
                .field("credentials_file", credentials_file)
                .finish(),
            Self::Broker { role, .. } => f
                .debug_struct("Broker")
                .field("role", role)
                .finish_non_exhaustive(),
            Self::Environment => f.write_str("Environment"),
        }
    }
}

/// Region and credential source used to sign every request of one client.
#[derive(Debug, Clone)]
pub struct SigningConfig {
    region: String,
    source: CredentialSource,
}

impl SigningConfig {
    /// Create a signing configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the region is empty.
    pub fn new(region: impl Into<String>, source: CredentialSource) -> Result<Self> {
        let region = region.into().trim().to_string();
        if region.is_empty() {
            return Err(Error::ConfigError("signing region is empty".to_string()));
        }
        Ok(Self { region, source })
    }

    /// Environment credentials with the region from `AWS_REGION` or
    /// `AWS_DEFAULT_REGION`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if neither variable names a region.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = region_from_lookup(lookup).ok_or_else(|| {
            Error::ConfigError(format!(
                "no signing region: set {AWS_REGION} or {AWS_DEFAULT_REGION}"
            ))
        })?;
        Self::new(region, CredentialSource::Environment)
    }

    /// Signing region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Credential source.
    #[must_use]
    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub(crate) fn into_parts(self) -> (String, Arc<dyn ProvideCredential>) {
        (self.region, self.source.into_provider())
    }
}

/// Region named by `AWS_REGION`, falling back to `AWS_DEFAULT_REGION`.
#[must_use]
pub fn region_from_env() -> Option<String> {
    region_from_lookup(|name| std::env::var(name).ok())
}

fn region_from_lookup<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    [AWS_REGION, AWS_DEFAULT_REGION]
        .into_iter()
        .filter_map(&lookup)
        .find(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockCredentialBroker;
    use std::collections::HashMap;

    #[test]
    fn test_empty_region_rejected() {
        let err = SigningConfig::new("  ", CredentialSource::Environment).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_region_from_lookup_prefers_aws_region() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(AWS_REGION, "us-east-2"), (AWS_DEFAULT_REGION, "us-west-1")]);
        let config =
            SigningConfig::from_lookup(|name| vars.get(name).map(ToString::to_string)).unwrap();
        assert_eq!(config.region(), "us-east-2");
        assert!(matches!(config.source(), CredentialSource::Environment));
    }

    #[test]
    fn test_region_from_lookup_falls_back_to_default_region() {
        let vars: HashMap<&str, &str> = HashMap::from([(AWS_DEFAULT_REGION, "us-west-1")]);
        let config =
            SigningConfig::from_lookup(|name| vars.get(name).map(ToString::to_string)).unwrap();
        assert_eq!(config.region(), "us-west-1");
    }

    #[test]
    fn test_region_from_lookup_missing() {
        let err = SigningConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_debug_hides_broker_and_secrets() {
        let source = CredentialSource::broker("inventory", Arc::new(MockCredentialBroker::new()));
        assert_eq!(format!("{source:?}"), r#"Broker { role: "inventory", .. }"#);

        let source = CredentialSource::static_credential(Credential::new("AKID", "hunter2"));
        let debug = format!("{source:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_static_source_provides_same_credential() {
        let config = SigningConfig::new(
            "us-east-2",
            CredentialSource::static_credential(Credential::new("AKID", "secret")),
        )
        .unwrap();
        let (region, provider) = config.into_parts();
        assert_eq!(region, "us-east-2");
        let credential = provider.provide_credential().await.unwrap();
        assert_eq!(credential.access_key_id, "AKID");
    }
}
