//! Configuration file loading for inventory clients.
//!
//! A named profile (`default` unless told otherwise) is read from
//! `<profile>.yml` in `/etc/inventory` or `$HOME/.inventory`. The file names
//! the API base URL and how request-signing credentials are obtained:
//!
//! ```yaml
//! baseurl: https://inventory.api.local/v0
//! aws:
//!   region: us-east-2
//!   profile: inventory      # shared credentials profile, or
//!   vault_role: inventory   # short-lived broker credentials
//! ```

use crate::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;
use validator::Validate;

/// Profile used when none is requested.
pub const DEFAULT_PROFILE: &str = "default";

/// System-wide configuration directory.
pub const SYSTEM_CONFIG_DIR: &str = "/etc/inventory";

/// Per-user configuration directory, relative to the home directory.
pub const USER_CONFIG_DIR: &str = ".inventory";

const CONFIG_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Client configuration loaded from a profile file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InventoryConfig {
    /// Inventory API base URL
    #[validate(url)]
    pub baseurl: String,

    /// Request-signing settings
    #[serde(default)]
    pub aws: AwsSettings,
}

/// Request-signing settings from the `aws` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsSettings {
    /// Signing region; falls back to the environment when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Broker role issuing short-lived credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_role: Option<String>,

    /// Shared credentials profile name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// The single credential strategy a configuration selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSelection {
    /// Credentials issued by a broker for the given role
    Broker(String),
    /// Credentials from the named shared-credentials profile
    SharedProfile(String),
    /// Credentials from `AWS_*` environment variables
    Environment,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl InventoryConfig {
    /// Create a configuration for the given base URL with environment credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(baseurl: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            baseurl: baseurl.into(),
            aws: AwsSettings::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the signing region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.aws.region = Some(region.into());
        self
    }

    /// Use a shared credentials profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.aws.profile = Some(profile.into());
        self
    }

    /// Use broker-issued credentials for a role.
    #[must_use]
    pub fn with_vault_role(mut self, role: impl Into<String>) -> Self {
        self.aws.vault_role = Some(role.into());
        self
    }

    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or validation fails.
    pub fn from_yaml_str(contents: &str) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a named profile from the standard configuration directories.
    ///
    /// # Errors
    ///
    /// Returns an error if no profile file exists or it cannot be parsed.
    pub fn load(profile: Option<&str>) -> Result<Self, Error> {
        Self::load_from_dirs(profile, &search_dirs())
    }

    /// Load a named profile from the first directory that contains it.
    ///
    /// # Errors
    ///
    /// Returns an error if no profile file exists or it cannot be parsed.
    pub fn load_from_dirs(profile: Option<&str>, dirs: &[PathBuf]) -> Result<Self, Error> {
        let profile = profile.filter(|p| !p.is_empty()).unwrap_or(DEFAULT_PROFILE);

        let path = dirs
            .iter()
            .flat_map(|dir| CONFIG_EXTENSIONS.iter().map(move |ext| profile_path(dir, profile, ext)))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                Error::ConfigError(format!(
                    "no `{profile}.yml` configuration file found in {}",
                    dirs.iter()
                        .map(|d| d.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;

        debug!(path = %path.display(), "loading inventory configuration");
        let contents = std::fs::read_to_string(&path).map_err(|err| {
            Error::ConfigError(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        Url::parse(&self.baseurl)
            .map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))
    }

    /// Configured signing region, if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        non_empty(self.aws.region.as_ref())
    }

    /// Resolve which credential strategy this configuration selects.
    ///
    /// # Errors
    ///
    /// Returns an error if both a broker role and a shared profile are set.
    pub fn credential_selection(&self) -> Result<CredentialSelection, Error> {
        match (
            non_empty(self.aws.vault_role.as_ref()),
            non_empty(self.aws.profile.as_ref()),
        ) {
            (Some(_), Some(_)) => Err(Error::ConfigError(
                "aws.vault_role and aws.profile are mutually exclusive".to_string(),
            )),
            (Some(role), None) => Ok(CredentialSelection::Broker(role.to_string())),
            (None, Some(profile)) => Ok(CredentialSelection::SharedProfile(profile.to_string())),
            (None, None) => Ok(CredentialSelection::Environment),
        }
    }
}

fn profile_path(dir: &Path, profile: &str, ext: &str) -> PathBuf {
    dir.join(format!("{profile}.{ext}"))
}

fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(SYSTEM_CONFIG_DIR)];
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(USER_CONFIG_DIR));
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_inventory_config_new() {
        let config = InventoryConfig::new("https://inventory.api.local/v0").unwrap();
        assert_eq!(config.baseurl, "https://inventory.api.local/v0");
        assert_eq!(
            config.credential_selection().unwrap(),
            CredentialSelection::Environment
        );
        assert!(config.region().is_none());
    }

    #[test]
    fn test_inventory_config_invalid_url() {
        assert!(InventoryConfig::new("not-a-url").is_err());
    }

    #[test]
    fn test_from_yaml_profile_selection() {
        let config = InventoryConfig::from_yaml_str(
            "baseurl: https://inventory.api.local/v0\naws:\n  region: us-east-2\n  profile: ops\n",
        )
        .unwrap();
        assert_eq!(config.region(), Some("us-east-2"));
        assert_eq!(
            config.credential_selection().unwrap(),
            CredentialSelection::SharedProfile("ops".to_string())
        );
    }

    #[test]
    fn test_from_yaml_broker_selection() {
        let config = InventoryConfig::from_yaml_str(
            "baseurl: https://inventory.api.local/v0\naws:\n  vault_role: inventory\n  profile: \"\"\n",
        )
        .unwrap();
        assert_eq!(
            config.credential_selection().unwrap(),
            CredentialSelection::Broker("inventory".to_string())
        );
    }

    #[test]
    fn test_conflicting_selection_rejected() {
        let config = InventoryConfig::new("https://inventory.api.local/v0")
            .unwrap()
            .with_profile("ops")
            .with_vault_role("inventory");
        assert!(matches!(
            config.credential_selection(),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_from_yaml_invalid_url() {
        let result = InventoryConfig::from_yaml_str("baseurl: nope\n");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_load_from_dirs_first_match_wins() {
        let system = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        fs::write(
            system.path().join("lab.yml"),
            "baseurl: https://system.local/v0\n",
        )
        .unwrap();
        fs::write(
            user.path().join("lab.yaml"),
            "baseurl: https://user.local/v0\n",
        )
        .unwrap();

        let dirs = vec![system.path().to_path_buf(), user.path().to_path_buf()];
        let config = InventoryConfig::load_from_dirs(Some("lab"), &dirs).unwrap();
        assert_eq!(config.baseurl, "https://system.local/v0");

        let dirs = vec![user.path().to_path_buf()];
        let config = InventoryConfig::load_from_dirs(Some("lab"), &dirs).unwrap();
        assert_eq!(config.baseurl, "https://user.local/v0");
    }

    #[test]
    fn test_load_defaults_profile_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.yml"),
            "baseurl: https://inventory.api.local/v0\n",
        )
        .unwrap();
        let config = InventoryConfig::load_from_dirs(None, &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(config.parse_base_url().unwrap().path(), "/v0");
    }

    #[test]
    fn test_load_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let err = InventoryConfig::load_from_dirs(Some("absent"), &[dir.path().to_path_buf()])
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
