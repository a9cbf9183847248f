//! Asynchronous inventory API client.

use inventory_core::client::ClientConfig;
use inventory_core::config::{CredentialSelection, InventoryConfig};
use inventory_core::query::QueryParams;
use inventory_core::{Error, Result};
use inventory_sigv4::{
    region_from_env, CredentialBroker, CredentialSource, SigningClient, SigningConfig,
};
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::ipam::IpamClient;
use crate::models::{Network, Node, System};
use crate::nodeconfig::NodeConfigClient;
use crate::resource::ResourceClient;
use crate::response::Exchange;

/// Builder for [`InventoryClient`].
#[derive(Debug, Clone)]
pub struct InventoryClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    signing: Vec<SigningConfig>,
}

impl InventoryClientBuilder {
    /// Create a new builder from the provided base URL.
    ///
    /// The base path is treated as a directory: `https://host/v0` and
    /// `https://host/v0/` address the same endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL cannot serve as a base.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            http_config: ClientConfig::new(),
            signing: Vec::new(),
        })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Add a signing configuration. Only the first one is used.
    #[must_use]
    pub fn with_signing_config(mut self, config: SigningConfig) -> Self {
        self.signing.push(config);
        self
    }

    /// Build the client instance.
    ///
    /// Without a signing configuration, credentials and region come from the
    /// `AWS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing transport cannot be built.
    pub fn build(self) -> Result<InventoryClient> {
        let transport = SigningClient::from_configs(self.signing, &self.http_config)?;
        Ok(InventoryClient {
            transport,
            base_url: self.base_url,
        })
    }
}

/// Asynchronous client for the inventory API.
///
/// Cloning is cheap and clones share one signing transport.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    transport: SigningClient,
    base_url: Url,
}

impl InventoryClient {
    /// Construct directly from a base URL and signing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the transport cannot be built.
    pub fn new(base_url: impl AsRef<str>, signing: SigningConfig) -> Result<Self> {
        InventoryClientBuilder::new(base_url)?
            .with_signing_config(signing)
            .build()
    }

    /// Construct from a loaded configuration file.
    ///
    /// A configuration naming a `vault_role` needs a `broker` to issue its
    /// credentials. When the file has no region, `AWS_REGION` or
    /// `AWS_DEFAULT_REGION` supplies it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is inconsistent or
    /// incomplete.
    pub fn from_config(
        config: &InventoryConfig,
        broker: Option<Arc<dyn CredentialBroker>>,
    ) -> Result<Self> {
        let region = config
            .region()
            .map(str::to_string)
            .or_else(region_from_env)
            .ok_or_else(|| {
                Error::ConfigError(
                    "no signing region: set aws.region or AWS_REGION".to_string(),
                )
            })?;

        let source = match config.credential_selection()? {
            CredentialSelection::Broker(role) => {
                let broker = broker.ok_or_else(|| {
                    Error::ConfigError(format!(
                        "aws.vault_role `{role}` requires a credential broker"
                    ))
                })?;
                CredentialSource::broker(role, broker)
            }
            CredentialSelection::SharedProfile(profile) => {
                CredentialSource::shared_profile(profile)
            }
            CredentialSelection::Environment => CredentialSource::Environment,
        };

        Self::new(config.parse_base_url()?, SigningConfig::new(region, source)?)
    }

    /// Construct from a named configuration profile (`default` when `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be loaded or used.
    pub fn from_profile(
        profile: Option<&str>,
        broker: Option<Arc<dyn CredentialBroker>>,
    ) -> Result<Self> {
        let config = InventoryConfig::load(profile)?;
        Self::from_config(&config, broker)
    }

    /// Access the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path against the base URL; a leading `/` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the path cannot be joined.
    pub fn url(&self, path: &str) -> Result<Url> {
        let normalized = path.strip_prefix('/').unwrap_or(path);
        self.base_url.join(normalized).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid inventory path `{path}`: {err}"))
        })
    }

    /// Resolve `<collection>/<id>`, escaping the identifier as one segment.
    ///
    /// Empty and dot-segment identifiers are rejected, since they would
    /// otherwise resolve to the collection or its parent.
    pub(crate) fn item_url(&self, collection: &str, id: &str) -> Result<Url> {
        if id.is_empty() {
            return Err(Error::InvalidEndpoint(format!(
                "empty identifier for `{collection}`"
            )));
        }
        if matches!(id, "." | "..") {
            return Err(Error::InvalidEndpoint(format!(
                "identifier `{id}` is not a valid `{collection}` item"
            )));
        }
        let mut url = self.url(collection)?;
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidEndpoint(format!("`{collection}` cannot take an identifier"))
            })?
            .push(id);
        Ok(url)
    }

    /// Client for nodes.
    #[must_use]
    pub fn node(&self) -> ResourceClient<'_, Node> {
        ResourceClient::new(self)
    }

    /// Client for networks.
    #[must_use]
    pub fn network(&self) -> ResourceClient<'_, Network> {
        ResourceClient::new(self)
    }

    /// Client for systems.
    #[must_use]
    pub fn system(&self) -> ResourceClient<'_, System> {
        ResourceClient::new(self)
    }

    /// Read-only client for node configuration.
    #[must_use]
    pub fn node_config(&self) -> NodeConfigClient<'_> {
        NodeConfigClient::new(self)
    }

    /// Client for IP address management.
    #[must_use]
    pub fn ipam(&self) -> IpamClient<'_> {
        IpamClient::new(self)
    }

    pub(crate) async fn get_json<T>(&self, url: Url, params: &QueryParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.exchange::<()>(Method::GET, url, None, params)
            .await?
            .decode()
    }

    pub(crate) async fn send_json<B, R>(&self, method: Method, url: Url, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.exchange(method, url, Some(body), &QueryParams::new())
            .await?
            .decode()
    }

    pub(crate) async fn send_empty<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.exchange(method, url, body, &QueryParams::new())
            .await?
            .discard()
    }

    async fn exchange<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        params: &QueryParams,
    ) -> Result<Exchange>
    where
        B: Serialize + ?Sized,
    {
        let path = url.path().to_string();
        let mut request = self
            .transport
            .request(method.clone(), url)
            .header(ACCEPT, "application/json");
        if !params.is_empty() {
            request = request.query(params.as_pairs());
        }
        if let Some(payload) = body {
            request = request.json(payload);
        }

        info!(method = %method, path = %path, "inventory request");

        let response = self.transport.send(request).await?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            Error::HttpError(format!(
                "Failed to read inventory response body for {method} {path}: {err}"
            ))
        })?;

        Ok(Exchange::new(method, path, status, bytes.to_vec()))
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|err| {
        Error::ConfigError(format!("Invalid inventory base URL `{base_url}`: {err}"))
    })?;
    if url.cannot_be_a_base() {
        return Err(Error::ConfigError(format!(
            "Inventory base URL `{base_url}` cannot be a base"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
