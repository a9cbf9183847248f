//! HTTP transport that signs every outgoing request.

use inventory_core::client::ClientConfig;
use inventory_core::{Error, Result};
use reqwest::{Client, ClientBuilder, Method, Request, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::SigningConfig;
use crate::constants::EXECUTE_API_SERVICE;
use crate::provider::ProvideCredential;
use crate::signer::RequestSigner;

const USER_AGENT: &str = concat!("inventory-sigv4/", env!("CARGO_PKG_VERSION"));

/// Reusable HTTP client that attaches a SigV4 signature to each request.
///
/// Cloning is cheap; clones share the connection pool and the credential
/// cache.
#[derive(Debug, Clone)]
pub struct SigningClient {
    http: Client,
    signer: Arc<RequestSigner>,
    provider: Arc<dyn ProvideCredential>,
    credential_timeout: Duration,
}

impl SigningClient {
    /// Build a transport from one signing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SigningConfig, http_config: &ClientConfig) -> Result<Self> {
        let (region, provider) = config.into_parts();

        let mut builder = ClientBuilder::new()
            .timeout(http_config.timeout)
            .connect_timeout(http_config.connect_timeout)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(http_config.pool_idle_timeout)
            .pool_max_idle_per_host(http_config.pool_max_idle_per_host);

        if !http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build signing HTTP client: {err}"))
        })?;

        Ok(Self {
            http,
            signer: Arc::new(RequestSigner::new(EXECUTE_API_SERVICE, &region)),
            provider,
            credential_timeout: http_config.credential_timeout,
        })
    }

    /// Build a transport from zero or more signing configurations.
    ///
    /// The first configuration wins and any others are ignored with a
    /// warning. With none, credentials and region come from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no region can be resolved or the HTTP client
    /// cannot be built.
    pub fn from_configs(
        configs: impl IntoIterator<Item = SigningConfig>,
        http_config: &ClientConfig,
    ) -> Result<Self> {
        let mut configs = configs.into_iter();
        let config = match configs.next() {
            Some(config) => config,
            None => {
                debug!("no signing configuration supplied, using environment credentials");
                SigningConfig::from_env()?
            }
        };

        let ignored = configs.count();
        if ignored > 0 {
            warn!(
                ignored,
                region = config.region(),
                "multiple signing configurations supplied, using the first"
            );
        }

        Self::new(config, http_config)
    }

    /// Signing region.
    #[must_use]
    pub fn region(&self) -> &str {
        self.signer.region()
    }

    /// Start a request; send it with [`SigningClient::send`].
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Build, sign and send a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built, signed or sent.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build()?;
        self.execute(request).await
    }

    /// Sign and send a built request.
    ///
    /// Nothing is sent when credentials cannot be resolved or the request
    /// cannot be signed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialError`], [`Error::Timeout`] or
    /// [`Error::SigningError`] before sending, or a transport error after.
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        let credential =
            tokio::time::timeout(self.credential_timeout, self.provider.provide_credential())
                .await
                .map_err(|_| {
                    Error::Timeout(format!(
                        "credential resolution exceeded {:?}",
                        self.credential_timeout
                    ))
                })??;

        self.signer.sign(&mut request, &credential)?;

        Ok(self.http.execute(request).await?)
    }
}
