//! # inventory-sigv4
//!
//! AWS Signature Version 4 signing for inventory API requests.
//!
//! A [`SigningClient`] wraps a `reqwest::Client` and signs each request just
//! before it is sent, over the buffered body and the time of sending. The
//! credential comes from the single [`CredentialSource`] named by a
//! [`SigningConfig`]:
//!
//! ```no_run
//! use inventory_core::client::ClientConfig;
//! use inventory_sigv4::{CredentialSource, SigningClient, SigningConfig};
//!
//! # fn main() -> inventory_core::Result<()> {
//! let config = SigningConfig::new("us-east-2", CredentialSource::shared_profile("inventory"))?;
//! let client = SigningClient::new(config, &ClientConfig::new())?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod constants;
mod hash;
mod time;

pub mod config;
pub mod credential;
pub mod provider;
pub mod signer;
pub mod transport;

pub use config::{region_from_env, CredentialSource, SigningConfig};
pub use constants::EXECUTE_API_SERVICE;
pub use credential::Credential;
pub use provider::{
    BrokerCredentialProvider, CredentialBroker, EnvironmentCredentialProvider,
    ProfileCredentialProvider, ProvideCredential, StaticCredentialProvider,
};
pub use signer::RequestSigner;
pub use transport::SigningClient;
