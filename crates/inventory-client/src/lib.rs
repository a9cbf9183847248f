//! # inventory-client
//!
//! Typed asynchronous client for the inventory and IPAM API.
//!
//! Every request is signed with AWS SigV4 by the shared
//! [`SigningClient`](inventory_sigv4::SigningClient), and every response is
//! turned into a typed value or an [`Error`] whose variant reflects the HTTP
//! status.
//!
//! ```no_run
//! use inventory_client::InventoryClient;
//! use inventory_core::MacAddress;
//!
//! # async fn run() -> inventory_client::Result<()> {
//! let client = InventoryClient::from_profile(None, None)?;
//! let node = client.node().get("test-000").await?;
//! let config = client
//!     .node_config()
//!     .get_by_mac("00:01:02:03:04:05".parse::<MacAddress>()?)
//!     .await?;
//! # let _ = (node, config);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod ipam;
pub mod models;
pub mod nodeconfig;
pub mod resource;
pub mod response;

pub use client::{InventoryClient, InventoryClientBuilder};
pub use inventory_core::{Error, ErrorKind};
pub use ipam::IpamClient;
pub use models::{InventoryNode, IpReservation, IpamIpRequest, Metadata, Network, Node, System};
pub use nodeconfig::NodeConfigClient;
pub use resource::{Resource, ResourceClient};
pub use response::Exchange;

/// Convenient result alias sharing the `inventory-core` error type.
pub type Result<T> = inventory_core::Result<T>;
