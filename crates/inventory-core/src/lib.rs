//! # inventory-core
//!
//! Core types and utilities for working with the inventory API.
//!
//! This crate provides the shared error taxonomy, typed network identifiers,
//! HTTP client settings and configuration loading used by the signing
//! transport and the resource clients.
//!
//! ## Modules
//!
//! - [`error`] - Error types, remote error envelope and HTTP status mapping
//! - [`net`] - Strongly-typed MAC addresses and IP prefixes
//! - [`config`] - Profile-based configuration files
//! - [`client`] - HTTP client timeouts and pooling
//! - [`query`] - Query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod net;
pub mod query;

// Re-export commonly used types
pub use error::{ApiError, Error, ErrorKind, Result};
pub use net::{IpPrefix, MacAddress};
