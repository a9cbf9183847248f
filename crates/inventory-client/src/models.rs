//! Inventory data models.
//!
//! Only identity and timestamp fields are interpreted by the client; the
//! remaining fields mirror what the service returns and default when absent.

use chrono::{DateTime, Utc};
use inventory_core::{IpPrefix, MacAddress};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::net::IpAddr;

use crate::resource::Resource;

/// Free-form metadata attached to inventory objects.
pub type Metadata = BTreeMap<String, Value>;

/// A physical or virtual node tracked by the inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Inventory identifier.
    #[serde(rename = "InventoryID")]
    pub inventory_id: String,
    /// Position within the chassis.
    #[serde(rename = "ChassisSubIndex", default, skip_serializing_if = "Option::is_none")]
    pub chassis_sub_index: Option<String>,
    /// Tags.
    #[serde(rename = "Tags", default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Network attachments keyed by network name.
    #[serde(rename = "Networks", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub networks: BTreeMap<String, Value>,
    /// Node role.
    #[serde(rename = "Role", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Deployment environment.
    #[serde(rename = "Environment", default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Owning system name.
    #[serde(rename = "System", default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Metadata.
    #[serde(rename = "Metadata", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    /// Last modification time, set by the service.
    #[serde(rename = "LastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Node {
    /// Create a node with only its identifier set.
    #[must_use]
    pub fn new(inventory_id: impl Into<String>) -> Self {
        Self {
            inventory_id: inventory_id.into(),
            ..Self::default()
        }
    }
}

impl Resource for Node {
    const PATH: &'static str = "node";

    fn id(&self) -> &str {
        &self.inventory_id
    }
}

/// Node configuration view, as served for provisioning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryNode {
    /// Inventory identifier.
    #[serde(rename = "InventoryID")]
    pub inventory_id: String,
    /// Hostname.
    #[serde(rename = "Hostname", default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Physical location.
    #[serde(rename = "Location", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    /// Tags.
    #[serde(rename = "Tags", default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Resolved network configuration keyed by network name.
    #[serde(rename = "Networks", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub networks: BTreeMap<String, Value>,
    /// Node role.
    #[serde(rename = "Role", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Deployment environment.
    #[serde(rename = "Environment", default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Owning system.
    #[serde(rename = "System", default, skip_serializing_if = "Option::is_none")]
    pub system: Option<Value>,
    /// Metadata.
    #[serde(rename = "Metadata", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    /// Last modification time, set by the service.
    #[serde(rename = "LastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A network definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Network {
    /// Network name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Description.
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link MTU.
    #[serde(rename = "MTU", default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Metadata.
    #[serde(rename = "Metadata", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    /// Last modification time, set by the service.
    #[serde(rename = "LastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Network {
    /// Create a network with only its name set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Resource for Network {
    const PATH: &'static str = "network";

    fn id(&self) -> &str {
        &self.name
    }
}

/// A system grouping nodes by purpose.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct System {
    /// System name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Abbreviated name.
    #[serde(rename = "ShortName", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// DNS domain.
    #[serde(rename = "Domain", default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Environments keyed by name.
    #[serde(rename = "Environments", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environments: BTreeMap<String, Value>,
    /// Roles.
    #[serde(rename = "Roles", default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Metadata.
    #[serde(rename = "Metadata", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    /// Last modification time, set by the service.
    #[serde(rename = "LastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl System {
    /// Create a system with only its name set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Resource for System {
    const PATH: &'static str = "system";

    fn id(&self) -> &str {
        &self.name
    }
}

/// An IP address reservation.
///
/// A reservation without a `start` is pending: the address is held but not
/// yet claimed by the hardware address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IpReservation {
    /// Reserved address with its subnet prefix length.
    pub ip: IpPrefix,
    /// Hardware address holding the reservation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<MacAddress>,
    /// Start of the lease, set by the service.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// End of the lease, set by the service.
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// Metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    /// Default gateway for the subnet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
    /// DNS servers for the subnet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<IpAddr>,
    /// Free-form host description.
    #[serde(
        rename = "HostInformation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub host_information: Option<String>,
}

impl IpReservation {
    /// Whether the reservation has not been claimed yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.start.is_none()
    }
}

/// Body of an IP reservation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpamIpRequest {
    /// Hardware address requesting an address.
    #[serde(rename = "HwAddress")]
    pub hw_address: MacAddress,
    /// Subnet to allocate from.
    #[serde(rename = "Subnet")]
    pub subnet: IpPrefix,
}

impl IpamIpRequest {
    /// Create a request for `hw_address` in `subnet`.
    #[must_use]
    pub const fn new(hw_address: MacAddress, subnet: IpPrefix) -> Self {
        Self { hw_address, subnet }
    }
}
