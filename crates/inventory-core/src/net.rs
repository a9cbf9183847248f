//! Strongly-typed network identifiers used by inventory resources.
//!
//! Hardware addresses and CIDR-style IP addresses travel over the wire as
//! strings; these wrappers parse them once so clients cannot mix them up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A 48-bit hardware (MAC) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Creates a hardware address from raw octets.
    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Returns the raw octets.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Parses `00:01:02:03:04:05` or `00-01-02-03-04-05`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not six two-digit hex groups.
    pub fn parse_str(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidAddress(format!("invalid MAC address `{input}`"));
        let separator = if input.contains('-') { '-' } else { ':' };

        let mut octets = [0u8; 6];
        let mut groups = input.split(separator);
        for octet in &mut octets {
            let group = groups.next().ok_or_else(invalid)?;
            if group.len() != 2 {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(group, 16).map_err(|_| invalid())?;
        }
        if groups.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(octets))
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_str(&value)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// An IP address with an optional network prefix length (`10.0.0.1/24`).
///
/// A bare address stays bare: `10.0.0.0` and `10.0.0.0/32` are distinct
/// values and each formats back exactly as it was parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpPrefix {
    addr: IpAddr,
    prefix_len: Option<u8>,
}

impl IpPrefix {
    /// Creates a prefix, validating the length against the address family.
    ///
    /// # Errors
    ///
    /// Returns an error if `prefix_len` exceeds 32 (IPv4) or 128 (IPv6).
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self> {
        if prefix_len > max_prefix_len(addr) {
            return Err(Error::InvalidAddress(format!(
                "prefix length {prefix_len} out of range for {addr}"
            )));
        }
        Ok(Self {
            addr,
            prefix_len: Some(prefix_len),
        })
    }

    /// Returns the address part.
    #[must_use]
    pub const fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Returns the prefix length, if one was given.
    #[must_use]
    pub const fn prefix_len(&self) -> Option<u8> {
        self.prefix_len
    }

    /// Parses `addr/len` or a bare `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address or prefix length is invalid.
    pub fn parse_str(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidAddress(format!("invalid IP prefix `{input}`"));
        match input.split_once('/') {
            Some((addr, len)) => {
                let addr = IpAddr::from_str(addr).map_err(|_| invalid())?;
                let len = len.parse::<u8>().map_err(|_| invalid())?;
                Self::new(addr, len)
            }
            None => IpAddr::from_str(input).map(Self::from).map_err(|_| invalid()),
        }
    }
}

impl From<IpAddr> for IpPrefix {
    fn from(addr: IpAddr) -> Self {
        Self {
            addr,
            prefix_len: None,
        }
    }
}

const fn max_prefix_len(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl FromStr for IpPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl TryFrom<String> for IpPrefix {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_str(&value)
    }
}

impl From<IpPrefix> for String {
    fn from(prefix: IpPrefix) -> Self {
        prefix.to_string()
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix_len {
            Some(len) => write!(f, "{}/{len}", self.addr),
            None => write!(f, "{}", self.addr),
        }
    }
}
