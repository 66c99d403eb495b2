//! Sandbox connectivity snapshot.
//!
//! A driver describes what it installed into a container's network namespace
//! with a [`SandboxInfo`]. Endpoints only ever hand out copies of it.

use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

/// An interface a driver placed inside a sandbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Interface name on the host side (e.g., "veth1a2b3c").
    pub src_name: String,
    /// Interface name inside the sandbox (e.g., "eth0").
    pub dst_name: String,
    /// IPv4 address (CIDR format, e.g., "172.17.0.2/16").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// IPv6 address (CIDR format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_ipv6: Option<String>,
}

impl Interface {
    /// Create an interface without addresses.
    pub fn new(src_name: impl Into<String>, dst_name: impl Into<String>) -> Self {
        Self {
            src_name: src_name.into(),
            dst_name: dst_name.into(),
            ..Self::default()
        }
    }

    /// Set the IPv4 address.
    #[must_use]
    pub fn with_address(mut self, cidr: impl Into<String>) -> Self {
        self.address = Some(cidr.into());
        self
    }

    /// Set the IPv6 address.
    #[must_use]
    pub fn with_address_ipv6(mut self, cidr: impl Into<String>) -> Self {
        self.address_ipv6 = Some(cidr.into());
        self
    }
}

/// Connectivity state installed in a sandbox by a driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxInfo {
    /// Interfaces inside the sandbox.
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    /// IPv4 default gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<Ipv4Addr>,
    /// IPv6 default gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_ipv6: Option<Ipv6Addr>,
}

impl SandboxInfo {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interface.
    #[must_use]
    pub fn with_interface(mut self, interface: Interface) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Set the IPv4 gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Ipv4Addr) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the IPv6 gateway.
    #[must_use]
    pub fn with_gateway_ipv6(mut self, gateway: Ipv6Addr) -> Self {
        self.gateway_ipv6 = Some(gateway);
        self
    }
}
