//! Network settings and their classification
//!
//! Networks are keyed by name in a `BTreeMap`, so every scan below walks
//! them in lexicographic name order and is deterministic for a given
//! snapshot.

use crate::models::null_as_default;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Dynamic,
    /// Floating IP association without a configurable guest interface
    Vip,
    /// Any other declared type, including none
    #[default]
    #[serde(other)]
    Manual,
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Dynamic => "dynamic",
            NetworkType::Vip => "vip",
            NetworkType::Manual => "manual",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the platform layer should bring up a network's interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// No guest interface to configure
    Vip,
    Dhcp,
    Static,
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            AddressingMode::Vip => "vip",
            AddressingMode::Dhcp => "dhcp",
            AddressingMode::Static => "static",
        };
        f.write_str(mode)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default, alias = "Destination", deserialize_with = "null_as_default")]
    pub destination: String,
    #[serde(default, alias = "Gateway", deserialize_with = "null_as_default")]
    pub gateway: String,
    #[serde(default, alias = "Netmask", deserialize_with = "null_as_default")]
    pub netmask: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub network_type: NetworkType,

    #[serde(default, deserialize_with = "null_as_default")]
    pub ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub netmask: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gateway: String,
    /// Set once the address was obtained via DHCP
    #[serde(default, deserialize_with = "null_as_default")]
    pub resolved: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub use_dhcp: bool,

    /// Categories (`dns`, `gateway`, ...) this network is the default for
    #[serde(default, deserialize_with = "null_as_default")]
    pub default: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dns: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub mac: String,

    /// Interface was already configured out-of-band
    #[serde(default, deserialize_with = "null_as_default")]
    pub preconfigured: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub routes: Vec<Route>,
}

impl Network {
    pub fn is_vip(&self) -> bool {
        self.network_type == NetworkType::Vip
    }

    pub fn is_dynamic(&self) -> bool {
        self.network_type == NetworkType::Dynamic
    }

    pub fn is_default_for(&self, category: &str) -> bool {
        self.default.iter().any(|c| c == category)
    }

    /// Whether the interface for this network must be configured via DHCP
    ///
    /// First matching rule wins: VIP never, dynamic always, an explicit
    /// `use_dhcp` always. A manual network is static only when it carries
    /// both an IP and a netmask and was not itself resolved via DHCP, so a
    /// manual network missing either field falls back to DHCP.
    pub fn is_dhcp(&self) -> bool {
        if self.is_vip() {
            return false;
        }

        if self.is_dynamic() || self.use_dhcp {
            return true;
        }

        let is_static = !self.ip.is_empty() && !self.netmask.is_empty();
        self.resolved || !is_static
    }

    pub fn addressing_mode(&self) -> AddressingMode {
        if self.is_vip() {
            AddressingMode::Vip
        } else if self.is_dhcp() {
            AddressingMode::Dhcp
        } else {
            AddressingMode::Static
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type: '{}', ip: '{}', netmask: '{}', gateway: '{}', mac: '{}', resolved: '{}', preconfigured: '{}', use_dhcp: '{}'",
            self.network_type,
            self.ip,
            self.netmask,
            self.gateway,
            self.mac,
            self.resolved,
            self.preconfigured,
            self.use_dhcp,
        )
    }
}

/// Networks of a settings snapshot, keyed by network name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Networks(BTreeMap<String, Network>);

impl Networks {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Network> {
        self.0.get(name)
    }

    /// Iterate `(name, network)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Network)> {
        self.0.iter().map(|(name, network)| (name.as_str(), network))
    }

    pub fn network_for_mac(&self, mac: &str) -> Option<&Network> {
        let found = self.0.values().find(|network| network.mac == mac);
        if found.is_none() {
            debug!(mac = %mac, "No network matches hardware address");
        }
        found
    }

    /// Default network for a category such as `dns` or `gateway`
    ///
    /// A lone network is the default for every category, whatever its
    /// declared default list says.
    pub fn default_network_for(&self, category: &str) -> Option<&Network> {
        if self.0.len() == 1 {
            return self.0.values().next();
        }

        let found = self
            .0
            .values()
            .find(|network| network.is_default_for(category));
        if found.is_none() {
            debug!(category = %category, "No default network for category");
        }
        found
    }

    /// IP address the agent should report as its own
    ///
    /// Prefers the first network (by name) that declares any default
    /// category and has an IP, then the first network with any IP.
    pub fn default_ip(&self) -> Option<&str> {
        let with_ip = || self.0.values().filter(|network| !network.ip.is_empty());

        with_ip()
            .find(|network| !network.default.is_empty())
            .or_else(|| with_ip().next())
            .map(|network| network.ip.as_str())
    }

    /// Every non-empty IP, in network name order
    pub fn ips(&self) -> Vec<&str> {
        self.0
            .values()
            .filter(|network| !network.ip.is_empty())
            .map(|network| network.ip.as_str())
            .collect()
    }

    /// True when every network with a guest interface was set up out-of-band
    ///
    /// VIP networks are skipped, so a VIP-only set is trivially preconfigured.
    pub fn is_preconfigured(&self) -> bool {
        self.0
            .values()
            .filter(|network| !network.is_vip())
            .all(|network| network.preconfigured)
    }
}

impl FromIterator<(String, Network)> for Networks {
    fn from_iter<I: IntoIterator<Item = (String, Network)>>(iter: I) -> Self {
        Networks(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Networks {
    type Item = (&'a String, &'a Network);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Network>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
