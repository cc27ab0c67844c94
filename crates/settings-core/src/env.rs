//! Operator environment overrides carried inside the settings document

use crate::disk::FileSystemType;
use crate::models::{null_as_default, Blobstore};
use serde::{Deserialize, Serialize};

/// Default number of parallel operations when the operator sets none
pub const DEFAULT_PARALLEL: u32 = 5;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Env {
    #[serde(rename = "bosh", default, deserialize_with = "null_as_default")]
    pub director: DirectorEnv,
    #[serde(default, deserialize_with = "null_as_default")]
    pub persistent_disk_fs: FileSystemType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub persistent_disk_mount_options: Vec<String>,
}

/// Overrides set by the operator through the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectorEnv {
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keep_root_password: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remove_dev_tools: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remove_static_libraries: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authorized_keys: Vec<String>,
    /// Swap size in megabytes; `None` leaves the platform default in place
    #[serde(rename = "swap_size", default)]
    pub swap_size_mb: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mbus: MBus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ipv6: Ipv6,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blobstores: Vec<Blobstore>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ntp: Vec<String>,
    #[serde(default)]
    pub parallel: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MBus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cert: CertKeyPair,
    #[serde(default, deserialize_with = "null_as_default")]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertKeyPair {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ca: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub private_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certificate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv6 {
    #[serde(default, deserialize_with = "null_as_default")]
    pub enable: bool,
}

impl Env {
    pub fn password(&self) -> &str {
        &self.director.password
    }

    pub fn keep_root_password(&self) -> bool {
        self.director.keep_root_password
    }

    pub fn remove_dev_tools(&self) -> bool {
        self.director.remove_dev_tools
    }

    pub fn remove_static_libraries(&self) -> bool {
        self.director.remove_static_libraries
    }

    pub fn authorized_keys(&self) -> &[String] {
        &self.director.authorized_keys
    }

    pub fn ipv6_enabled(&self) -> bool {
        self.director.ipv6.enable
    }

    /// Swap size in bytes, or `None` when the operator did not set one
    ///
    /// Saturates at `u64::MAX`.
    pub fn swap_size_in_bytes(&self) -> Option<u64> {
        self.director
            .swap_size_mb
            .map(|mb| mb.saturating_mul(BYTES_PER_MB))
    }

    pub fn parallel(&self) -> u32 {
        self.director.parallel.unwrap_or(DEFAULT_PARALLEL)
    }

    /// Mutual TLS to the message bus needs both a client certificate and key
    pub fn is_nats_mutual_tls_enabled(&self) -> bool {
        let cert = &self.director.mbus.cert;
        !cert.certificate.is_empty() && !cert.private_key.is_empty()
    }

    pub fn mbus_cert(&self) -> &CertKeyPair {
        &self.director.mbus.cert
    }
}
