//! Settings resolution core for the lifecycle agent
//!
//! This crate turns the configuration document delivered by the
//! infrastructure back-end into decision data for the platform layer:
//! - Disk normalization across legacy string and structured shapes
//! - Network classification (DHCP, static, VIP) and default selection
//! - Precedence between legacy fields and operator environment overrides
//! - Snapshot loading and atomic replacement

pub mod disk;
pub mod env;
pub mod error;
pub mod models;
pub mod network;
pub mod observability;
pub mod resolver;
pub mod snapshot;
pub mod source;

#[cfg(test)]
mod tests;

pub use disk::{
    DiskDescriptor, DiskSettings, DiskValue, Disks, FileSystemType, IscsiDescriptor, IscsiSettings,
};
pub use env::{CertKeyPair, DirectorEnv, Env, Ipv6, MBus, DEFAULT_PARALLEL};
pub use error::{Result, SettingsError};
pub use models::*;
pub use network::{AddressingMode, Network, NetworkType, Networks, Route};
pub use observability::{redact_userinfo, SettingsMetrics, StructuredLogger};
pub use resolver::ResolvedSettings;
pub use snapshot::{SettingsHolder, Snapshot};
pub use source::{read_update_settings, FileSettingsSource, SettingsSource};
