//! Disk settings as supplied by the infrastructure back-end
//!
//! Older back-ends describe a disk with a single opaque string (a device
//! path such as `/dev/sdb`, or a volume id such as `2`). Newer back-ends send
//! a structured descriptor (`{"path": "/dev/sdc", "volume_id": "3"}`,
//! `{"lun": "0", "host_device_id": "..."}`). Both shapes are decoded into
//! [`DiskValue`] at the input boundary and normalized into [`DiskSettings`].

mod decode;
mod normalize;

use crate::models::null_as_default;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use decode::RawDisks;

/// Disk collections of a settings snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDisks")]
pub struct Disks {
    /// e.g. `/dev/sda`, `1`
    pub system: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<DiskValue>,

    /// Disk identifier to raw disk value
    pub persistent: BTreeMap<String, DiskValue>,

    /// Already-normalized ephemeral disks
    pub raw_ephemeral: Vec<DiskSettings>,
}

/// A raw disk value in exactly one of its two supported shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DiskValue {
    /// Opaque token that is a device path or a volume id, depending on the
    /// platform reading it
    Legacy(String),
    Descriptor(DiskDescriptor),
}

/// Structured disk value; every key is independently optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiskDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<String>,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lun: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_settings: Option<IscsiDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IscsiDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiator_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Normalized disk descriptor handed to the platform layer
///
/// The PascalCase aliases accept raw-ephemeral entries written by back-ends
/// that serialized this structure without explicit key names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSettings {
    #[serde(default, alias = "ID", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, alias = "DeviceID", deserialize_with = "null_as_default")]
    pub device_id: String,
    #[serde(default, alias = "VolumeID", deserialize_with = "null_as_default")]
    pub volume_id: String,
    #[serde(default, alias = "Lun", deserialize_with = "null_as_default")]
    pub lun: String,
    #[serde(default, alias = "HostDeviceID", deserialize_with = "null_as_default")]
    pub host_device_id: String,
    #[serde(default, alias = "Path", deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, alias = "ISCSISettings", deserialize_with = "null_as_default")]
    pub iscsi_settings: IscsiSettings,
    #[serde(default, alias = "FileSystemType", deserialize_with = "null_as_default")]
    pub file_system_type: FileSystemType,
    #[serde(default, alias = "MountOptions", deserialize_with = "null_as_default")]
    pub mount_options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IscsiSettings {
    #[serde(default, alias = "InitiatorName", deserialize_with = "null_as_default")]
    pub initiator_name: String,
    #[serde(default, alias = "Username", deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, alias = "Target", deserialize_with = "null_as_default")]
    pub target: String,
    #[serde(default, alias = "Password", deserialize_with = "null_as_default")]
    pub password: String,
}

/// Filesystem requested for persistent disks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileSystemType {
    /// Let the platform pick
    #[default]
    #[serde(rename = "")]
    PlatformDefault,
    #[serde(rename = "ext4")]
    Ext4,
    #[serde(rename = "xfs")]
    Xfs,
}

impl FileSystemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileSystemType::PlatformDefault => "",
            FileSystemType::Ext4 => "ext4",
            FileSystemType::Xfs => "xfs",
        }
    }
}

impl fmt::Display for FileSystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
