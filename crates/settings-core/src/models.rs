//! Core data models for the settings snapshot

use crate::disk::Disks;
use crate::env::Env;
use crate::error::Result;
use crate::network::Networks;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const ROOT_USERNAME: &str = "root";
pub const VCAP_USERNAME: &str = "vcap";
pub const ADMIN_GROUP: &str = "admin";
pub const SUDOERS_GROUP: &str = "bosh_sudoers";
pub const SSHERS_GROUP: &str = "bosh_sshers";
pub const EPHEMERAL_USER_PREFIX: &str = "bosh_";

/// Root settings document received from the infrastructure back-end
///
/// Built once per configuration fetch and never mutated afterwards; every
/// resolution method is a read-only projection over this snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub agent_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blobstore: Blobstore,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disks: Disks,
    #[serde(default, deserialize_with = "null_as_default")]
    pub env: Env,
    #[serde(default, deserialize_with = "null_as_default")]
    pub networks: Networks,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ntp: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mbus: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vm: Vm,
}

impl Settings {
    /// Decode a settings document from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decode a settings document from an already-parsed JSON value
    ///
    /// Disks are decoded first so that a malformed disk value surfaces as
    /// [`SettingsError::MalformedDisk`](crate::SettingsError::MalformedDisk)
    /// naming the disk, rather than as a generic decode error.
    pub fn from_value(mut value: Value) -> Result<Self> {
        let disks = match value.get_mut("disks").map(Value::take) {
            None | Some(Value::Null) => Disks::default(),
            Some(raw) => Disks::from_value(raw)?,
        };

        let mut settings: Settings = serde_json::from_value(value)?;
        settings.disks = disks;
        Ok(settings)
    }
}

/// Blobstore provider and its provider-specific options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blobstore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vm {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Secondary payload used to re-associate persistent disks after recreation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSettings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub disk_associations: Vec<DiskAssociation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trusted_certs: String,
}

impl UpdateSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskAssociation {
    pub name: String,
    #[serde(rename = "cid")]
    pub disk_cid: String,
}

/// Versioned DNS records pushed alongside settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecords {
    #[serde(rename = "Version", alias = "version", default)]
    pub version: u64,
    /// `[ip, hostname]` pairs
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<[String; 2]>,
}

/// Treat an explicit JSON `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_minimal_document() {
        let settings = Settings::from_json(r#"{"agent_id": "agent-1"}"#).unwrap();

        assert_eq!(settings.agent_id, "agent-1");
        assert!(settings.networks.is_empty());
        assert!(settings.disks.persistent.is_empty());
        assert!(settings.ntp.is_empty());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let settings = Settings::from_json(
            r#"{"agent_id": null, "mbus": null, "ntp": null, "vm": null, "env": {"bosh": {"password": null}}}"#,
        )
        .unwrap();

        assert_eq!(settings.agent_id, "");
        assert_eq!(settings.mbus, "");
        assert!(settings.ntp.is_empty());
        assert_eq!(settings.vm.name, "");
        assert_eq!(settings.env.password(), "");
    }

    #[test]
    fn test_blobstore_options_are_kept_opaque() {
        let settings = Settings::from_json(
            r#"{"blobstore": {"provider": "local", "options": {"blobstore_path": "/var/cache", "retries": 3}}}"#,
        )
        .unwrap();

        assert_eq!(settings.blobstore.provider, "local");
        assert_eq!(settings.blobstore.options["blobstore_path"], "/var/cache");
        assert_eq!(settings.blobstore.options["retries"], 3);
    }

    #[test]
    fn test_update_settings_decoding() {
        let update = UpdateSettings::from_json(
            r#"{
                "disk_associations": [
                    {"name": "data", "cid": "disk-3845"},
                    {"name": "logs", "cid": "disk-9012"}
                ],
                "trusted_certs": "-----BEGIN CERTIFICATE-----\nabc\n-----END CERTIFICATE-----"
            }"#,
        )
        .unwrap();

        assert_eq!(update.disk_associations.len(), 2);
        assert_eq!(update.disk_associations[0].name, "data");
        assert_eq!(update.disk_associations[0].disk_cid, "disk-3845");
        assert!(update.trusted_certs.starts_with("-----BEGIN"));
    }

    #[test]
    fn test_dns_records_decoding() {
        let records: DnsRecords = serde_json::from_str(
            r#"{"Version": 7, "records": [["10.0.0.5", "web-0.internal"]]}"#,
        )
        .unwrap();

        assert_eq!(records.version, 7);
        assert_eq!(records.records[0][1], "web-0.internal");
    }
}
