//! Boundary decoding of raw disk values into [`DiskValue`]

use super::{DiskDescriptor, DiskSettings, DiskValue, Disks, IscsiDescriptor};
use crate::error::{Result, SettingsError, DISK_VALUE_FIELD};
use crate::models::null_as_default;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Identifier reported for errors in the ephemeral disk value
const EPHEMERAL_DISK_ID: &str = "ephemeral";

/// `disks` section exactly as it appears on the wire
#[derive(Debug, Default, Deserialize)]
pub struct RawDisks {
    #[serde(default, deserialize_with = "null_as_default")]
    system: String,
    #[serde(default)]
    ephemeral: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    persistent: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    raw_ephemeral: Vec<DiskSettings>,
}

impl TryFrom<RawDisks> for Disks {
    type Error = SettingsError;

    fn try_from(raw: RawDisks) -> Result<Self> {
        let ephemeral = raw
            .ephemeral
            .map(|value| DiskValue::from_value(EPHEMERAL_DISK_ID, value))
            .transpose()?;

        let persistent = raw
            .persistent
            .into_iter()
            .map(|(disk_id, value)| {
                let disk = DiskValue::from_value(&disk_id, value)?;
                Ok((disk_id, disk))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Disks {
            system: raw.system,
            ephemeral,
            persistent,
            raw_ephemeral: raw.raw_ephemeral,
        })
    }
}

impl Disks {
    /// Decode the `disks` section of a settings document
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawDisks = serde_json::from_value(value)?;
        Disks::try_from(raw)
    }
}

impl DiskValue {
    /// Classify a raw disk value as legacy string or structured descriptor
    ///
    /// Any other JSON shape is rejected; a disk is never guessed at.
    pub fn from_value(disk_id: &str, value: Value) -> Result<Self> {
        match value {
            Value::String(token) => Ok(DiskValue::Legacy(token)),
            Value::Object(map) => DiskDescriptor::from_map(disk_id, &map).map(DiskValue::Descriptor),
            other => {
                warn!(disk_id = %disk_id, found = json_kind(&other), "Rejecting malformed disk value");
                Err(SettingsError::malformed_disk(
                    disk_id,
                    DISK_VALUE_FIELD,
                    format!("must be a string or an object, found {}", json_kind(&other)),
                ))
            }
        }
    }
}

impl DiskDescriptor {
    fn from_map(disk_id: &str, map: &Map<String, Value>) -> Result<Self> {
        let iscsi_settings = match map.get("iscsi_settings") {
            None | Some(Value::Null) => None,
            Some(Value::Object(iscsi)) => Some(IscsiDescriptor {
                username: string_field(disk_id, iscsi, "username", "iscsi_settings.")?,
                password: string_field(disk_id, iscsi, "password", "iscsi_settings.")?,
                initiator_name: string_field(disk_id, iscsi, "initiator_name", "iscsi_settings.")?,
                target: string_field(disk_id, iscsi, "target", "iscsi_settings.")?,
            }),
            Some(other) => {
                warn!(disk_id = %disk_id, found = json_kind(other), "Rejecting malformed iscsi_settings");
                return Err(SettingsError::malformed_disk(
                    disk_id,
                    "iscsi_settings",
                    format!("must be an object, found {}", json_kind(other)),
                ));
            }
        };

        Ok(DiskDescriptor {
            path: string_field(disk_id, map, "path", "")?,
            volume_id: string_field(disk_id, map, "volume_id", "")?,
            device_id: string_field(disk_id, map, "id", "")?,
            lun: string_field(disk_id, map, "lun", "")?,
            host_device_id: string_field(disk_id, map, "host_device_id", "")?,
            iscsi_settings,
        })
    }
}

/// Optional string key; `null` counts as absent
fn string_field(
    disk_id: &str,
    map: &Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => {
            warn!(disk_id = %disk_id, field = %key, found = json_kind(other), "Rejecting malformed disk field");
            Err(SettingsError::malformed_disk(
                disk_id,
                format!("{prefix}{key}"),
                format!("must be a string, found {}", json_kind(other)),
            ))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
