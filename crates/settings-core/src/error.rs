//! Error types for settings decoding and loading

use std::path::PathBuf;
use thiserror::Error;

/// Field name reported when a raw disk value is neither a string nor an object
pub const DISK_VALUE_FIELD: &str = "<value>";

/// Errors raised while turning a raw settings document into a snapshot
///
/// Lookups that find nothing are not errors; they return `None`.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A raw disk value matched neither the legacy string shape nor the
    /// structured descriptor shape
    #[error("malformed disk '{disk_id}': field '{field}' {reason}")]
    MalformedDisk {
        disk_id: String,
        field: String,
        reason: String,
    },

    #[error("failed to decode settings document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SettingsError {
    pub(crate) fn malformed_disk(
        disk_id: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedDisk {
            disk_id: disk_id.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True when a document was read but rejected, as opposed to unreadable
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::MalformedDisk { .. } | Self::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;
