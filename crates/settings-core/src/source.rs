//! Where settings documents come from

use crate::error::{Result, SettingsError};
use crate::models::{Settings, UpdateSettings};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A provider of settings snapshots
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Fetch and decode a fresh settings snapshot
    async fn settings(&self) -> Result<Settings>;

    /// Public SSH key the back-end registered for `username`, if any
    async fn public_ssh_key_for_username(&self, username: &str) -> Result<Option<String>>;
}

/// Settings read from a JSON document on local disk
#[derive(Debug, Clone)]
pub struct FileSettingsSource {
    settings_path: PathBuf,
    public_key_path: Option<PathBuf>,
}

impl FileSettingsSource {
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            public_key_path: None,
        }
    }

    /// Serve the key in `path` for every username
    pub fn with_public_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.public_key_path = Some(path.into());
        self
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }
}

#[async_trait]
impl SettingsSource for FileSettingsSource {
    async fn settings(&self) -> Result<Settings> {
        let contents = read_to_string(&self.settings_path).await?;
        debug!(path = %self.settings_path.display(), bytes = contents.len(), "Read settings document");
        Settings::from_json(&contents)
    }

    async fn public_ssh_key_for_username(&self, username: &str) -> Result<Option<String>> {
        let Some(path) = &self.public_key_path else {
            return Ok(None);
        };

        let key = read_to_string(path).await?;
        let key = key.trim();
        debug!(username = %username, path = %path.display(), "Read public key");
        Ok((!key.is_empty()).then(|| key.to_string()))
    }
}

/// Read an update-settings payload from disk
pub async fn read_update_settings(path: &Path) -> Result<UpdateSettings> {
    let contents = read_to_string(path).await?;
    UpdateSettings::from_json(&contents)
}

async fn read_to_string(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    #[tokio::test]
    async fn test_file_source_reads_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"agent_id": "agent-1", "disks": {"persistent": {"disk-1": "/dev/sdc"}}}"#,
        )
        .await
        .unwrap();

        let source = FileSettingsSource::new(&path);
        let settings = source.settings().await.unwrap();

        assert_eq!(settings.agent_id, "agent-1");
        assert_eq!(
            settings.persistent_disk_settings("disk-1").unwrap().path,
            "/dev/sdc"
        );
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = FileSettingsSource::new(temp_dir.path().join("absent.json"));

        let err = source.settings().await.unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[tokio::test]
    async fn test_file_source_malformed_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"disks": {"persistent": {"disk-1": [1, 2]}}}"#)
            .await
            .unwrap();

        let err = FileSettingsSource::new(&path).settings().await.unwrap_err();
        assert!(matches!(err, SettingsError::MalformedDisk { .. }));
    }

    #[tokio::test]
    async fn test_public_key_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        let key_path = temp_dir.path().join("id_ed25519.pub");
        fs::write(&key_path, "ssh-ed25519 AAAAC3Nza operator\n")
            .await
            .unwrap();

        let without_key = FileSettingsSource::new(&settings_path);
        assert_eq!(
            without_key.public_ssh_key_for_username("vcap").await.unwrap(),
            None
        );

        let with_key = FileSettingsSource::new(&settings_path).with_public_key(&key_path);
        assert_eq!(
            with_key.public_ssh_key_for_username("vcap").await.unwrap(),
            Some("ssh-ed25519 AAAAC3Nza operator".to_string())
        );
    }

    #[tokio::test]
    async fn test_read_update_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("update.json");
        fs::write(
            &path,
            r#"{"disk_associations": [{"name": "data", "cid": "vol-1"}], "trusted_certs": ""}"#,
        )
        .await
        .unwrap();

        let update = read_update_settings(&path).await.unwrap();
        assert_eq!(update.disk_associations[0].disk_cid, "vol-1");
    }
}
