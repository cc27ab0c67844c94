//! Normalization of decoded disk values into [`DiskSettings`]

use super::{DiskDescriptor, DiskSettings, DiskValue, FileSystemType};
use crate::models::Settings;
use tracing::debug;

impl DiskValue {
    /// Expand this value into a descriptor without the environment overlay
    pub fn to_disk_settings(&self) -> DiskSettings {
        match self {
            // Legacy back-ends send one token that some platforms read as a
            // path and others as a volume id, so it fills both.
            DiskValue::Legacy(token) => DiskSettings {
                path: token.clone(),
                volume_id: token.clone(),
                ..Default::default()
            },
            DiskValue::Descriptor(descriptor) => descriptor.to_disk_settings(),
        }
    }
}

impl DiskDescriptor {
    fn to_disk_settings(&self) -> DiskSettings {
        let mut settings = DiskSettings {
            path: self.path.clone().unwrap_or_default(),
            volume_id: self.volume_id.clone().unwrap_or_default(),
            device_id: self.device_id.clone().unwrap_or_default(),
            lun: self.lun.clone().unwrap_or_default(),
            host_device_id: self.host_device_id.clone().unwrap_or_default(),
            ..Default::default()
        };

        if let Some(iscsi) = &self.iscsi_settings {
            settings.iscsi_settings.username = iscsi.username.clone().unwrap_or_default();
            settings.iscsi_settings.password = iscsi.password.clone().unwrap_or_default();
            settings.iscsi_settings.initiator_name =
                iscsi.initiator_name.clone().unwrap_or_default();
            settings.iscsi_settings.target = iscsi.target.clone().unwrap_or_default();
        }

        settings
    }
}

impl DiskSettings {
    fn with_overlay(mut self, file_system_type: FileSystemType, mount_options: &[String]) -> Self {
        self.file_system_type = file_system_type;
        self.mount_options = mount_options.to_vec();
        self
    }
}

impl Settings {
    /// Normalized settings for the persistent disk with the given identifier
    ///
    /// Returns `None` when the snapshot has no such disk.
    pub fn persistent_disk_settings(&self, disk_id: &str) -> Option<DiskSettings> {
        let Some(value) = self.disks.persistent.get(disk_id) else {
            debug!(disk_id = %disk_id, "Persistent disk not present in settings");
            return None;
        };

        let mut settings = value.to_disk_settings();
        settings.id = disk_id.to_string();
        Some(self.apply_disk_overlay(settings))
    }

    /// Normalized settings for every persistent disk, ordered by identifier
    pub fn all_persistent_disk_settings(&self) -> Vec<DiskSettings> {
        self.disks
            .persistent
            .iter()
            .map(|(disk_id, value)| {
                let mut settings = value.to_disk_settings();
                settings.id = disk_id.clone();
                self.apply_disk_overlay(settings)
            })
            .collect()
    }

    /// Normalized settings for the ephemeral disk
    ///
    /// An instance without an ephemeral disk yields an all-empty descriptor.
    pub fn ephemeral_disk_settings(&self) -> DiskSettings {
        match &self.disks.ephemeral {
            Some(value) => self.apply_disk_overlay(value.to_disk_settings()),
            None => DiskSettings::default(),
        }
    }

    /// Raw ephemeral disks, which arrive already normalized
    pub fn raw_ephemeral_disk_settings(&self) -> &[DiskSettings] {
        &self.disks.raw_ephemeral
    }

    fn apply_disk_overlay(&self, settings: DiskSettings) -> DiskSettings {
        settings.with_overlay(
            self.env.persistent_disk_fs,
            &self.env.persistent_disk_mount_options,
        )
    }
}
