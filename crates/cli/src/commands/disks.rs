//! Disk inspection commands

use anyhow::{bail, Result};
use serde::Serialize;
use settings_core::{DiskSettings, Settings};
use tabled::Tabled;

use crate::output::{or_dash, print_heading, print_info, print_json, print_table, OutputFormat};

/// Row for the disks table
#[derive(Tabled)]
struct DiskRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Volume ID")]
    volume_id: String,
    #[tabled(rename = "Device ID")]
    device_id: String,
    #[tabled(rename = "LUN")]
    lun: String,
    #[tabled(rename = "Host Device")]
    host_device_id: String,
    #[tabled(rename = "iSCSI Target")]
    iscsi_target: String,
    #[tabled(rename = "FS")]
    file_system: String,
    #[tabled(rename = "Mount Options")]
    mount_options: String,
}

impl DiskRow {
    fn new(kind: &'static str, disk: &DiskSettings) -> Self {
        Self {
            kind,
            id: or_dash(&disk.id),
            path: or_dash(&disk.path),
            volume_id: or_dash(&disk.volume_id),
            device_id: or_dash(&disk.device_id),
            lun: or_dash(&disk.lun),
            host_device_id: or_dash(&disk.host_device_id),
            iscsi_target: or_dash(&disk.iscsi_settings.target),
            file_system: or_dash(disk.file_system_type.as_str()),
            mount_options: or_dash(&disk.mount_options.join(",")),
        }
    }
}

/// Normalized disks as handed to the platform layer
#[derive(Serialize)]
struct DiskReport<'a> {
    system: &'a str,
    ephemeral: Option<DiskSettings>,
    persistent: Vec<DiskSettings>,
    raw_ephemeral: &'a [DiskSettings],
}

/// Show normalized disk settings, or a single persistent disk
pub fn show_disks(settings: &Settings, disk_id: Option<&str>, format: OutputFormat) -> Result<()> {
    if let Some(disk_id) = disk_id {
        let Some(disk) = settings.persistent_disk_settings(disk_id) else {
            bail!("persistent disk '{}' not found in settings", disk_id);
        };

        return match format {
            OutputFormat::Json => print_json(&disk),
            OutputFormat::Table => {
                print_table(&[DiskRow::new("persistent", &disk)]);
                Ok(())
            }
        };
    }

    let report = DiskReport {
        system: &settings.disks.system,
        ephemeral: settings
            .disks
            .ephemeral
            .is_some()
            .then(|| settings.ephemeral_disk_settings()),
        persistent: settings.all_persistent_disk_settings(),
        raw_ephemeral: settings.raw_ephemeral_disk_settings(),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_heading("Disks");
            println!("System: {}", or_dash(report.system));
            println!();

            let mut rows = Vec::new();
            if let Some(ephemeral) = &report.ephemeral {
                rows.push(DiskRow::new("ephemeral", ephemeral));
            }
            rows.extend(report.persistent.iter().map(|d| DiskRow::new("persistent", d)));
            rows.extend(
                report
                    .raw_ephemeral
                    .iter()
                    .map(|d| DiskRow::new("raw-ephemeral", d)),
            );
            print_table(&rows);

            if report.ephemeral.is_none() {
                print_info("No ephemeral disk declared");
            }
        }
    }

    Ok(())
}
