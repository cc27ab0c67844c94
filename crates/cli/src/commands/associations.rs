//! Disk re-association payload inspection

use anyhow::{Context, Result};
use settings_core::read_update_settings;
use std::path::Path;
use tabled::Tabled;

use crate::output::{print_info, print_json, print_table, OutputFormat};

#[derive(Tabled)]
struct AssociationRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Disk CID")]
    disk_cid: String,
}

/// List the disk associations carried by an update-settings payload
pub async fn show_associations(path: &Path, format: OutputFormat) -> Result<()> {
    let update = read_update_settings(path)
        .await
        .with_context(|| format!("Failed to load update settings from {}", path.display()))?;

    match format {
        OutputFormat::Json => print_json(&update)?,
        OutputFormat::Table => {
            let rows: Vec<AssociationRow> = update
                .disk_associations
                .iter()
                .map(|a| AssociationRow {
                    name: a.name.clone(),
                    disk_cid: a.disk_cid.clone(),
                })
                .collect();
            print_table(&rows);

            if !update.trusted_certs.is_empty() {
                let count = update.trusted_certs.matches("BEGIN CERTIFICATE").count();
                print_info(&format!("{} trusted certificate(s) in bundle", count));
            }
        }
    }

    Ok(())
}
