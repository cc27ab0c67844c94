//! Effective settings after operator overrides

use anyhow::Result;
use colored::Colorize;
use settings_core::{redact_userinfo, Settings};

use crate::output::{format_bytes, print_heading, print_json, yes_no, OutputFormat};

/// Show the values the agent will actually run with
///
/// Credentials embedded in the mbus URL are never printed.
pub fn show_resolved(settings: &Settings, format: OutputFormat) -> Result<()> {
    let mut resolved = settings.resolve();
    resolved.mbus_url = redact_userinfo(&resolved.mbus_url);

    match format {
        OutputFormat::Json => print_json(&resolved)?,
        OutputFormat::Table => {
            print_heading("Resolved Settings");
            println!("Agent ID:       {}", resolved.agent_id.cyan());
            println!("VM:             {}", settings.vm.name);
            println!("Mbus URL:       {}", resolved.mbus_url.cyan());
            println!("Mbus mTLS:      {}", yes_no(resolved.nats_mutual_tls));
            println!("Blobstore:      {}", resolved.blobstore.provider.cyan());
            for (key, value) in &resolved.blobstore.options {
                println!("  {}: {}", key, value);
            }
            println!("NTP servers:    {}", resolved.ntp_servers.join(", "));
            match resolved.swap_size_bytes {
                Some(bytes) => println!("Swap size:      {}", format_bytes(bytes)),
                None => println!("Swap size:      {}", "platform default".dimmed()),
            }
            println!("Parallel:       {}", resolved.parallel);
        }
    }

    Ok(())
}
