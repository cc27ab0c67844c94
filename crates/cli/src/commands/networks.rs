//! Network inspection commands

use anyhow::{bail, Result};
use colored::Colorize;
use serde::Serialize;
use settings_core::{AddressingMode, Network, Settings};
use tabled::Tabled;

use crate::output::{
    color_mode, or_dash, print_heading, print_json, print_table, print_warning, yes_no,
    OutputFormat,
};

/// Row for the networks table
#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    network_type: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Netmask")]
    netmask: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Defaults")]
    defaults: String,
    #[tabled(rename = "Preconfigured")]
    preconfigured: String,
}

#[derive(Serialize)]
struct NetworkEntry<'a> {
    name: &'a str,
    mode: AddressingMode,
    #[serde(flatten)]
    network: &'a Network,
}

#[derive(Serialize)]
struct NetworkReport<'a> {
    networks: Vec<NetworkEntry<'a>>,
    default_ip: Option<&'a str>,
    preconfigured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_network: Option<&'a str>,
}

/// Show network classification and default selections
///
/// With `--mac`, only the network bound to that hardware address is shown.
pub fn show_networks(
    settings: &Settings,
    category: Option<&str>,
    mac: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let networks = &settings.networks;

    let selected: Vec<NetworkEntry> = match mac {
        Some(mac) => {
            let Some(network) = networks.network_for_mac(mac) else {
                bail!("no network with hardware address '{}'", mac);
            };
            networks
                .iter()
                .filter(|(_, candidate)| std::ptr::eq(*candidate, network))
                .map(entry)
                .collect()
        }
        None => networks.iter().map(entry).collect(),
    };

    let default_network = category.and_then(|category| {
        let network = networks.default_network_for(category)?;
        networks
            .iter()
            .find(|(_, candidate)| std::ptr::eq(*candidate, network))
            .map(|(name, _)| name)
    });

    let report = NetworkReport {
        networks: selected,
        default_ip: networks.default_ip(),
        preconfigured: networks.is_preconfigured(),
        category,
        default_network,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_heading("Networks");
            let rows: Vec<NetworkRow> = report.networks.iter().map(row).collect();
            print_table(&rows);
            println!();

            println!("Default IP:     {}", report.default_ip.unwrap_or("-").cyan());
            println!("Preconfigured:  {}", yes_no(report.preconfigured));

            if let Some(category) = report.category {
                match report.default_network {
                    Some(name) => println!("Default for {}: {}", category, name.cyan()),
                    None => print_warning(&format!("No default network for '{}'", category)),
                }
            }
        }
    }

    Ok(())
}

fn entry<'a>((name, network): (&'a str, &'a Network)) -> NetworkEntry<'a> {
    NetworkEntry {
        name,
        mode: network.addressing_mode(),
        network,
    }
}

fn row(entry: &NetworkEntry) -> NetworkRow {
    let network = entry.network;
    NetworkRow {
        name: entry.name.to_string(),
        network_type: network.network_type.to_string(),
        mode: color_mode(entry.mode),
        ip: or_dash(&network.ip),
        netmask: or_dash(&network.netmask),
        gateway: or_dash(&network.gateway),
        mac: or_dash(&network.mac),
        defaults: or_dash(&network.default.join(",")),
        preconfigured: yes_no(network.preconfigured),
    }
}
