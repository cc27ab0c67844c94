//! Precedence between legacy top-level fields and operator overrides
//!
//! When the operator environment carries a non-empty value for a field it
//! replaces the legacy value wholesale; the two are never merged.

use crate::models::{Blobstore, Settings};
use serde::{Deserialize, Serialize};

/// Effective values the agent runs with, derived from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSettings {
    pub agent_id: String,
    pub mbus_url: String,
    pub blobstore: Blobstore,
    pub ntp_servers: Vec<String>,
    /// `None` when no swap size was configured
    pub swap_size_bytes: Option<u64>,
    pub parallel: u32,
    pub nats_mutual_tls: bool,
}

impl Settings {
    /// Message bus URL; the first operator URL wins over the legacy field
    pub fn mbus_url(&self) -> &str {
        self.env
            .director
            .mbus
            .urls
            .first()
            .map(String::as_str)
            .unwrap_or(self.mbus.as_str())
    }

    /// Blobstore; the first operator blobstore wins over the legacy field
    pub fn blobstore(&self) -> &Blobstore {
        self.env
            .director
            .blobstores
            .first()
            .unwrap_or(&self.blobstore)
    }

    /// NTP servers; a non-empty operator list replaces the legacy list
    pub fn ntp_servers(&self) -> &[String] {
        if self.env.director.ntp.is_empty() {
            &self.ntp
        } else {
            &self.env.director.ntp
        }
    }

    pub fn resolve(&self) -> ResolvedSettings {
        ResolvedSettings {
            agent_id: self.agent_id.clone(),
            mbus_url: self.mbus_url().to_string(),
            blobstore: self.blobstore().clone(),
            ntp_servers: self.ntp_servers().to_vec(),
            swap_size_bytes: self.env.swap_size_in_bytes(),
            parallel: self.env.parallel(),
            nats_mutual_tls: self.env.is_nats_mutual_tls_enabled(),
        }
    }
}
