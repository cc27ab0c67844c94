//! Atomic replacement of the current settings snapshot
//!
//! Readers take a cheap `Arc` clone of the current snapshot and resolve
//! against it without holding any lock, so a concurrent fetch never exposes
//! a half-updated tree.

use crate::error::Result;
use crate::models::Settings;
use crate::observability::{SettingsMetrics, StructuredLogger};
use crate::source::SettingsSource;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// One installed settings snapshot
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub settings: Arc<Settings>,
    /// Increments on every install; 0 is the empty initial snapshot
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
}

/// Holder for the agent's current settings snapshot
#[derive(Clone)]
pub struct SettingsHolder {
    current: Arc<RwLock<Snapshot>>,
    metrics: SettingsMetrics,
}

impl Default for SettingsHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsHolder {
    /// Start with an empty snapshot
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(Snapshot {
                settings: Arc::new(Settings::default()),
                generation: 0,
                loaded_at: Utc::now(),
            })),
            metrics: SettingsMetrics::new(),
        }
    }

    pub async fn current(&self) -> Arc<Settings> {
        self.current.read().await.settings.clone()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.current.read().await.clone()
    }

    /// Install `settings` as the new snapshot, returning the previous one
    pub async fn replace(&self, settings: Settings) -> Snapshot {
        self.install(Arc::new(settings)).await
    }

    async fn install(&self, settings: Arc<Settings>) -> Snapshot {
        let mut current = self.current.write().await;
        let next = Snapshot {
            settings: settings.clone(),
            generation: current.generation + 1,
            loaded_at: Utc::now(),
        };

        self.metrics.record_snapshot(&settings);
        StructuredLogger::new(settings.agent_id.as_str())
            .log_snapshot_loaded(&settings, next.generation);

        std::mem::replace(&mut *current, next)
    }

    /// Fetch from `source` and install the result
    ///
    /// Returns the snapshot installed by this call, even if a concurrent
    /// install has already superseded it. A failed fetch leaves the current
    /// snapshot untouched and is returned to the caller unchanged; only
    /// rejected documents count as decode failures.
    pub async fn refresh(&self, source: &dyn SettingsSource) -> Result<Arc<Settings>> {
        match source.settings().await {
            Ok(settings) => {
                let settings = Arc::new(settings);
                self.install(settings.clone()).await;
                Ok(settings)
            }
            Err(err) => {
                if err.is_decode_failure() {
                    self.metrics.inc_decode_failures();
                }
                let agent_id = self.current().await.agent_id.clone();
                StructuredLogger::new(agent_id).log_load_failure("settings source", &err);
                Err(err)
            }
        }
    }
}
