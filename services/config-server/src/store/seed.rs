//! Startup seed data for the config stores.

use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use super::ConfigStore;
use crate::error::StoreError;
use crate::models::{BotConfig, ConfigRecord, EngineConfig};

/// Contents of a seed file: `{ "bots": [...], "engines": [...] }`.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub bots: Vec<BotConfig>,
    #[serde(default)]
    pub engines: Vec<EngineConfig>,
}

impl Seed {
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Internal(format!("failed to read seed file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            StoreError::Internal(format!("failed to parse seed file {}: {}", path.display(), e))
        })
    }

    /// Insert every record, skipping ids that already exist.
    pub async fn apply(
        self,
        bots: &dyn ConfigStore<BotConfig>,
        engines: &dyn ConfigStore<EngineConfig>,
    ) -> Result<SeedReport, StoreError> {
        let bots_created = insert_all(bots, self.bots).await?;
        let engines_created = insert_all(engines, self.engines).await?;

        info!(bots_created, engines_created, "seed data applied");
        Ok(SeedReport {
            bots_created,
            engines_created,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub bots_created: usize,
    pub engines_created: usize,
}

async fn insert_all<R: ConfigRecord>(
    store: &dyn ConfigStore<R>,
    records: Vec<R>,
) -> Result<usize, StoreError> {
    let mut created = 0;
    for record in records {
        let id = record.id().to_string();
        match store.create(record).await {
            Ok(_) => created += 1,
            Err(StoreError::Conflict { .. }) => {
                warn!(kind = R::KIND, id = %id, "seed record already exists, skipping");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(created)
}
