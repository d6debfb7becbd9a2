use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{conflict, not_found, validate_record, ConfigStore};
use crate::error::StoreError;
use crate::models::ConfigRecord;

/// A record slot. `None` marks a record removed while someone still held the slot.
type Slot<R> = Arc<RwLock<Option<R>>>;

struct Index<R> {
    order: Vec<String>,
    slots: HashMap<String, Slot<R>>,
}

/// In-memory store (per-process, not shared between instances).
///
/// Lock order is always index then slot. Updates only take the index read
/// lock to find their slot, so updates on different ids run in parallel.
pub struct MemoryStore<R> {
    index: RwLock<Index<R>>,
}

impl<R: ConfigRecord> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(Index {
                order: Vec::new(),
                slots: HashMap::new(),
            }),
        }
    }

    async fn slot(&self, id: &str) -> Option<Slot<R>> {
        self.index.read().await.slots.get(id).cloned()
    }
}

impl<R: ConfigRecord> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: ConfigRecord> ConfigStore<R> for MemoryStore<R> {
    async fn get_all(&self) -> Result<Vec<R>, StoreError> {
        let index = self.index.read().await;
        let mut records = Vec::with_capacity(index.order.len());
        for id in &index.order {
            if let Some(slot) = index.slots.get(id) {
                if let Some(record) = slot.read().await.as_ref() {
                    records.push(record.clone());
                }
            }
        }
        Ok(records)
    }

    async fn get_by_id(&self, id: &str) -> Result<R, StoreError> {
        let slot = self.slot(id).await.ok_or_else(|| not_found::<R>(id))?;
        let guard = slot.read().await;
        guard.clone().ok_or_else(|| not_found::<R>(id))
    }

    async fn create(&self, record: R) -> Result<R, StoreError> {
        validate_record(&record)?;

        let mut index = self.index.write().await;
        let id = record.id().to_string();
        if index.slots.contains_key(&id) {
            return Err(conflict::<R>(&id));
        }
        index
            .slots
            .insert(id.clone(), Arc::new(RwLock::new(Some(record.clone()))));
        index.order.push(id);
        Ok(record)
    }

    async fn update(&self, record: R) -> Result<R, StoreError> {
        validate_record(&record)?;

        let slot = self
            .slot(record.id())
            .await
            .ok_or_else(|| not_found::<R>(record.id()))?;
        let mut guard = slot.write().await;
        match guard.as_mut() {
            Some(current) => {
                *current = record.clone();
                Ok(record)
            }
            None => Err(not_found::<R>(record.id())),
        }
    }

    async fn delete(&self, id: &str) -> Result<R, StoreError> {
        let mut index = self.index.write().await;
        let slot = index.slots.remove(id).ok_or_else(|| not_found::<R>(id))?;
        index.order.retain(|existing| existing != id);

        let removed = slot.write().await.take();
        removed.ok_or_else(|| not_found::<R>(id))
    }
}
