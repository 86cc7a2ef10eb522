use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreInitOptions {
    /// Treat an unavailable backend as a logged no-op instead of an error.
    pub fail_silently: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastSavedRecord {
    pub enketo_id: String,
    pub instance_xml: String,
    pub updated_epoch_ms: u64,
}

#[async_trait(?Send)]
pub trait InstanceStore {
    async fn init(&self, options: StoreInitOptions) -> Result<()>;
    /// Destructively clear everything the store holds.
    async fn flush(&self) -> Result<()>;
    async fn save_last_saved(&self, record: LastSavedRecord) -> Result<()>;
    async fn load_last_saved(&self, enketo_id: &str) -> Result<Option<LastSavedRecord>>;
}

#[derive(Default)]
pub struct NoopStore;

#[async_trait(?Send)]
impl InstanceStore for NoopStore {
    async fn init(&self, _options: StoreInitOptions) -> Result<()> {
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    async fn save_last_saved(&self, _record: LastSavedRecord) -> Result<()> {
        Ok(())
    }

    async fn load_last_saved(&self, _enketo_id: &str) -> Result<Option<LastSavedRecord>> {
        Ok(None)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, LastSavedRecord>>,
}

impl InMemoryStore {
    fn records(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, LastSavedRecord>>> {
        self.records.write().map_err(|_| anyhow!("record store lock poisoned"))
    }
}

#[async_trait(?Send)]
impl InstanceStore for InMemoryStore {
    async fn init(&self, _options: StoreInitOptions) -> Result<()> {
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.records()?.clear();
        Ok(())
    }

    async fn save_last_saved(&self, record: LastSavedRecord) -> Result<()> {
        self.records()?.insert(record.enketo_id.clone(), record);
        Ok(())
    }

    async fn load_last_saved(&self, enketo_id: &str) -> Result<Option<LastSavedRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| anyhow!("record store lock poisoned"))?;
        Ok(records.get(enketo_id).cloned())
    }
}
