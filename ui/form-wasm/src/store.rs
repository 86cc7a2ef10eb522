//! Record store over browser local storage.
//!
//! Holds last-saved instances for convenience re-entry. Every key the
//! application writes shares the `fieldform.` prefix, so an emergency
//! flush can clear records and cached forms in one sweep.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use ff_store::{InstanceStore, LastSavedRecord, StoreInitOptions};
use gloo_storage::{LocalStorage, Storage};

const RECORD_PREFIX: &str = "fieldform.record.";
const APP_PREFIX: &str = "fieldform.";
const PROBE_KEY: &str = "fieldform.probe";

fn record_key(enketo_id: &str) -> String {
    format!("{RECORD_PREFIX}{enketo_id}")
}

pub struct WebInstanceStore;

#[async_trait(?Send)]
impl InstanceStore for WebInstanceStore {
    async fn init(&self, options: StoreInitOptions) -> Result<()> {
        // Probe writability: private browsing modes expose the API but
        // reject writes.
        match LocalStorage::raw().set_item(PROBE_KEY, "1") {
            Ok(()) => {
                let _ = LocalStorage::raw().remove_item(PROBE_KEY);
                Ok(())
            }
            Err(err) if options.fail_silently => {
                gloo_console::warn!("record store unavailable", format!("{err:?}"));
                Ok(())
            }
            Err(err) => Err(anyhow!("record store unavailable: {err:?}")),
        }
    }

    async fn flush(&self) -> Result<()> {
        let storage = LocalStorage::raw();
        let length = storage
            .length()
            .map_err(|err| anyhow!("record store unreadable: {err:?}"))?;

        let mut doomed = Vec::new();
        for index in 0..length {
            if let Ok(Some(key)) = storage.key(index) {
                if key.starts_with(APP_PREFIX) {
                    doomed.push(key);
                }
            }
        }
        for key in doomed {
            let _ = storage.remove_item(&key);
        }
        Ok(())
    }

    async fn save_last_saved(&self, record: LastSavedRecord) -> Result<()> {
        LocalStorage::set(record_key(&record.enketo_id), &record)
            .map_err(|err| anyhow!("failed to save record: {err}"))
    }

    async fn load_last_saved(&self, enketo_id: &str) -> Result<Option<LastSavedRecord>> {
        Ok(LocalStorage::get(record_key(enketo_id)).ok())
    }
}
