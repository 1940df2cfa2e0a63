//! In-memory stand-in for the data-fetching layer
//!
//! Holds one module's records and answers search and delete requests the way
//! the backend API would, including an artificial latency so the debounce and
//! last-query-wins paths are exercised.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use backoffice_core::{
    BackofficeError, DeleteOperation, Entity, PendingOperation, Record, Result, SearchDelegate,
};
use parking_lot::RwLock;

pub struct InMemoryStore {
    module: &'static str,
    records: Arc<RwLock<Vec<Record>>>,
    search_keys: Vec<String>,
    latency: Duration,
}

impl InMemoryStore {
    pub fn new(module: &'static str, records: Vec<Record>, search_keys: &[&str]) -> Self {
        Self {
            module,
            records: Arc::new(RwLock::new(records)),
            search_keys: search_keys.iter().map(|k| k.to_string()).collect(),
            latency: Duration::from_millis(50),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn snapshot(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    /// Apply an edit locally before the server confirms it
    pub fn optimistic_update(&self, id: &str, key: &str, value: &str) -> Result<()> {
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| BackofficeError::Other(format!("{} not found: {}", self.module, id)))?;
        record.set_field(key, value);
        *record = record.clone().optimistic(Some(PendingOperation::Update));
        Ok(())
    }

    /// Mark rows as being deleted while the request is in flight
    pub fn mark_deleting(&self, ids: &[String]) {
        let mut records = self.records.write();
        for record in records.iter_mut().filter(|r| ids.iter().any(|id| id == r.id())) {
            *record = record.clone().optimistic(Some(PendingOperation::Delete));
        }
    }
}

#[async_trait]
impl SearchDelegate<Record> for InMemoryStore {
    #[tracing::instrument(skip(self), fields(module = self.module))]
    async fn search(&self, query: &str) -> Result<Vec<Record>> {
        tokio::time::sleep(self.latency).await;

        let needle = query.trim().to_lowercase();
        let results: Vec<Record> = self
            .records
            .read()
            .iter()
            .filter(|record| {
                self.search_keys.iter().any(|key| {
                    record
                        .field(key)
                        .and_then(|value| value.search_text())
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            })
            .cloned()
            .collect();

        tracing::debug!(count = results.len(), "search answered");
        Ok(results)
    }
}

#[async_trait]
impl DeleteOperation for InMemoryStore {
    #[tracing::instrument(skip(self), fields(module = self.module, count = ids.len()))]
    async fn delete(&self, ids: &[String]) -> Result<()> {
        self.mark_deleting(ids);
        tokio::time::sleep(self.latency).await;

        let mut records = self.records.write();
        let missing: Vec<&String> = ids
            .iter()
            .filter(|id| !records.iter().any(|r| r.id() == id.as_str()))
            .collect();
        if !missing.is_empty() {
            return Err(BackofficeError::Delete(format!(
                "{} not found: {:?}",
                self.module, missing
            )));
        }

        records.retain(|r| !ids.iter().any(|id| id == r.id()));
        tracing::info!(remaining = records.len(), "records deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_table::{RowStyle, resolve_row_presentation};
    use pretty_assertions::assert_eq;

    fn store() -> InMemoryStore {
        let records = vec![
            Record::new("1").with_field("name", "Maria Souza"),
            Record::new("2").with_field("name", "João Lima"),
            Record::new("3").with_field("name", "Ana Maria"),
        ];
        InMemoryStore::new("leads", records, &["name"]).with_latency(Duration::from_millis(5))
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_matches_keys() {
        let results = store().search("maria").await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_removes_records() {
        let store = store();
        store.delete(&["2".to_string()]).await.unwrap();
        assert_eq!(store.snapshot().len(), 2);

        let err = store.delete(&["9".to_string()]).await.unwrap_err();
        assert!(matches!(err, BackofficeError::Delete(_)));
    }

    #[test]
    fn test_optimistic_update_marks_row() {
        let store = store();
        store.optimistic_update("2", "name", "João L.").unwrap();
        let row = store.snapshot().into_iter().find(|r| r.id() == "2").unwrap();
        assert_eq!(resolve_row_presentation(&row).style, RowStyle::Updated);
        assert!(store.optimistic_update("9", "name", "x").is_err());
    }
}
