use super::{StoreError, StringStore};
use crate::analyzer::StringRecord;
use crate::filter::StructuredFilter;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory string store
///
/// Records are keyed by content hash and filtered with
/// [`StructuredFilter::matches`].
///
/// # Limitations
/// - Data is lost on restart
/// - Single process only
#[derive(Clone, Default)]
pub struct MemoryStringStore {
    records: Arc<RwLock<HashMap<String, StringRecord>>>,
}

impl MemoryStringStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl StringStore for MemoryStringStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StringRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn find_by_value(&self, value: &str) -> Result<Option<StringRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.value == value).cloned())
    }

    async fn find(&self, filter: &StructuredFilter) -> Result<Vec<StringRecord>, StoreError> {
        let records = self.records.read().await;
        let mut matches: Vec<StringRecord> = records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        // Insertion order, as a document store would return them
        matches.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(matches)
    }

    async fn insert(&self, record: &StringRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(StoreError::DuplicateKey(record.id.clone()));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn delete_by_value(&self, value: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let id = records
            .values()
            .find(|r| r.value == value)
            .map(|r| r.id.clone());
        Ok(id.and_then(|id| records.remove(&id)).is_some())
    }
}
