//! String service
//!
//! Orchestrates analysis, filter parsing and persistence. Handlers validate
//! request shapes and delegate here; everything below this layer is
//! transport-agnostic.

use std::sync::Arc;
use tracing::{debug, info};

use crate::analyzer::StringRecord;
use crate::error::{Error, Result};
use crate::filter::StructuredFilter;
use crate::nlp::{InterpretedQuery, NaturalLanguageParser};
use crate::store::{StoreError, StringStore};

const ALREADY_EXISTS: &str = "String already exists in the system";
const DOES_NOT_EXIST: &str = "String does not exist in the system";

/// Values inserted by the `seed` command
pub const SAMPLE_STRINGS: [&str; 5] = [
    "racecar",
    "hello world",
    "level",
    "test string analyzer",
    "a man a plan a canal panama",
];

pub struct StringService {
    store: Arc<dyn StringStore>,
    parser: NaturalLanguageParser,
}

impl StringService {
    pub fn new(store: Arc<dyn StringStore>) -> Self {
        Self::with_parser(store, NaturalLanguageParser::new())
    }

    pub fn with_parser(store: Arc<dyn StringStore>, parser: NaturalLanguageParser) -> Self {
        Self { store, parser }
    }

    pub fn store(&self) -> &Arc<dyn StringStore> {
        &self.store
    }

    /// Analyzes and stores `value`.
    ///
    /// # Errors
    /// * [`Error::Conflict`] if the same content is already stored
    pub async fn create(&self, value: &str) -> Result<StringRecord> {
        let record = StringRecord::new(value);

        if self.store.find_by_id(&record.id).await?.is_some() {
            return Err(Error::Conflict(ALREADY_EXISTS.to_string()));
        }

        // A concurrent insert of the same value loses on the unique index
        self.store.insert(&record).await.map_err(|e| match e {
            StoreError::DuplicateKey(_) => Error::Conflict(ALREADY_EXISTS.to_string()),
            other => Error::Store(other),
        })?;

        info!(
            id = %record.id,
            length = record.properties.length,
            is_palindrome = record.properties.is_palindrome,
            "String stored"
        );
        Ok(record)
    }

    /// Fetches the record with exactly this value
    pub async fn get(&self, value: &str) -> Result<StringRecord> {
        self.store
            .find_by_value(value)
            .await?
            .ok_or_else(|| Error::NotFound(DOES_NOT_EXIST.to_string()))
    }

    /// Deletes the record with exactly this value
    pub async fn delete(&self, value: &str) -> Result<()> {
        if !self.store.delete_by_value(value).await? {
            return Err(Error::NotFound(DOES_NOT_EXIST.to_string()));
        }
        info!(value_length = value.chars().count(), "String deleted");
        Ok(())
    }

    /// Returns every record matching `filter`
    pub async fn list(&self, filter: &StructuredFilter) -> Result<Vec<StringRecord>> {
        let records = self.store.find(filter).await?;
        debug!(filter = ?filter, count = records.len(), "Strings listed");
        Ok(records)
    }

    /// Interprets `query` and returns the matching records.
    ///
    /// Parsing happens before any store access, so an unparseable query never
    /// reaches the store.
    pub async fn filter_by_natural_language(
        &self,
        query: &str,
    ) -> Result<(Vec<StringRecord>, InterpretedQuery)> {
        let interpreted = self.parser.parse(query)?;
        let records = self.list(&interpreted.parsed_filters).await?;
        Ok((records, interpreted))
    }

    /// Stores each value that is not stored yet, returning how many were added
    pub async fn seed<'a, I>(&self, values: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut inserted = 0;
        for value in values {
            match self.create(value).await {
                Ok(_) => inserted += 1,
                Err(Error::Conflict(_)) => debug!(value = %value, "Seed value already present"),
                Err(e) => return Err(e),
            }
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStringStore;

    fn service() -> StringService {
        StringService::new(Arc::new(MemoryStringStore::new()))
    }

    #[tokio::test]
    async fn test_create_then_duplicate() {
        let service = service();
        let record = service.create("racecar").await.unwrap();
        assert!(record.properties.is_palindrome);
        assert_eq!(record.properties.length, 7);

        assert!(matches!(
            service.create("racecar").await,
            Err(Error::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let service = service();
        service.create("hello world").await.unwrap();

        assert_eq!(service.get("hello world").await.unwrap().value, "hello world");
        service.delete("hello world").await.unwrap();
        assert!(matches!(service.get("hello world").await, Err(Error::NotFound(_))));
        assert!(matches!(
            service.delete("hello world").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_natural_language_filter() {
        let service = service();
        service.seed(SAMPLE_STRINGS).await.unwrap();

        let (records, interpreted) = service
            .filter_by_natural_language("single word palindromes")
            .await
            .unwrap();
        let mut values: Vec<_> = records.iter().map(|r| r.value.as_str()).collect();
        values.sort();
        assert_eq!(values, ["level", "racecar"]);
        assert_eq!(interpreted.original, "single word palindromes");
    }

    #[tokio::test]
    async fn test_unparseable_query() {
        let service = service();
        assert!(matches!(
            service.filter_by_natural_language("xyz").await,
            Err(Error::UnparseableQuery(_))
        ));
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let service = service();
        assert_eq!(service.seed(SAMPLE_STRINGS).await.unwrap(), 5);
        assert_eq!(service.seed(SAMPLE_STRINGS).await.unwrap(), 0);
        assert_eq!(service.list(&StructuredFilter::new()).await.unwrap().len(), 5);
    }
}
