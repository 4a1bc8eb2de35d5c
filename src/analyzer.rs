//! String analysis
//!
//! Computes the deterministic properties stored alongside every string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};

/// Precomputed properties of a stored string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringProperties {
    /// Number of characters (Unicode scalar values)
    pub length: usize,
    /// Case-insensitive equality with the reversed string
    pub is_palindrome: bool,
    /// Number of distinct characters, case-sensitive
    pub unique_characters: usize,
    /// Number of whitespace-delimited tokens
    pub word_count: usize,
    /// Hex-encoded SHA-256 of the raw bytes
    pub sha256_hash: String,
    /// Occurrences of every character, whitespace and punctuation included
    pub character_frequency_map: BTreeMap<String, usize>,
}

/// A string as persisted in the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringRecord {
    /// Content hash, also the record identity
    pub id: String,
    pub value: String,
    pub properties: StringProperties,
    pub created_at: DateTime<Utc>,
}

impl StringRecord {
    /// Analyzes `value` and stamps the record with the current time
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let properties = analyze(&value);
        Self {
            id: properties.sha256_hash.clone(),
            value,
            properties,
            created_at: Utc::now(),
        }
    }
}

/// Hex-encoded SHA-256 digest of the string's bytes
pub fn content_hash(value: &str) -> String {
    format!("{:x}", Sha256::digest(value.as_bytes()))
}

/// Computes every property of `value`. Total over all inputs.
pub fn analyze(value: &str) -> StringProperties {
    let lower: Vec<char> = value.to_lowercase().chars().collect();
    let is_palindrome = lower.iter().eq(lower.iter().rev());

    let mut character_frequency_map = BTreeMap::new();
    for c in value.chars() {
        *character_frequency_map.entry(c.to_string()).or_insert(0) += 1;
    }

    StringProperties {
        length: value.chars().count(),
        is_palindrome,
        unique_characters: value.chars().collect::<HashSet<_>>().len(),
        word_count: value.split_whitespace().count(),
        sha256_hash: content_hash(value),
        character_frequency_map,
    }
}
