//! Structured filters and their translation into store queries
//!
//! A [`StructuredFilter`] is produced either from explicit query parameters or
//! by the natural-language parser. The same translation is used for both.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::analyzer::StringRecord;

const PALINDROME_FIELD: &str = "properties.is_palindrome";
const LENGTH_FIELD: &str = "properties.length";
const WORD_COUNT_FIELD: &str = "properties.word_count";
const FREQUENCY_MAP_FIELD: &str = "properties.character_frequency_map";

/// Optional-field filter over stored string properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_palindrome: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_character: Option<char>,
}

impl StructuredFilter {
    /// Creates an empty filter, which matches every record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_palindrome(mut self, is_palindrome: bool) -> Self {
        self.is_palindrome = Some(is_palindrome);
        self
    }

    pub fn with_min_length(mut self, min_length: i64) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: i64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_word_count(mut self, word_count: i64) -> Self {
        self.word_count = Some(word_count);
        self
    }

    pub fn with_contains_character(mut self, c: char) -> Self {
        self.contains_character = Some(c);
        self
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.is_palindrome.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.word_count.is_none()
            && self.contains_character.is_none()
    }

    /// Builds the MongoDB query document for this filter.
    ///
    /// Length bounds are merged into a single range predicate. No check is made
    /// for `min_length > max_length`; such a range simply matches nothing.
    pub fn to_query(&self) -> JsonValue {
        let mut query = Map::new();

        if let Some(is_palindrome) = self.is_palindrome {
            query.insert(PALINDROME_FIELD.to_string(), json!(is_palindrome));
        }

        let mut range = Map::new();
        if let Some(min) = self.min_length {
            range.insert("$gte".to_string(), json!(min));
        }
        if let Some(max) = self.max_length {
            range.insert("$lte".to_string(), json!(max));
        }
        if !range.is_empty() {
            query.insert(LENGTH_FIELD.to_string(), JsonValue::Object(range));
        }

        if let Some(word_count) = self.word_count {
            query.insert(WORD_COUNT_FIELD.to_string(), json!(word_count));
        }

        if let Some(c) = self.contains_character {
            if c == '.' || c == '$' {
                // Not addressable through a dotted path
                query.insert(
                    "$expr".to_string(),
                    json!({
                        "$gt": [
                            {
                                "$getField": {
                                    "field": { "$literal": c.to_string() },
                                    "input": format!("${}", FREQUENCY_MAP_FIELD),
                                }
                            },
                            0
                        ]
                    }),
                );
            } else {
                query.insert(
                    format!("{}.{}", FREQUENCY_MAP_FIELD, c),
                    json!({ "$gt": 0 }),
                );
            }
        }

        JsonValue::Object(query)
    }

    /// Evaluates this filter against a record in process.
    ///
    /// Agrees with [`StructuredFilter::to_query`] for every filter.
    pub fn matches(&self, record: &StringRecord) -> bool {
        let props = &record.properties;
        let length = props.length as i64;

        if self.is_palindrome.is_some_and(|p| p != props.is_palindrome) {
            return false;
        }
        if self.min_length.is_some_and(|min| length < min) {
            return false;
        }
        if self.max_length.is_some_and(|max| length > max) {
            return false;
        }
        if self
            .word_count
            .is_some_and(|wc| wc != props.word_count as i64)
        {
            return false;
        }
        if let Some(c) = self.contains_character {
            let present = props
                .character_frequency_map
                .get(&c.to_string())
                .is_some_and(|n| *n > 0);
            if !present {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = StructuredFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.to_query(), json!({}));
        assert!(filter.matches(&StringRecord::new("")));
        assert!(filter.matches(&StringRecord::new("anything at all")));
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let record = StringRecord::new("racecar");
        assert!(StructuredFilter::new().with_min_length(7).matches(&record));
        assert!(StructuredFilter::new().with_max_length(7).matches(&record));
        assert!(!StructuredFilter::new().with_min_length(8).matches(&record));
        assert!(!StructuredFilter::new().with_max_length(6).matches(&record));
    }

    #[test]
    fn test_length_bounds_merge_into_one_range() {
        let filter = StructuredFilter::new().with_min_length(3).with_max_length(9);
        assert_eq!(
            filter.to_query(),
            json!({ "properties.length": { "$gte": 3, "$lte": 9 } })
        );
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let filter = StructuredFilter::new().with_min_length(10).with_max_length(2);
        assert_eq!(
            filter.to_query(),
            json!({ "properties.length": { "$gte": 10, "$lte": 2 } })
        );
        for value in ["", "ab", "racecar", "a much longer sentence"] {
            assert!(!filter.matches(&StringRecord::new(value)));
        }
    }

    #[test]
    fn test_full_query_document() {
        let filter = StructuredFilter::new()
            .with_palindrome(true)
            .with_word_count(1)
            .with_contains_character('z');
        assert_eq!(
            filter.to_query(),
            json!({
                "properties.is_palindrome": true,
                "properties.word_count": 1,
                "properties.character_frequency_map.z": { "$gt": 0 },
            })
        );
    }

    #[test]
    fn test_contains_character_is_case_sensitive() {
        let record = StringRecord::new("Apple");
        assert!(StructuredFilter::new()
            .with_contains_character('A')
            .matches(&record));
        assert!(!StructuredFilter::new()
            .with_contains_character('a')
            .matches(&record));
    }

    #[test]
    fn test_dot_character_uses_expression_form() {
        let query = StructuredFilter::new().with_contains_character('.').to_query();
        let expr = query.get("$expr").expect("expression predicate");
        assert_eq!(
            expr["$gt"][0]["$getField"]["input"],
            json!("$properties.character_frequency_map")
        );
        assert_eq!(expr["$gt"][0]["$getField"]["field"]["$literal"], json!("."));

        let filter = StructuredFilter::new().with_contains_character('.');
        assert!(filter.matches(&StringRecord::new("end.")));
        assert!(!filter.matches(&StringRecord::new("end")));
    }

    #[test]
    fn test_palindrome_and_word_count_exact_match() {
        let filter = StructuredFilter::new().with_palindrome(true).with_word_count(1);
        assert!(filter.matches(&StringRecord::new("level")));
        assert!(!filter.matches(&StringRecord::new("hello")));
        assert!(!filter.matches(&StringRecord::new("a b a")));
    }

    #[test]
    fn test_serializes_only_present_fields() {
        let filter = StructuredFilter::new().with_min_length(6).with_contains_character('z');
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({ "min_length": 6, "contains_character": "z" })
        );
    }
}
