//! Natural-language query parsing

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::{default_rules, FilterRule};
use crate::error::{Error, Result};
use crate::filter::StructuredFilter;

/// A query together with the filter it was interpreted as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretedQuery {
    /// Query text exactly as received
    pub original: String,
    /// Filter derived from the query
    pub parsed_filters: StructuredFilter,
}

/// Translates free text into a [`StructuredFilter`].
///
/// Rules are evaluated in order against the lowercased text. Every rule runs;
/// when two rules set the same field the later one wins.
pub struct NaturalLanguageParser {
    rules: Vec<Box<dyn FilterRule>>,
}

impl NaturalLanguageParser {
    /// Creates a parser with the built-in rule set
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    /// Creates a parser with a custom, ordered rule set
    pub fn with_rules(rules: Vec<Box<dyn FilterRule>>) -> Self {
        Self { rules }
    }

    /// Parses `query`, failing with [`Error::UnparseableQuery`] when no rule fires
    pub fn parse(&self, query: &str) -> Result<InterpretedQuery> {
        let text = query.to_lowercase();
        let mut filter = StructuredFilter::new();
        let mut fired = Vec::new();

        for rule in &self.rules {
            if let Some(update) = rule.evaluate(&text) {
                update.apply(&mut filter);
                fired.push(rule.name());
            }
        }

        debug!(query = %query, rules = ?fired, "Natural language query evaluated");

        if filter.is_empty() {
            return Err(Error::UnparseableQuery(query.to_string()));
        }

        Ok(InterpretedQuery {
            original: query.to_string(),
            parsed_filters: filter,
        })
    }
}

impl Default for NaturalLanguageParser {
    fn default() -> Self {
        Self::new()
    }
}
