//! Natural language filter queries
//!
//! A fixed, small grammar of phrasings ("palindromic", "single word",
//! "longer than N", "containing the letter x", ...) mapped onto a
//! [`StructuredFilter`](crate::filter::StructuredFilter).

pub mod parser;
pub mod rules;

pub use parser::{InterpretedQuery, NaturalLanguageParser};
pub use rules::{FilterRule, FilterUpdate};
