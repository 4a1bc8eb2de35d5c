//! # string-analyzer
//!
//! REST service that stores strings together with precomputed properties
//! (length, palindrome flag, distinct characters, word count, SHA-256 hash,
//! character frequencies) and filters them, either through explicit query
//! parameters or through a small natural-language grammar.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod http_server;
pub mod logging;
pub mod nlp;
pub mod service;
pub mod store;

pub use analyzer::{analyze, StringProperties, StringRecord};
pub use error::{Error, Result};
pub use filter::StructuredFilter;
pub use http_server::create_router;
pub use nlp::{InterpretedQuery, NaturalLanguageParser};
pub use service::StringService;
pub use store::{MemoryStringStore, StringStore};
