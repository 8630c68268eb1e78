//! An embedded full-text indexer: plain-text documents identified by
//! caller-assigned 32-bit ids are tokenized, folded into a three-store
//! inverted index (dictionary, doc postings, position postings), and
//! searched with boolean/phrase queries plus contextual excerpting.
//!
//! The store layout, codecs, and scoring formula are a fixed on-disk
//! contract (see each module's doc comment); everything else — the word
//! regex, the normalizer, the query parser — is swappable at construction.

pub mod codec;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod excerpt;
pub mod indexer;
pub mod lexer;
pub mod parser;
pub mod postings;
pub mod query;
pub mod store;
pub mod writer;

pub use config::{IndexerConfig, StopwordsSource};
pub use error::{Error, ErrorKind, Result};
pub use indexer::{Indexer, SearchResult};
