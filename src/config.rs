//! Constructor configuration for an `Indexer` (§6, §10.3).

use std::path::PathBuf;

use regex::Regex;

use crate::lexer::{default_normalize, DEFAULT_WORD_REGEX};

/// Where `Indexer::open` should source its stopword list from. The two
/// inputs are mutually exclusive, so this is an enum rather than a pair of
/// `Option` fields.
#[derive(Debug, Clone)]
pub enum StopwordsSource {
    Words(Vec<String>),
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Directory holding the three store subdirectories. Defaults to the
    /// current directory.
    pub dir: PathBuf,
    /// If false, stores are opened read-only and `stopwords` is rejected.
    pub write_mode: bool,
    /// Token-matching regex; must not contain capturing groups (§4.3).
    pub wregex: Regex,
    /// Normalizer applied to every matched token; an empty return drops it.
    pub wfilter: Box<dyn Fn(&str) -> String + Send + Sync>,
    pub stopwords: Option<StopwordsSource>,
    /// If set, the Translator drops field-qualified subqueries whose field
    /// does not match this name.
    pub fieldname: Option<String>,
    pub ctxt_num_chars: usize,
    pub max_excerpts: usize,
    pub pre_match: String,
    pub post_match: String,
    /// LMDB map size per store, in bytes.
    pub map_size: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        IndexerConfig {
            dir: PathBuf::from("."),
            write_mode: false,
            wregex: Regex::new(DEFAULT_WORD_REGEX).expect("default word regex is valid"),
            wfilter: Box::new(|t: &str| default_normalize(t)),
            stopwords: None,
            fieldname: None,
            ctxt_num_chars: 35,
            max_excerpts: 5,
            pre_match: "<b>".to_string(),
            post_match: "</b>".to_string(),
            map_size: crate::store::DEFAULT_MAP_SIZE,
        }
    }
}
