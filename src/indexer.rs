//! The public facade gluing the Store, Lexer, Dictionary, Postings,
//! Translator, Evaluator and Excerpter together (§6).

use std::collections::HashMap;
use std::fs;

use regex::Regex;

use crate::config::{IndexerConfig, StopwordsSource};
use crate::dictionary::Dictionary;
use crate::error::{Error, ErrorKind, Result};
use crate::excerpt::{self, ExcerptConfig};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::postings::Postings;
use crate::query::evaluator::Evaluator;
use crate::query::translator::Translator;
use crate::store::Store;
use crate::writer::Writer;

/// The result of a `search()` call: per-document scores, the set of surface
/// terms that were dropped (unknown or stopword), and a compiled regex
/// suitable for `excerpts()`.
pub struct SearchResult {
    pub scores: HashMap<u32, i64>,
    pub killed_words: Vec<String>,
    pub regex: Regex,
}

pub struct Indexer {
    store: Store,
    lexer: Lexer,
    parser: Parser,
    fieldname: Option<String>,
    excerpt_config: ExcerptConfig,
}

impl Indexer {
    pub fn open(config: IndexerConfig) -> Result<Self> {
        let store = Store::open(&config.dir, config.write_mode, config.map_size)?;
        let lexer = Lexer::new(config.wregex, config.wfilter)?;

        if let Some(source) = &config.stopwords {
            if !config.write_mode {
                return Err(Error::new(
                    ErrorKind::StopwordsInReadMode,
                    "stopwords can only be configured in write mode",
                ));
            }
            apply_stopwords(&store, &lexer, source)?;
        }

        Ok(Indexer {
            store,
            lexer,
            parser: Parser::new(),
            fieldname: config.fieldname,
            excerpt_config: ExcerptConfig {
                ctxt_num_chars: config.ctxt_num_chars,
                max_excerpts: config.max_excerpts,
                pre_match: config.pre_match,
                post_match: config.post_match,
            },
        })
    }

    pub fn add(&self, doc_id: u64, buf: &str) -> Result<()> {
        Writer::new(&self.store, &self.lexer).add(doc_id, buf)?;
        self.store.flush()
    }

    pub fn remove(&self, doc_id: u64, buf: &str) -> Result<()> {
        Writer::new(&self.store, &self.lexer).remove(doc_id, buf)?;
        self.store.flush()
    }

    pub fn search(&self, query: &str, implicit_plus: bool) -> Result<SearchResult> {
        let tree = self.parser.parse(query, implicit_plus)?;
        let translator =
            Translator::new(Dictionary::new(&self.store), &self.lexer, self.fieldname.clone());
        let translation = translator.translate(&tree)?;

        let evaluator = Evaluator::new(Postings::new(&self.store));
        let scores = evaluator.evaluate(&translation.tree)?.unwrap_or_default();

        let regex = build_excerpt_regex(&translation.words_regexes)?;
        let mut killed_words: Vec<String> = translation.killed_words.into_iter().collect();
        killed_words.sort();

        Ok(SearchResult { scores, killed_words, regex })
    }

    pub fn excerpts(&self, buf: &str, regex: &Regex) -> Vec<String> {
        excerpt::excerpts(buf, regex, &self.excerpt_config)
    }

    /// Ordered `(term, wordId)` listing for debugging (§6).
    pub fn dump(&self) -> Result<Vec<(String, u32)>> {
        Dictionary::new(&self.store).dump()
    }
}

fn apply_stopwords(store: &Store, lexer: &Lexer, source: &StopwordsSource) -> Result<()> {
    let dictionary = Dictionary::new(store);
    let terms: Vec<String> = match source {
        StopwordsSource::Words(words) => words.clone(),
        StopwordsSource::File(path) => {
            let contents = fs::read_to_string(path).map_err(|e| {
                Error::new(ErrorKind::StopwordFileOpenFailed, format!("{}: {e}", path.display()))
            })?;
            lexer.tokenize_str(&contents)
        }
    };

    for term in terms {
        dictionary.mark_stopword(&lexer.normalize(&term))?;
    }
    Ok(())
}

/// Combines the translated subqueries' regex fragments into one alternated,
/// case-insensitive, word-boundary-anchored excerpt regex. An empty fragment
/// list (no surviving terms) yields a regex that matches nothing: `\b\B`
/// requires a position to be simultaneously a word boundary and not one.
fn build_excerpt_regex(fragments: &[String]) -> Result<Regex> {
    let non_empty: Vec<&String> = fragments.iter().filter(|f| !f.is_empty()).collect();
    let pattern = if non_empty.is_empty() {
        r"\b\B".to_string()
    } else {
        let alternation = non_empty.iter().map(|f| f.as_str()).collect::<Vec<_>>().join("|");
        format!(r"(?i)\b(?:{alternation})\b")
    };
    Ok(Regex::new(&pattern)?)
}
