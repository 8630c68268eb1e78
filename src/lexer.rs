//! Term extraction (§4.3): a word regex plus a normalizer callback, producing
//! `(normalized_term, ordinal)` pairs where `ordinal` counts every regex
//! match regardless of what the normalizer does with it.

use regex::Regex;

use crate::error::{Error, ErrorKind, Result};

/// `term -> normalized_term`; an empty return drops the term from indexing
/// without affecting the ordinal counter of terms around it.
pub type Normalizer = Box<dyn Fn(&str) -> String + Send + Sync>;

/// A reasonable word boundary for un-configured callers: runs of letters and
/// digits. Has no capturing groups.
pub const DEFAULT_WORD_REGEX: &str = r"[\p{L}\p{N}]+";

pub struct Lexer {
    word_regex: Regex,
    normalizer: Normalizer,
}

impl Lexer {
    /// `word_regex` must not contain capturing groups, matching §6's
    /// constructor contract.
    pub fn new(word_regex: Regex, normalizer: Normalizer) -> Result<Self> {
        if word_regex.captures_len() > 1 {
            return Err(Error::new(
                ErrorKind::BadRegex,
                "word regex must not contain capturing groups",
            ));
        }
        Ok(Lexer { word_regex, normalizer })
    }

    pub fn with_default_normalizer(word_regex: Regex) -> Result<Self> {
        Self::new(word_regex, Box::new(|t: &str| default_normalize(t)))
    }

    pub fn word_regex(&self) -> &Regex {
        &self.word_regex
    }

    /// Lazily yields surviving `(normalized_term, 1-based ordinal)` pairs.
    pub fn tokens<'a>(&'a self, buf: &'a str) -> impl Iterator<Item = (String, u32)> + 'a {
        self.word_regex.find_iter(buf).enumerate().filter_map(move |(i, m)| {
            let ordinal = (i + 1) as u32;
            let normalized = (self.normalizer)(m.as_str());
            if normalized.is_empty() { None } else { Some((normalized, ordinal)) }
        })
    }

    /// Re-tokenize a standalone surface string (used by the Translator, §4.7,
    /// to re-split query-side values with the indexer's own word regex).
    pub fn tokenize_str(&self, text: &str) -> Vec<String> {
        self.word_regex.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }

    pub fn normalize(&self, term: &str) -> String {
        (self.normalizer)(term)
    }
}

/// Lowercase, then fold Latin-1 Supplement accented letters to their ASCII
/// base; an all-punctuation term normalizes to the empty string (dropped).
pub fn default_normalize(term: &str) -> String {
    term.chars().map(fold_latin1_accent).collect::<String>().to_lowercase()
}

fn fold_latin1_accent(c: char) -> char {
    match c {
        'À'..='Å' | 'à'..='å' => 'a',
        'Ç' | 'ç' => 'c',
        'È'..='Ë' | 'è'..='ë' => 'e',
        'Ì'..='Ï' | 'ì'..='ï' => 'i',
        'Ð' | 'ð' => 'd',
        'Ñ' | 'ñ' => 'n',
        'Ò'..='Ö' | 'ò'..='ö' | 'Ø' | 'ø' => 'o',
        'Ù'..='Ü' | 'ù'..='ü' => 'u',
        'Ý' | 'ý' | 'ÿ' => 'y',
        'Þ' | 'þ' => 't',
        'ß' => 's',
        other => other,
    }
}
