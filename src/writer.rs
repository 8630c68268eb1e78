//! `add`/`remove` orchestration over the lexer, dictionary, and postings
//! (§4.6).

use std::collections::HashMap;

use log::debug;

use crate::dictionary::Dictionary;
use crate::error::{Error, ErrorKind, Result};
use crate::lexer::Lexer;
use crate::postings::Postings;
use crate::store::Store;

pub struct Writer<'s> {
    store: &'s Store,
    lexer: &'s Lexer,
}

impl<'s> Writer<'s> {
    pub fn new(store: &'s Store, lexer: &'s Lexer) -> Self {
        Writer { store, lexer }
    }

    /// Builds the in-memory `wordId -> positions` multimap for `buf`,
    /// resolving terms through the dictionary and dropping stopwords. The
    /// resolution mode (assigning new ids, or read-only lookup for
    /// `remove`) is selected by `assign`.
    fn term_positions(&self, buf: &str, assign: bool) -> Result<HashMap<u32, Vec<u32>>> {
        let dictionary = Dictionary::new(self.store);
        let mut map: HashMap<u32, Vec<u32>> = HashMap::new();

        for (term, ordinal) in self.lexer.tokens(buf) {
            let word_id = if assign {
                dictionary.word_id_of_write(&term)?
            } else {
                match dictionary.word_id_of_read(&term)? {
                    Some(crate::dictionary::WordId::Known(id)) => id as i32,
                    Some(crate::dictionary::WordId::Stopword) => -1,
                    None => 0,
                }
            };

            if word_id > 0 {
                map.entry(word_id as u32).or_default().push(ordinal);
            }
            // word_id == -1 (stopword) or 0 (unknown, read mode) is skipped.
        }

        Ok(map)
    }

    fn check_doc_id(doc_id: u64) -> Result<u32> {
        u32::try_from(doc_id)
            .map_err(|_| Error::new(ErrorKind::DocIdTooLarge, format!("docId {doc_id} exceeds u32")))
    }

    /// Indexes `buf` under `docId`. Assigns fresh wordIds for unseen terms,
    /// appends to D/P, and increments `NDOCS`.
    pub fn add(&self, doc_id: u64, buf: &str) -> Result<()> {
        let doc_id = Self::check_doc_id(doc_id)?;
        let postings = Postings::new(self.store);
        let terms = self.term_positions(buf, true)?;

        for (word_id, positions) in &terms {
            postings.append(doc_id, *word_id, positions)?;
        }
        postings.increment_doc_count()?;

        debug!("indexed docId {doc_id} ({} distinct terms)", terms.len());
        Ok(())
    }

    /// Removes `buf`'s postings for `docId`. The caller must supply the same
    /// buffer that was originally indexed (§4.5).
    pub fn remove(&self, doc_id: u64, buf: &str) -> Result<()> {
        let doc_id = Self::check_doc_id(doc_id)?;
        let postings = Postings::new(self.store);
        let terms = self.term_positions(buf, false)?;

        for word_id in terms.keys() {
            postings.remove(doc_id, *word_id)?;
        }
        postings.decrement_doc_count()?;

        debug!("removed docId {doc_id} ({} distinct terms)", terms.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Lexer, DEFAULT_WORD_REGEX};
    use crate::postings::Postings;
    use crate::store::Store;
    use regex::Regex;
    use tempfile::tempdir;

    fn lexer() -> Lexer {
        Lexer::with_default_normalizer(Regex::new(DEFAULT_WORD_REGEX).unwrap()).unwrap()
    }

    #[test]
    fn add_then_remove_restores_ndocs_and_clears_positions() {
        let dir = tempdir().unwrap();
        let store = Store::open_default(dir.path(), true).unwrap();
        let lx = lexer();
        let writer = Writer::new(&store, &lx);

        writer.add(1, "the quick brown fox").unwrap();
        assert_eq!(Postings::new(&store).doc_count().unwrap(), 1);

        writer.remove(1, "the quick brown fox").unwrap();
        assert_eq!(Postings::new(&store).doc_count().unwrap(), 0);

        let dict = Dictionary::new(&store);
        let fox_id = match dict.word_id_of_read("fox").unwrap().unwrap() {
            crate::dictionary::WordId::Known(id) => id,
            _ => panic!("fox should be a known word"),
        };
        assert!(Postings::new(&store).doc_list(fox_id).unwrap().is_empty());
        assert!(Postings::new(&store).positions(1, fox_id).unwrap().is_empty());
    }

    #[test]
    fn doc_id_too_large_is_rejected() {
        let dir = tempdir().unwrap();
        let store = Store::open_default(dir.path(), true).unwrap();
        let lx = lexer();
        let writer = Writer::new(&store, &lx);

        let err = writer.add(u64::from(u32::MAX) + 1, "text").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DocIdTooLarge));
    }

    #[test]
    fn positions_stay_ordinal_based_when_stopwords_are_dropped() {
        let dir = tempdir().unwrap();
        let store = Store::open_default(dir.path(), true).unwrap();
        let lx = lexer();
        Dictionary::new(&store).mark_stopword("the").unwrap();

        let writer = Writer::new(&store, &lx);
        writer.add(1, "the quick brown fox").unwrap();

        let dict = Dictionary::new(&store);
        let fox_id = match dict.word_id_of_read("fox").unwrap().unwrap() {
            crate::dictionary::WordId::Known(id) => id,
            _ => panic!("fox should be known"),
        };
        // "the"=1 (dropped), "quick"=2, "brown"=3, "fox"=4: fox keeps ordinal 4.
        assert_eq!(Postings::new(&store).positions(1, fox_id).unwrap(), vec![4]);
    }

    #[test]
    fn duplicate_add_of_same_doc_fails() {
        let dir = tempdir().unwrap();
        let store = Store::open_default(dir.path(), true).unwrap();
        let lx = lexer();
        let writer = Writer::new(&store, &lx);

        writer.add(1, "quick fox").unwrap();
        let err = writer.add(1, "quick fox").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DupDoc));
    }
}
