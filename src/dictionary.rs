//! The word↔wordId bijection, the stopword marker, and the word counter
//! (§4.4), all backed by store W.

use log::debug;

use crate::codec::Int32;
use crate::error::{Error, ErrorKind, Result};
use crate::store::{Store, StoreKind};

/// Reserved word-counter key, prefixed with `0xFF` so no term can ever
/// collide with it: `0xFF` cannot appear anywhere in a valid UTF-8 byte
/// sequence, and every real key in this store is `term.as_bytes()` of a
/// Rust `String` (mirrors the prefix-byte trick `postings::word_key` uses
/// to keep `NDOCS` apart from wordId keys in store D).
const NWORDS_KEY: &[u8] = &[0xFF, b'_', b'N', b'W', b'O', b'R', b'D', b'S'];
const STOPWORD_MARKER: i32 = -1;

/// What a dictionary lookup resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordId {
    Known(u32),
    Stopword,
}

pub struct Dictionary<'s> {
    store: &'s Store,
}

impl<'s> Dictionary<'s> {
    pub fn new(store: &'s Store) -> Self {
        Dictionary { store }
    }

    /// Read-only lookup: never assigns a new id.
    pub fn word_id_of_read(&self, term: &str) -> Result<Option<WordId>> {
        match self.store.get(StoreKind::Dictionary, term.as_bytes())? {
            None => Ok(None),
            Some(bytes) => Ok(Some(Self::decode_entry(&bytes)?)),
        }
    }

    /// Write-mode lookup: assigns `_NWORDS + 1` and persists it if `term` is
    /// completely unseen. Returns `-1` without modifying anything if `term`
    /// is already marked a stopword — a `-1` entry is never overwritten.
    pub fn word_id_of_write(&self, term: &str) -> Result<i32> {
        if let Some(bytes) = self.store.get(StoreKind::Dictionary, term.as_bytes())? {
            return match Self::decode_entry(&bytes)? {
                WordId::Known(id) => Ok(id as i32),
                WordId::Stopword => Ok(STOPWORD_MARKER),
            };
        }

        let next_id = self.next_word_id()? + 1;
        self.store
            .put(StoreKind::Dictionary, term.as_bytes(), &Int32::encode(next_id as i32))?;
        self.store.put(StoreKind::Dictionary, NWORDS_KEY, &Int32::encode(next_id as i32))?;
        debug!("assigned wordId {next_id} to '{term}'");
        Ok(next_id as i32)
    }

    /// Marks `term` as a stopword. Only valid before any positive id has
    /// been assigned to it (§4.4 tie-break: expected during initialization).
    pub fn mark_stopword(&self, term: &str) -> Result<()> {
        if let Some(bytes) = self.store.get(StoreKind::Dictionary, term.as_bytes())? {
            if let WordId::Known(_) = Self::decode_entry(&bytes)? {
                return Err(Error::new(
                    ErrorKind::StopwordAfterWrite,
                    format!("'{term}' already has an assigned wordId"),
                ));
            }
            // Already a stopword: idempotent no-op.
            return Ok(());
        }

        self.store
            .put(StoreKind::Dictionary, term.as_bytes(), &Int32::encode(STOPWORD_MARKER))?;
        Ok(())
    }

    pub fn next_word_id(&self) -> Result<u32> {
        match self.store.get(StoreKind::Dictionary, NWORDS_KEY)? {
            None => Ok(0),
            Some(bytes) => Ok(Int32::decode(&bytes)?.max(0) as u32),
        }
    }

    fn decode_entry(bytes: &[u8]) -> Result<WordId> {
        let value = Int32::decode(bytes)?;
        if value == STOPWORD_MARKER {
            Ok(WordId::Stopword)
        } else if value > 0 {
            Ok(WordId::Known(value as u32))
        } else {
            Err(Error::new(ErrorKind::CorruptValue, format!("invalid dictionary entry {value}")))
        }
    }

    /// Ordered `(term, wordId)` listing used by the debug-dump operation
    /// (§6). Skips the reserved `_NWORDS` key and stopword entries.
    pub fn dump(&self) -> Result<Vec<(String, u32)>> {
        let mut entries = Vec::new();
        for (key, value) in self.store.iterate(StoreKind::Dictionary)? {
            if key == NWORDS_KEY {
                continue;
            }
            if let WordId::Known(id) = Self::decode_entry(&value)? {
                let term = String::from_utf8(key)
                    .map_err(|_| Error::new(ErrorKind::CorruptValue, "non-utf8 dictionary key"))?;
                entries.push((term, id));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
