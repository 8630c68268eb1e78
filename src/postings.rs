//! Doc postings (store D) and position postings (store P), §4.5.

use crate::codec::{DocOcc, DocOccList, DocWordKey, Int32, PositionList};
use crate::error::{Error, ErrorKind, Result};
use crate::store::{Store, StoreKind};

const NDOCS_KEY: &[u8] = b"NDOCS";

/// Store D is keyed by wordId; prefix with a byte that can never appear in
/// the reserved ASCII `NDOCS` key so the two key spaces never collide.
fn word_key(word_id: u32) -> [u8; 5] {
    let mut key = [0u8; 5];
    key[1..].copy_from_slice(&word_id.to_be_bytes());
    key
}

pub struct Postings<'s> {
    store: &'s Store,
}

impl<'s> Postings<'s> {
    pub fn new(store: &'s Store) -> Self {
        Postings { store }
    }

    pub fn doc_count(&self) -> Result<u32> {
        match self.store.get(StoreKind::Docs, NDOCS_KEY)? {
            None => Ok(0),
            Some(bytes) => Ok(Int32::decode(&bytes)?.max(0) as u32),
        }
    }

    fn set_doc_count(&self, n: u32) -> Result<()> {
        self.store.put(StoreKind::Docs, NDOCS_KEY, &Int32::encode(n as i32))
    }

    pub fn increment_doc_count(&self) -> Result<()> {
        self.set_doc_count(self.doc_count()?.saturating_add(1))
    }

    pub fn decrement_doc_count(&self) -> Result<()> {
        self.set_doc_count(self.doc_count()?.saturating_sub(1))
    }

    /// `D[wordId]` decoded into its `(docId, occ)` records.
    pub fn doc_list(&self, word_id: u32) -> Result<Vec<DocOcc>> {
        match self.store.get(StoreKind::Docs, &word_key(word_id))? {
            None => Ok(Vec::new()),
            Some(bytes) => DocOccList::decode(&bytes),
        }
    }

    fn put_doc_list(&self, word_id: u32, records: &[DocOcc]) -> Result<()> {
        self.store.put(StoreKind::Docs, &word_key(word_id), &DocOccList::encode(records))
    }

    /// `P[(docId, wordId)]` decoded into ascending positions.
    pub fn positions(&self, doc_id: u32, word_id: u32) -> Result<Vec<u32>> {
        let key = DocWordKey::encode(doc_id, word_id);
        match self.store.get(StoreKind::Positions, &key)? {
            None => Ok(Vec::new()),
            Some(bytes) => PositionList::decode(&bytes),
        }
    }

    fn has_positions(&self, doc_id: u32, word_id: u32) -> Result<bool> {
        let key = DocWordKey::encode(doc_id, word_id);
        Ok(self.store.get(StoreKind::Positions, &key)?.is_some())
    }

    /// Appends `(docId, clamp255(|positions|))` to `D[wordId]` and writes
    /// `P[(docId,wordId)]`. Fails `DUP_DOC` if a posting for this
    /// `(docId,wordId)` pair already exists, per the §9 decision to reject
    /// rather than silently merge duplicate adds.
    pub fn append(&self, doc_id: u32, word_id: u32, positions: &[u32]) -> Result<()> {
        if self.has_positions(doc_id, word_id)? {
            return Err(Error::new(
                ErrorKind::DupDoc,
                format!("docId {doc_id} already has a posting for wordId {word_id}"),
            ));
        }

        let mut records = self.doc_list(word_id)?;
        records.push(DocOcc::new(doc_id, positions.len()));
        self.put_doc_list(word_id, &records)?;

        let key = DocWordKey::encode(doc_id, word_id);
        self.store.put(StoreKind::Positions, &key, &PositionList::encode(positions))
    }

    /// Removes the `(docId, _)` record from `D[wordId]` and deletes
    /// `P[(docId,wordId)]`. A no-op on `D`/`P` if the docId was never
    /// present under this wordId (§8 scenario 6).
    pub fn remove(&self, doc_id: u32, word_id: u32) -> Result<()> {
        let mut records = self.doc_list(word_id)?;
        records.retain(|r| r.doc_id != doc_id);
        self.put_doc_list(word_id, &records)?;

        let key = DocWordKey::encode(doc_id, word_id);
        self.store.delete(StoreKind::Positions, &key)
    }
}
