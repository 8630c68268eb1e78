//! Thin abstraction over the persistent keyed backend (§4.2). Each of the
//! three stores (W, D, P) is its own memory-mapped LMDB environment, opened
//! read-only or read-write for the lifetime of the owning handle.
//!
//! Grounded on this repo's inherited single-writer file lock
//! (`storage::file_lock`) for `ALREADY_OPEN_FOR_WRITE`, generalized from one
//! segment directory to three independent keyed stores.

use std::fs;
use std::path::{Path, PathBuf};

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use log::debug;

use crate::error::{Error, ErrorKind, Result};

/// Default LMDB map size per store. LMDB reserves this much address space
/// up front but only touches pages that are actually written, so it plays
/// the role of the "large in-process write cache" §4.2 asks for.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// One of the three stores named in §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Dictionary,
    Docs,
    Positions,
}

impl StoreKind {
    /// Suggested on-disk name from §6 ("three files named ixw, ixd, ixp").
    fn dirname(self) -> &'static str {
        match self {
            StoreKind::Dictionary => "ixw",
            StoreKind::Docs => "ixd",
            StoreKind::Positions => "ixp",
        }
    }
}

/// A single keyed store: one LMDB environment holding one unnamed database.
struct Keyspace {
    env: Env,
    db: Database<Bytes, Bytes>,
}

impl Keyspace {
    fn open(path: &Path, write_mode: bool, map_size: usize) -> Result<Self> {
        if write_mode {
            fs::create_dir_all(path)?;
        } else if !path.is_dir() {
            return Err(Error::new(
                ErrorKind::StoreMissing,
                format!("store directory does not exist: {}", path.display()),
            ));
        }

        // Safety: the single-writer lock in `Store::open` guarantees no other
        // process opens this environment for writing concurrently.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(1)
                .open(path)
                .map_err(|e| Error::new(ErrorKind::StoreOpenFailed, e.to_string()))?
        };

        let db = if write_mode {
            let mut wtxn = env.write_txn()?;
            let db = env.create_database(&mut wtxn, None)?;
            wtxn.commit()?;
            db
        } else {
            let rtxn = env.read_txn()?;
            let db = env
                .open_database(&rtxn, None)?
                .ok_or_else(|| Error::new(ErrorKind::StoreMissing, "store has no database"))?;
            db
        };

        Ok(Keyspace { env, db })
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let rtxn = self.env.read_txn()?;
        Ok(self.db.get(&rtxn, key)?.map(|v| v.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.db.put(&mut wtxn, key, value)?;
        wtxn.commit()?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.db.delete(&mut wtxn, key)?;
        wtxn.commit()?;
        Ok(())
    }

    fn iter_all(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let rtxn = self.env.read_txn()?;
        let mut out = Vec::new();
        for entry in self.db.iter(&rtxn)? {
            let (k, v) = entry?;
            out.push((k.to_vec(), v.to_vec()));
        }
        Ok(out)
    }
}

/// Cross-process single-writer guard: an exclusive `flock` on `<dir>/.lock`,
/// held for as long as a write-mode `Store` is alive.
struct WriteLock {
    file: fs::File,
}

impl WriteLock {
    fn acquire(dir: &Path) -> Result<Self> {
        let lock_path = dir.join(".lock");
        let file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
            if rc != 0 {
                return Err(Error::new(
                    ErrorKind::AlreadyOpenForWrite,
                    "another writer already holds the index lock",
                ));
            }
        }

        Ok(WriteLock { file })
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            unsafe {
                libc::flock(self.file.as_raw_fd(), libc::LOCK_UN);
            }
        }
    }
}

/// The KV backing: binds the three stores for the lifetime of the handle.
pub struct Store {
    dictionary: Keyspace,
    docs: Keyspace,
    positions: Keyspace,
    write_mode: bool,
    _lock: Option<WriteLock>,
}

impl Store {
    /// Open all three stores under `dir`. In write mode, missing stores are
    /// created and a second concurrent writer fails with
    /// `ALREADY_OPEN_FOR_WRITE`; in read-only mode, missing stores fail with
    /// `STORE_MISSING`.
    pub fn open(dir: &Path, write_mode: bool, map_size: usize) -> Result<Self> {
        let lock = if write_mode {
            fs::create_dir_all(dir)?;
            Some(WriteLock::acquire(dir)?)
        } else {
            None
        };

        let path_for = |kind: StoreKind| -> PathBuf { dir.join(kind.dirname()) };

        let dictionary = Keyspace::open(&path_for(StoreKind::Dictionary), write_mode, map_size)?;
        let docs = Keyspace::open(&path_for(StoreKind::Docs), write_mode, map_size)?;
        let positions = Keyspace::open(&path_for(StoreKind::Positions), write_mode, map_size)?;

        debug!("opened index store at {} (write_mode={write_mode})", dir.display());

        Ok(Store { dictionary, docs, positions, write_mode, _lock: lock })
    }

    pub fn open_default(dir: &Path, write_mode: bool) -> Result<Self> {
        Self::open(dir, write_mode, DEFAULT_MAP_SIZE)
    }

    pub fn is_write_mode(&self) -> bool {
        self.write_mode
    }

    fn keyspace(&self, store: StoreKind) -> &Keyspace {
        match store {
            StoreKind::Dictionary => &self.dictionary,
            StoreKind::Docs => &self.docs,
            StoreKind::Positions => &self.positions,
        }
    }

    pub fn get(&self, store: StoreKind, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.keyspace(store).get(key)
    }

    pub fn put(&self, store: StoreKind, key: &[u8], value: &[u8]) -> Result<()> {
        self.keyspace(store).put(key, value)
    }

    pub fn delete(&self, store: StoreKind, key: &[u8]) -> Result<()> {
        self.keyspace(store).delete(key)
    }

    /// Used only by the debug-dump operation (§6).
    pub fn iterate(&self, store: StoreKind) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.keyspace(store).iter_all()
    }

    /// LMDB commits are already durable per-call; this exists so callers have
    /// an explicit point to force a sync of the environment.
    pub fn flush(&self) -> Result<()> {
        for ks in [&self.dictionary, &self.docs, &self.positions] {
            ks.env.force_sync()?;
        }
        Ok(())
    }
}
