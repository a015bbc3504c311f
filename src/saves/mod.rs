//! Saving and loading the run.
//!
//! The serialization itself is serde + bincode; a backend only decides where the
//! bytes live. [`fs::Directory`] keeps the slot on disk; [`Memory`] keeps it
//! in-process, for tests and for platforms without a writable filesystem.
//!
//! Backends are storage, nothing more. The rules about finished runs -- never
//! written, never restored -- live in [`Session`][crate::session::Session], so
//! every backend inherits them.

pub mod fs;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::state::Ledger;

/// High-level data about the save slot, for offering a resume without
/// deserializing the whole run.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Metadata {
    /// When this snapshot was written (Unix timestamp, seconds).
    pub created: i64,
    /// A game-generated line describing where the run stands.
    pub progress: String,
}

impl Metadata {
    pub fn now(progress: &str) -> Self {
        Self {
            created: Utc::now().timestamp(),
            progress: progress.to_owned(),
        }
    }

    /// Local-time rendering of [`Self::created`], if it's a sane timestamp.
    pub fn created_local(&self) -> Option<DateTime<Local>> {
        Local.timestamp_opt(self.created, 0).single()
    }
}

/// Things that can go wrong talking to a save backend.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("save io: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file corrupted: {0}")]
    Corrupted(String),
}

/// A single save slot somewhere.
///
/// One slot per gateway; runs are exclusive. Every operation is synchronous --
/// the whole engine runs on one logical thread, and a snapshot is a few hundred
/// bytes.
pub trait SaveGateway: Send {
    /// Overwrite the slot with this snapshot.
    fn save(&mut self, meta: &Metadata, run: &Ledger) -> Result<(), SaveError>;

    /// Read the slot back. `Ok(None)` when nothing is there.
    fn load(&mut self) -> Result<Option<(Metadata, Ledger)>, SaveError>;

    /// Empty the slot. Emptying an empty slot is fine.
    fn wipe(&mut self) -> Result<(), SaveError>;
}

/// An in-process slot. Clones share the slot, so a test can keep a handle and
/// watch what the session writes.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    slot: Arc<Mutex<Option<(Metadata, Ledger)>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the slot, as if a previous run had saved.
    pub fn seeded(meta: Metadata, run: Ledger) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some((meta, run)))),
        }
    }

    /// What's in the slot right now.
    pub fn snapshot(&self) -> Option<(Metadata, Ledger)> {
        self.slot.lock().unwrap().clone()
    }
}

impl SaveGateway for Memory {
    fn save(&mut self, meta: &Metadata, run: &Ledger) -> Result<(), SaveError> {
        *self.slot.lock().unwrap() = Some((meta.clone(), run.clone()));
        Ok(())
    }

    fn load(&mut self) -> Result<Option<(Metadata, Ledger)>, SaveError> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn wipe(&mut self) -> Result<(), SaveError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}
