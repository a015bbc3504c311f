//! Saving and loading to a file on disk, specifically.
//!
//! The slot is one file: magic bytes, a small length-framed metadata header, then
//! the run itself. The header is framed so a resume screen can read just it
//! without touching the rest.

use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::state::Ledger;

use super::{Metadata, SaveError, SaveGateway};

const EXT: &str = "dds";
const SLOT: &str = "run";
const MAGIC: &[u8; 8] = b"DKDVSAVE";

fn bc_corrupt(e: bincode::Error) -> SaveError {
    match *e {
        bincode::ErrorKind::Io(e) => SaveError::Io(e),
        other => SaveError::Corrupted(other.to_string()),
    }
}

/// Keeps the save slot in a directory, as `run.dds`.
pub struct Directory(PathBuf);

impl Directory {
    /// Keep the slot under the given directory. The directory has to exist.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self(path.as_ref().into())
    }

    fn slot_path(&self) -> PathBuf {
        self.0.join(format!("{}.{}", SLOT, EXT))
    }

    /// Read just the slot's header, for a resume screen.
    pub fn peek(&self) -> Result<Option<Metadata>, SaveError> {
        let mut file = match File::open(self.slot_path()) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        read_header(&mut file).map(Some)
    }
}

fn read_header(file: &mut File) -> Result<Metadata, SaveError> {
    let mut magic = [0u8; 8];
    file.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(SaveError::Corrupted("missing magic bytes".into()));
    }
    let mut header_len_b = [0u8; 2];
    file.read_exact(&mut header_len_b)?;
    let header_len = u16::from_le_bytes(header_len_b) as usize;

    let mut header_b = vec![0u8; header_len];
    file.read_exact(&mut header_b)?;
    bincode::deserialize(&header_b).map_err(bc_corrupt)
}

impl SaveGateway for Directory {
    fn save(&mut self, meta: &Metadata, run: &Ledger) -> Result<(), SaveError> {
        let header = bincode::serialize(meta).map_err(bc_corrupt)?;
        if header.len() > u16::MAX as usize {
            return Err(SaveError::Corrupted("metadata too long to frame".into()));
        }
        let mut data = Vec::with_capacity(MAGIC.len() + 2 + header.len());
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(&(header.len() as u16).to_le_bytes());
        data.extend_from_slice(&header);
        bincode::serialize_into(&mut data, run).map_err(bc_corrupt)?;
        // single write, so a torn update can't leave a half-new slot behind
        fs::write(self.slot_path(), &data)?;
        Ok(())
    }

    fn load(&mut self) -> Result<Option<(Metadata, Ledger)>, SaveError> {
        let mut file = match File::open(self.slot_path()) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta = read_header(&mut file)?;
        let run = bincode::deserialize_from(&mut file).map_err(bc_corrupt)?;
        Ok(Some((meta, run)))
    }

    fn wipe(&mut self) -> Result<(), SaveError> {
        match fs::remove_file(self.slot_path()) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
