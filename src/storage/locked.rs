//! Advisory-locked whole-file reads and writes.
//!
//! Every queue and slide document goes through [`LockedFileStore`]. Each call
//! opens the file, takes an exclusive [`fs2`] lock, reads or replaces the
//! whole content, and releases the lock. Locks never span more than one
//! file, so a sequence of calls (a normalize pass, a cascading remove) can be
//! observed half-done by another process.
//!
//! # Blocking
//!
//! With `lock_timeout: None` a call blocks until the lock is granted. With
//! `Some(d)` the lock is polled with exponential backoff (1 ms doubling up to
//! 50 ms) and the call fails with [`StorageError::LockTimeout`] once `d` has
//! elapsed.
//!
//! Deleting a file does not take the lock. A writer racing a delete may
//! write into an unlinked file; the next reader sees the file as missing.
//!
//! Creating a file and taking its lock are two steps, so a reader can open
//! a freshly created file before the first content lands. Empty files read
//! as missing for that reason.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{Result, StorageError};

/// Upper bound for the sleep between two lock attempts.
const MAX_BACKOFF: Duration = Duration::from_millis(50);

/// Whole-file reads and writes under an exclusive advisory lock.
#[derive(Clone, Copy, Debug)]
pub struct LockedFileStore {
    lock_timeout: Option<Duration>,
}

impl LockedFileStore {
    /// Creates a store with the given lock timeout (`None` blocks forever).
    pub fn new(lock_timeout: Option<Duration>) -> Self {
        Self { lock_timeout }
    }

    /// Creates a store using `config.lock_timeout`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.lock_timeout)
    }

    /// Reads the whole file at `path` while holding its lock.
    ///
    /// Returns `Ok(None)` if the file does not exist or is empty.
    pub fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        self.acquire(&file, path)?;
        let mut buf = Vec::new();
        let read = file.read_to_end(&mut buf);
        let unlocked = FileExt::unlock(&file);
        read?;
        unlocked?;

        if buf.is_empty() {
            debug!(path = %path.display(), "Empty file, treated as missing");
            return Ok(None);
        }

        debug!(path = %path.display(), bytes = buf.len(), "Locked read");
        Ok(Some(buf))
    }

    /// Replaces the content of the file at `path` while holding its lock.
    ///
    /// The file is created if missing. It is truncated only after the lock
    /// is held, so readers never see a half-written document.
    pub fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        self.acquire(&file, path)?;
        let written = overwrite(&mut file, bytes);
        let unlocked = FileExt::unlock(&file);
        written?;
        unlocked?;

        debug!(path = %path.display(), bytes = bytes.len(), "Locked write");
        Ok(())
    }

    /// Writes `bytes` to a new file at `path`.
    ///
    /// Returns `Ok(false)` without touching anything if the file already
    /// exists. The existence check and the creation are one filesystem call,
    /// so of two racing creators exactly one wins.
    pub fn create(&self, path: &Path, bytes: &[u8]) -> Result<bool> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        self.acquire(&file, path)?;
        let written = overwrite(&mut file, bytes);
        let unlocked = FileExt::unlock(&file);
        written?;
        unlocked?;

        debug!(path = %path.display(), bytes = bytes.len(), "Locked create");
        Ok(true)
    }

    fn acquire(&self, file: &File, path: &Path) -> Result<()> {
        let Some(timeout) = self.lock_timeout else {
            FileExt::lock_exclusive(file)?;
            return Ok(());
        };

        let start = Instant::now();
        let mut backoff = Duration::from_millis(1);
        loop {
            match FileExt::try_lock_exclusive(file) {
                Ok(()) => return Ok(()),
                Err(e) if is_contended(&e) => {
                    let waited = start.elapsed();
                    if waited >= timeout {
                        return Err(StorageError::LockTimeout {
                            path: path.to_path_buf(),
                            waited_ms: waited.as_millis(),
                        }
                        .into());
                    }
                    trace!(path = %path.display(), ?backoff, "Lock contended");
                    thread::sleep(backoff.min(timeout - waited));
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn overwrite(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.set_len(0)?;
    file.write_all(bytes)?;
    file.sync_data()
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
