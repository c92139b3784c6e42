//! Run lock that keeps overlapping scheduled runs from racing each other.
//!
//! The lock is an advisory exclusive `flock` on a file in the runtime
//! directory. It is released when the [`RunLock`] is dropped (or the process
//! exits). The file itself is left in place: deleting it while another process
//! has it open would let a third run lock a fresh inode.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants::LOCK_FILE_NAME;

/// Held for the duration of a run.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// `$XDG_RUNTIME_DIR/auto-mode.lock`, or `/tmp/auto-mode.lock` without a runtime dir.
pub fn default_lock_path() -> PathBuf {
    let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    runtime_dir.join(LOCK_FILE_NAME)
}

/// Try to take the run lock without blocking.
///
/// # Returns
/// * `Ok(Some(lock))` - The lock is held until `lock` is dropped
/// * `Ok(None)` - Another run holds the lock
/// * `Err(_)` - The lock file could not be opened or locked
pub fn try_acquire(path: &Path) -> Result<Option<RunLock>> {
    // Opened without truncation so a holder's PID survives a failed attempt
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open lock file {}", path.display()))?;

    match file.try_lock_exclusive() {
        Ok(()) => {
            // Record our PID now that we own the file
            file.set_len(0)?;
            writeln!(file, "{}", std::process::id())?;
            file.flush()?;

            Ok(Some(RunLock {
                file,
                path: path.to_path_buf(),
            }))
        }
        Err(e) if is_contended(&e) => Ok(None),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to lock {}", path.display()))
        }
    }
}

fn is_contended(error: &std::io::Error) -> bool {
    error.kind() == std::io::ErrorKind::WouldBlock
        || error.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
