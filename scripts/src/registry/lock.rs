//! An advisory lock serializing writers of a registry file across processes

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use tracing::{debug, warn};

use crate::{
    constants::{LOCK_ATTEMPTS, LOCK_FILE_SUFFIX, LOCK_RETRY_INTERVAL_MS},
    errors::SarayuError,
};

/// Holds the lock file next to a registry file, removing it when dropped
#[derive(Debug)]
pub(crate) struct RegistryLock {
    /// The path of the lock file
    path: PathBuf,
}

impl RegistryLock {
    /// Acquires the lock guarding `file`, retrying while another process holds it
    pub(crate) fn acquire(file: &Path) -> Result<Self, SarayuError> {
        Self::acquire_with(
            file,
            LOCK_ATTEMPTS,
            Duration::from_millis(LOCK_RETRY_INTERVAL_MS),
        )
    }

    /// Acquires the lock guarding `file`, giving up after `attempts` tries spaced
    /// by `interval`
    pub(crate) fn acquire_with(
        file: &Path,
        attempts: usize,
        interval: Duration,
    ) -> Result<Self, SarayuError> {
        let mut path = file.as_os_str().to_owned();
        path.push(LOCK_FILE_SUFFIX);
        let path = PathBuf::from(path);

        for attempt in 0..attempts {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => {
                    debug!("acquired registry lock {}", path.display());
                    return Ok(RegistryLock { path });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if attempt == 0 {
                        debug!("waiting for registry lock {}", path.display());
                    }
                    thread::sleep(interval);
                }
                Err(e) => {
                    return Err(SarayuError::WriteFile(format!(
                        "could not create lock {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }

        Err(SarayuError::RegistryLocked(format!(
            "{} is held by another process, remove it if no other sarayu command is running",
            path.display()
        )))
    }
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("could not remove registry lock {}: {}", self.path.display(), e);
        }
    }
}
