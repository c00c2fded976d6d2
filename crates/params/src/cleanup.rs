//! Deferred reclamation of upload temp files.
//!
//! An uploaded file handle may be read at any later point of the rendering
//! pipeline, so the backing temp files must outlive the request. Every spill
//! registers its path here; the host drains the registry once at shutdown.
//! Registration is concurrent-safe across in-flight requests.

use std::sync::{LazyLock, Mutex, PoisonError};

use tempfile::TempPath;

static GLOBAL: LazyLock<TempFileRegistry> = LazyLock::new(TempFileRegistry::new);

/// Owns the temp paths of spilled uploads until shutdown.
///
/// Dropping a [`TempPath`] deletes the file, so draining the registry is the
/// cleanup.
#[derive(Debug, Default)]
pub struct TempFileRegistry {
    files: Mutex<Vec<TempPath>>,
}

impl TempFileRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by the processor.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Take ownership of a spilled file's path.
    pub fn register(&self, path: TempPath) {
        self.lock().push(path);
    }

    /// Number of files currently awaiting cleanup.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Delete every registered file. Returns how many were reclaimed.
    pub fn drain(&self) -> usize {
        // Dropping the TempPaths removes the files.
        let files = std::mem::take(&mut *self.lock());
        files.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TempPath>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lifecycle hook: reclaim all outstanding upload temp files. Call once at
/// process shutdown.
pub fn shutdown_cleanup() -> usize {
    TempFileRegistry::global().drain()
}
