use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Archive paths already claimed during one crawl run
///
/// Keyed by archive path rather than URL, so every URL that maps to the same
/// file is fetched once. `insert` is the only way to claim a path and is
/// atomic across tasks.
#[derive(Debug, Default)]
pub(crate) struct VisitedSet {
    paths: Mutex<HashSet<PathBuf>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `path`; returns false if it was already claimed
    pub fn insert(&self, path: PathBuf) -> bool {
        self.lock().insert(path)
    }

    /// Number of claimed paths
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        // The set is never left half-updated, so a poisoned lock is still usable
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
