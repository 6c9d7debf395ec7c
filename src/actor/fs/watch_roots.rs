use std::path::{Path, PathBuf};

/// Outcome of adding a path to the watch set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootChange {
    /// An existing root already covers the path; nothing to start.
    Covered { by: PathBuf },
    /// `path` became a root; `replaced` roots were its descendants and
    /// must stop being watched.
    Attached { path: PathBuf, replaced: Vec<PathBuf> },
}

/// Directory-subsumption bookkeeping.
///
/// The set never holds two roots where one is an ancestor of the other,
/// so one recursive watch per root covers everything without duplicate
/// event delivery.
#[derive(Debug, Default)]
pub(super) struct WatchRoots {
    roots: Vec<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Add a directory.
    ///
    /// Walks upward from `path` to the filesystem root; any watched
    /// ancestor (or `path` itself) covers it. Otherwise `path` becomes a
    /// root and absorbs every existing root below it.
    pub(super) fn add(&mut self, path: &Path) -> RootChange {
        if let Some(by) = path
            .ancestors()
            .find(|ancestor| self.roots.iter().any(|root| root == ancestor))
        {
            return RootChange::Covered {
                by: by.to_path_buf(),
            };
        }

        let (replaced, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.roots)
            .into_iter()
            .partition(|root| root.starts_with(path));
        self.roots = kept;
        self.roots.push(path.to_path_buf());

        RootChange::Attached {
            path: path.to_path_buf(),
            replaced,
        }
    }

    /// Revert an `Attached` change whose underlying watch failed.
    pub(super) fn undo(&mut self, change: &RootChange) {
        if let RootChange::Attached { path, replaced } = change {
            self.roots.retain(|root| root != path);
            self.roots.extend(replaced.iter().cloned());
        }
    }

    pub(super) fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub(super) fn clear(&mut self) {
        self.roots.clear();
    }
}
