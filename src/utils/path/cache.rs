//! Memoized path parsing.
//!
//! Route generation and watch-root resolution both split the same paths
//! into directory, base name and extension over and over. `PathCache`
//! keeps the parsed form keyed by the full path.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Process-wide path cache.
pub static PATH_CACHE: LazyLock<PathCache> = LazyLock::new(PathCache::new);

/// A path split into its parts.
///
/// `ext` keeps the leading dot (`".md"`) or is empty; `base` is the file
/// name with `ext` stripped (`"index"` for `posts/index.md`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub dir: PathBuf,
    pub base: String,
    pub ext: String,
}

impl ParsedPath {
    fn parse(path: &Path) -> Self {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let base = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { dir, base, ext }
    }
}

/// Memoizing path parser.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: RwLock<FxHashMap<PathBuf, Arc<ParsedPath>>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `path`, returning the cached result when available.
    pub fn parse(&self, path: &Path) -> Arc<ParsedPath> {
        if let Some(parsed) = self.entries.read().get(path) {
            return Arc::clone(parsed);
        }

        let parsed = Arc::new(ParsedPath::parse(path));
        self.entries
            .write()
            .entry(path.to_path_buf())
            .or_insert(parsed)
            .clone()
    }

    /// Extension with leading dot, or `""`.
    pub fn extname(&self, path: &Path) -> String {
        self.parse(path).ext.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
