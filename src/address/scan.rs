//! Directory listing and skip predicates for route generation.

use std::fmt;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use regex::Regex;

use crate::config::ConfigError;
use crate::utils::path::to_posix;

/// A skip predicate. Receives the path relative to the routes directory;
/// returning `true` excludes the file.
pub type SkipFn = Box<dyn Fn(&Path) -> bool + Send + Sync>;

/// Skip predicates combined with logical OR.
#[derive(Default)]
pub struct SkipRules {
    predicates: Vec<SkipFn>,
}

impl SkipRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate.
    pub fn with(mut self, predicate: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// One predicate per regex, matched against the `/`-separated relative path.
    pub fn from_patterns(patterns: &[String]) -> Result<Self, ConfigError> {
        let mut rules = Self::new();
        for pattern in patterns {
            let re = Regex::new(pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            rules = rules.with(move |relative| re.is_match(&to_posix(relative)));
        }
        Ok(rules)
    }

    /// True if any predicate excludes `relative`.
    pub fn is_skipped(&self, relative: &Path) -> bool {
        self.predicates.iter().any(|skip| skip(relative))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for SkipRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipRules")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Recursively list every file under `dir`, sorted by path.
///
/// Sorting makes route registration order, and with it collision
/// resolution, independent of the filesystem's listing order.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_sorted_and_recursive() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("b/c")).unwrap();
        std::fs::write(dir.path().join("z.md"), "").unwrap();
        std::fs::write(dir.path().join("b/c/d.md"), "").unwrap();
        std::fs::write(dir.path().join("a.md"), "").unwrap();

        let files = list_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| to_posix(p.strip_prefix(dir.path()).unwrap()))
            .collect();
        assert_eq!(names, vec!["a.md", "b/c/d.md", "z.md"]);
    }

    #[test]
    fn test_skip_rules_or() {
        let rules = SkipRules::new()
            .with(|p| p.starts_with("drafts"))
            .with(|p| p.to_string_lossy().ends_with(".wip.md"));

        assert!(rules.is_skipped(Path::new("drafts/a.md")));
        assert!(rules.is_skipped(Path::new("posts/b.wip.md")));
        assert!(!rules.is_skipped(Path::new("posts/b.md")));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_skip_rules_from_patterns() {
        let rules = SkipRules::from_patterns(&["^_".into(), "/private/".into()]).unwrap();
        assert!(rules.is_skipped(Path::new("_partial.html")));
        assert!(rules.is_skipped(Path::new("a/private/b.md")));
        assert!(!rules.is_skipped(Path::new("a/b_c.md")));
    }

    #[test]
    fn test_skip_rules_bad_pattern() {
        let err = SkipRules::from_patterns(&["(".into()]).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }
}
