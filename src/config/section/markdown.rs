//! `[markdown]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [markdown.layouts]
//! base = "layouts/base.html"   # Template with {title} and {body} placeholders
//! post = "layouts/post.html"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Layout name → template file (relative to the project root).
    pub layouts: BTreeMap<String, PathBuf>,
}

impl MarkdownConfig {
    /// Resolve every template path against `root`.
    pub fn normalize(&mut self, root: &Path) {
        for path in self.layouts.values_mut() {
            *path = crate::utils::path::resolve_path(path, root);
        }
    }

    /// Every layout template must exist.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (name, path) in &self.layouts {
            if !path.is_file() {
                diag.error(
                    FieldPath::new("markdown.layouts"),
                    format!("layout `{name}`: template '{}' not found", path.display()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_layouts_parse() {
        let config = test_parse_config("[markdown.layouts]\nbase = \"layouts/base.html\"");
        assert_eq!(
            config.markdown.layouts.get("base"),
            Some(&PathBuf::from("layouts/base.html"))
        );
    }

    #[test]
    fn test_validate_missing_template() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("base.html"), "{body}").unwrap();

        let mut markdown = MarkdownConfig::default();
        markdown.layouts.insert("base".into(), "base.html".into());
        markdown.layouts.insert("post".into(), "post.html".into());
        markdown.normalize(dir.path());

        let mut diag = ConfigDiagnostics::new();
        markdown.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("post"));
    }
}
