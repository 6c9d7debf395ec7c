//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! routes = "routes"               # Source directory mapped to URL routes
//! output = "build"                # Output directory for generated files
//! skip = ["^drafts/", "\\.wip\\."] # Regexes on the path relative to `routes`
//! extensions = [".html", ".md"]   # Enabled transformers
//! clean = false                   # Remove `output` before writing
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extensions with a built-in transformer.
pub const KNOWN_EXTENSIONS: &[&str] = &[".html", ".md"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Routes source directory.
    pub routes: PathBuf,

    /// Build output directory.
    pub output: PathBuf,

    /// Skip patterns, one predicate each.
    pub skip: Vec<String>,

    /// Enabled transformer extensions (`"md"` and `".md"` are equivalent).
    pub extensions: Vec<String>,

    /// Clean output directory before building.
    pub clean: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            routes: "routes".into(),
            output: "build".into(),
            skip: Vec::new(),
            extensions: KNOWN_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
            clean: false,
        }
    }
}

impl BuildSectionConfig {
    /// Validate build configuration.
    ///
    /// Expects `routes` and `output` to be normalized already.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.routes.is_dir() {
            diag.error_with_hint(
                FieldPath::new("build.routes"),
                format!("directory '{}' not found", self.routes.display()),
                "create it or point `routes` at an existing directory",
            );
        }

        if self.output == self.routes {
            diag.error(
                FieldPath::new("build.output"),
                "output directory must differ from the routes directory",
            );
        } else if self.output.starts_with(&self.routes) {
            diag.error_with_hint(
                FieldPath::new("build.output"),
                format!(
                    "output directory '{}' is inside the routes directory",
                    self.output.display()
                ),
                "generated files would be picked up as routes on the next build",
            );
        }

        for pattern in &self.skip {
            if let Err(e) = regex::Regex::new(pattern) {
                diag.error(
                    FieldPath::new("build.skip"),
                    format!("invalid pattern `{pattern}`: {e}"),
                );
            }
        }

        if self.extensions.is_empty() {
            diag.error(FieldPath::new("build.extensions"), "no extensions enabled");
        }
        for ext in &self.extensions {
            let normalized = crate::address::normalize_extension(ext);
            if !KNOWN_EXTENSIONS.contains(&normalized.as_str()) {
                diag.error_with_hint(
                    FieldPath::new("build.extensions"),
                    format!("no transformer for `{ext}`"),
                    format!("supported: {}", KNOWN_EXTENSIONS.join(", ")),
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
    fn test_build_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.routes, PathBuf::from("routes"));
        assert_eq!(config.build.output, PathBuf::from("build"));
        assert_eq!(config.build.extensions, vec![".html", ".md"]);
        assert!(config.build.skip.is_empty());
        assert!(!config.build.clean);
    }

    #[test]
    fn test_build_overrides() {
        let config = test_parse_config(
            "[build]\nroutes = \"pages\"\noutput = \"dist\"\nskip = [\"^drafts/\"]\nextensions = [\"md\"]",
        );
        assert_eq!(config.build.routes, PathBuf::from("pages"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.build.skip, vec!["^drafts/"]);
        assert_eq!(config.build.extensions, vec!["md"]);
    }

    fn section(dir: &TempDir) -> BuildSectionConfig {
        let routes = dir.path().join("routes");
        std::fs::create_dir_all(&routes).unwrap();
        BuildSectionConfig {
            routes,
            output: dir.path().join("build"),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_ok() {
        let dir = TempDir::new().unwrap();
        let mut diag = ConfigDiagnostics::new();
        section(&dir).validate(&mut diag);
        assert!(diag.is_empty(), "{:?}", diag.errors());
    }

    #[test]
    fn test_validate_missing_routes() {
        let dir = TempDir::new().unwrap();
        let mut build = section(&dir);
        build.routes = dir.path().join("nope");
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "build.routes");
    }

    #[test]
    fn test_validate_output_inside_routes() {
        let dir = TempDir::new().unwrap();
        let mut build = section(&dir);
        build.output = build.routes.join("out");
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field.as_str() == "build.output"));

        build.output = build.routes.clone();
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field.as_str() == "build.output"));
    }

    #[test]
    fn test_validate_bad_pattern_and_extension() {
        let dir = TempDir::new().unwrap();
        let mut build = section(&dir);
        build.skip = vec!["(unclosed".into()];
        build.extensions = vec![".typ".into()];
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
