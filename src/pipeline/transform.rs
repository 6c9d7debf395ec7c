//! Per-extension transformers turning source text into page HTML.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;

use crate::address::{Route, normalize_extension};

/// Turns one source file into HTML.
///
/// Failing aborts that page only; the build reports it and continues.
pub trait Transformer: Send + Sync {
    fn transform(&self, route: &Route, source: &str) -> Result<String>;
}

impl<F> Transformer for F
where
    F: Fn(&Route, &str) -> Result<String> + Send + Sync,
{
    fn transform(&self, route: &Route, source: &str) -> Result<String> {
        self(route, source)
    }
}

/// HTML pages pass through untouched.
pub fn identity(_route: &Route, source: &str) -> Result<String> {
    Ok(source.to_string())
}

/// Transformers keyed by normalized extension.
///
/// The key set doubles as the route map's extension filter.
#[derive(Clone, Default)]
pub struct Transformers {
    by_ext: BTreeMap<String, Arc<dyn Transformer>>,
}

impl Transformers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `transformer` for `ext`, replacing any previous one.
    pub fn register(mut self, ext: &str, transformer: impl Transformer + 'static) -> Self {
        self.by_ext
            .insert(normalize_extension(ext), Arc::new(transformer));
        self
    }

    pub fn get(&self, ext: &str) -> Option<&dyn Transformer> {
        self.by_ext
            .get(&normalize_extension(ext))
            .map(|t| t.as_ref())
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<String> {
        self.by_ext.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_ext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ext.is_empty()
    }
}

impl std::fmt::Debug for Transformers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformers")
            .field("extensions", &self.extensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn route() -> Route {
        Route {
            route: "/".into(),
            ext: ".html".into(),
            path: PathBuf::from("/site/routes/index.html"),
            dir: PathBuf::from("/site/routes"),
        }
    }

    #[test]
    fn test_identity() {
        assert_eq!(identity(&route(), "<p>x</p>").unwrap(), "<p>x</p>");
    }

    #[test]
    fn test_registry_normalizes_extensions() {
        let transformers = Transformers::new()
            .register("html", identity)
            .register(".MD", |_: &Route, src: &str| -> Result<String> {
                Ok(src.to_uppercase())
            });

        assert_eq!(transformers.extensions(), vec![".html", ".md"]);
        let md = transformers.get("md").unwrap();
        assert_eq!(md.transform(&route(), "hi").unwrap(), "HI");
        assert!(transformers.get(".typ").is_none());
    }
}
