//! The `Route` record and route derivation.

use std::path::{Path, PathBuf};

use crate::utils::path::{PathCache, to_posix};

/// A source file bound to its URL route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Absolute URL path, always starting with `/`.
    pub route: String,
    /// Source extension with leading dot.
    pub ext: String,
    /// Absolute source file path.
    pub path: PathBuf,
    /// Directory containing `path`.
    pub dir: PathBuf,
}

impl Route {
    /// Derive the route for `path` inside `routes_dir`.
    ///
    /// `index.<ext>` contributes no segment of its own:
    ///
    /// ```text
    /// routes/index.md        -> /
    /// routes/posts/index.md  -> /posts
    /// routes/posts/foo.md    -> /posts/foo
    /// ```
    ///
    /// Returns `None` when `path` is not inside `routes_dir`.
    pub fn derive(routes_dir: &Path, path: &Path, cache: &PathCache) -> Option<Self> {
        let parsed = cache.parse(path);
        let relative = parsed.dir.strip_prefix(routes_dir).ok()?;

        let mut route = String::from("/");
        route.push_str(&to_posix(relative));
        if parsed.base != "index" {
            if !route.ends_with('/') {
                route.push('/');
            }
            route.push_str(&parsed.base);
        }

        Some(Self {
            route,
            ext: parsed.ext.to_ascii_lowercase(),
            path: path.to_path_buf(),
            dir: parsed.dir.clone(),
        })
    }

    /// Output file for this route, relative to the output directory.
    pub fn output_file(&self) -> String {
        output_file(&self.route)
    }
}

/// Map a route to its output file: `/` -> `index.html`, `/a/b` -> `a/b/index.html`.
pub fn output_file(route: &str) -> String {
    let trimmed = route.trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{trimmed}/index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(path: &str) -> Route {
        Route::derive(Path::new("/site/routes"), Path::new(path), &PathCache::new()).unwrap()
    }

    #[test]
    fn test_root_index() {
        let route = derive("/site/routes/index.md");
        assert_eq!(route.route, "/");
        assert_eq!(route.ext, ".md");
        assert_eq!(route.dir, PathBuf::from("/site/routes"));
    }

    #[test]
    fn test_nested_index() {
        assert_eq!(derive("/site/routes/a/b/index.md").route, "/a/b");
    }

    #[test]
    fn test_nested_page() {
        assert_eq!(derive("/site/routes/a/b/c.md").route, "/a/b/c");
        assert_eq!(derive("/site/routes/about.html").route, "/about");
    }

    #[test]
    fn test_index_prefix_is_not_index() {
        assert_eq!(derive("/site/routes/indexes.md").route, "/indexes");
    }

    #[test]
    fn test_outside_routes_dir() {
        let route = Route::derive(
            Path::new("/site/routes"),
            Path::new("/site/layouts/base.html"),
            &PathCache::new(),
        );
        assert!(route.is_none());
    }

    #[test]
    fn test_output_file() {
        assert_eq!(output_file("/"), "index.html");
        assert_eq!(output_file("/about"), "about/index.html");
        assert_eq!(output_file("/a/b"), "a/b/index.html");
        assert_eq!(derive("/site/routes/posts/index.md").output_file(), "posts/index.html");
    }
}
