//! RouteMap - the bidirectional mapping between source files and routes.

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;
use crate::utils::path::{PATH_CACHE, PathCache};
use crate::debug;

use super::conflict::{RouteCollision, warn_collision};
use super::{Route, SkipRules, list_files, normalize_extension};

/// Path <-> route bijection over one routes directory.
///
/// Built once per build pass and immutable afterwards; a rebuild
/// generates a fresh map.
#[derive(Debug, Default)]
pub struct RouteMap {
    routes_dir: PathBuf,
    /// Routes in registration order
    routes: Vec<Route>,
    /// Route string -> index into `routes`
    by_route: FxHashMap<String, usize>,
    /// Source path -> index into `routes`
    by_path: FxHashMap<PathBuf, usize>,
    /// Collisions resolved during registration
    collisions: Vec<RouteCollision>,
}

impl RouteMap {
    /// Scan `routes_dir` and build the map.
    ///
    /// A file is kept iff its extension is in `extensions` and no skip
    /// predicate matches its path relative to `routes_dir`.
    pub fn generate(
        routes_dir: &Path,
        extensions: &[impl AsRef<str>],
        skip: &SkipRules,
    ) -> Result<Self, ConfigError> {
        if !routes_dir.is_dir() {
            return Err(ConfigError::Validation(format!(
                "routes directory '{}' not found",
                routes_dir.display()
            )));
        }
        Ok(Self::from_files(
            routes_dir,
            list_files(routes_dir),
            extensions,
            skip,
            &PATH_CACHE,
        ))
    }

    /// Build the map from an explicit file list, registered in the given order.
    pub fn from_files(
        routes_dir: &Path,
        files: impl IntoIterator<Item = PathBuf>,
        extensions: &[impl AsRef<str>],
        skip: &SkipRules,
        cache: &PathCache,
    ) -> Self {
        let extensions: Vec<String> = extensions
            .iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .collect();

        let mut map = Self {
            routes_dir: routes_dir.to_path_buf(),
            ..Self::default()
        };

        for path in files {
            let ext = cache.extname(&path).to_ascii_lowercase();
            if !extensions.contains(&ext) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(routes_dir) else {
                continue;
            };
            if skip.is_skipped(relative) {
                debug!("routes"; "skip {}", relative.display());
                continue;
            }
            if let Some(route) = Route::derive(routes_dir, &path, cache) {
                map.register(route);
            }
        }

        map
    }

    /// Register a route; the first file to claim a route wins.
    fn register(&mut self, route: Route) {
        if let Some(&existing) = self.by_route.get(&route.route) {
            let collision = RouteCollision {
                route: route.route,
                kept: self.routes[existing].path.clone(),
                skipped: route.path,
            };
            warn_collision(&collision, &self.routes_dir);
            self.collisions.push(collision);
            return;
        }

        let index = self.routes.len();
        self.by_route.insert(route.route.clone(), index);
        self.by_path.insert(route.path.clone(), index);
        self.routes.push(route);
    }

    /// Route for a source path.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not in the map; callers only ask for paths
    /// they got from this map.
    pub fn by_path(&self, path: &Path) -> &Route {
        match self.get_path(path) {
            Some(route) => route,
            None => panic!("no route for path '{}'", path.display()),
        }
    }

    /// Route for a route string.
    ///
    /// # Panics
    ///
    /// Panics if `route` is not in the map.
    pub fn by_route(&self, route: &str) -> &Route {
        match self.get_route(route) {
            Some(r) => r,
            None => panic!("no route '{route}'"),
        }
    }

    pub fn get_path(&self, path: &Path) -> Option<&Route> {
        self.by_path.get(path).map(|&i| &self.routes[i])
    }

    pub fn get_route(&self, route: &str) -> Option<&Route> {
        self.by_route.get(route).map(|&i| &self.routes[i])
    }

    /// Routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn routes_dir(&self) -> &Path {
        &self.routes_dir
    }

    pub fn collisions(&self) -> &[RouteCollision] {
        &self.collisions
    }

    /// Output file of a known route.
    pub fn output_file(&self, route: &str) -> String {
        self.by_route(route).output_file()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXTS: &[&str] = &[".html", ".md"];

    fn site(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }
        dir
    }

    fn paths(dir: &Path, files: &[&str]) -> Vec<PathBuf> {
        files.iter().map(|f| dir.join(f)).collect()
    }

    #[test]
    fn test_generate_routes() {
        let dir = site(&["index.md", "about.html", "posts/index.md", "posts/hello.md"]);
        let map = RouteMap::generate(dir.path(), EXTS, &SkipRules::new()).unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(map.by_path(&dir.path().join("index.md")).route, "/");
        assert_eq!(map.by_path(&dir.path().join("about.html")).route, "/about");
        assert_eq!(map.by_path(&dir.path().join("posts/index.md")).route, "/posts");
        assert_eq!(map.by_route("/posts/hello").path, dir.path().join("posts/hello.md"));
    }

    #[test]
    fn test_lookups_are_inverse() {
        let dir = site(&["index.md", "a/b/index.md", "a/b/c.md", "x.html"]);
        let map = RouteMap::generate(dir.path(), EXTS, &SkipRules::new()).unwrap();

        for route in map.iter() {
            assert_eq!(map.by_route(&map.by_path(&route.path).route).path, route.path);
        }
    }

    #[test]
    fn test_extension_and_skip_filters() {
        let dir = site(&["index.md", "style.css", "drafts/wip.md", "notes.MD"]);
        let skip = SkipRules::from_patterns(&["^drafts/".into()]).unwrap();
        let map = RouteMap::generate(dir.path(), &["md"], &skip).unwrap();

        let routes: Vec<_> = map.iter().map(|r| r.route.as_str()).collect();
        assert_eq!(routes, vec!["/", "/notes"]);
        assert!(map.get_path(&dir.path().join("style.css")).is_none());
        assert!(map.get_route("/drafts/wip").is_none());
    }

    #[test]
    fn test_collision_first_registered_wins() {
        let dir = Path::new("/site/routes");
        let files = paths(dir, &["about.md", "about.html", "about/index.md"]);
        let map = RouteMap::from_files(dir, files, EXTS, &SkipRules::new(), &PathCache::new());

        assert_eq!(map.len(), 1);
        assert_eq!(map.by_route("/about").path, dir.join("about.md"));
        assert!(map.get_path(&dir.join("about.html")).is_none());
        assert!(map.get_path(&dir.join("about/index.md")).is_none());
        assert_eq!(map.collisions().len(), 2);
        assert_eq!(map.collisions()[0].skipped, dir.join("about.html"));
    }

    #[test]
    fn test_collision_is_deterministic_from_disk() {
        let dir = site(&["posts.md", "posts/index.md", "about.md", "about.html"]);
        let map = RouteMap::generate(dir.path(), EXTS, &SkipRules::new()).unwrap();

        // sorted listing: about.html < about.md, posts/index.md < posts.md
        assert_eq!(map.by_route("/about").path, dir.path().join("about.html"));
        assert_eq!(map.by_route("/posts").path, dir.path().join("posts/index.md"));
        assert_eq!(map.collisions().len(), 2);
    }

    #[test]
    fn test_missing_routes_dir() {
        let dir = TempDir::new().unwrap();
        let result = RouteMap::generate(&dir.path().join("nope"), EXTS, &SkipRules::new());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_output_file() {
        let dir = site(&["index.md", "posts/hello.md"]);
        let map = RouteMap::generate(dir.path(), EXTS, &SkipRules::new()).unwrap();
        assert_eq!(map.output_file("/"), "index.html");
        assert_eq!(map.output_file("/posts/hello"), "posts/hello/index.html");
    }

    #[test]
    #[should_panic(expected = "no route '/missing'")]
    fn test_by_route_unknown_panics() {
        RouteMap::default().by_route("/missing");
    }
}
