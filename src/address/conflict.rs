//! Route collision reporting.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::log;
use crate::utils::plural_s;

/// Two source files derived the same route; the first registered is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCollision {
    /// The contested route
    pub route: String,
    /// Source that owns the route
    pub kept: PathBuf,
    /// Source that was dropped
    pub skipped: PathBuf,
}

impl RouteCollision {
    /// Display the collision with paths relative to `root`.
    pub fn relative_to<'a>(&'a self, root: &'a Path) -> RelativeCollision<'a> {
        RelativeCollision { collision: self, root }
    }
}

/// [`RouteCollision`] formatted with root-relative paths.
pub struct RelativeCollision<'a> {
    collision: &'a RouteCollision,
    root: &'a Path,
}

impl fmt::Display for RelativeCollision<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.collision;
        let kept = c.kept.strip_prefix(self.root).unwrap_or(&c.kept);
        let skipped = c.skipped.strip_prefix(self.root).unwrap_or(&c.skipped);
        write!(
            f,
            "{} claimed by {}, skipping {}",
            c.route,
            kept.display(),
            skipped.display()
        )
    }
}

/// Log one collision as it happens.
pub fn warn_collision(collision: &RouteCollision, root: &Path) {
    log!("warning"; "route collision: {}", collision.relative_to(root));
}

/// Print a summary of all collisions.
///
/// Output format:
/// ```text
/// [warning] 2 route collisions
///   - /posts claimed by posts/index.md, skipping posts.md
///   - /about claimed by about.html, skipping about.md
/// ```
pub fn print_collisions(collisions: &[RouteCollision], root: &Path) {
    if collisions.is_empty() {
        return;
    }

    log!("warning"; "{} route collision{}", collisions.len(), plural_s(collisions.len()));
    for collision in collisions {
        eprintln!("  - {}", collision.relative_to(root));
    }
}
