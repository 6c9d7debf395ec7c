//! Route addressing - the bidirectional mapping between source files and URL routes.
//!
//! # Architecture
//!
//! ```text
//! Source Files                    Routes
//! ============                    ======
//! routes/index.md           <->   /
//! routes/about.html         <->   /about
//! routes/posts/index.md     <->   /posts
//! routes/posts/hello.md     <->   /posts/hello
//! ```
//!
//! # Module Structure
//!
//! - [`conflict`]: route collisions (multiple sources -> same route)
//! - [`route`]: the `Route` record and route derivation
//! - [`scan`]: directory listing and skip predicates
//! - [`space`]: `RouteMap` core implementation

pub mod conflict;
mod route;
mod scan;
mod space;

pub use conflict::RouteCollision;
pub use route::{Route, output_file};
pub use scan::{SkipFn, SkipRules, list_files};
pub use space::RouteMap;

/// Normalize an extension to carry exactly one leading dot.
///
/// `"md"`, `".md"` and `"MD"` all become `".md"`.
pub fn normalize_extension(ext: &str) -> String {
    format!(".{}", ext.trim_start_matches('.').to_ascii_lowercase())
}
