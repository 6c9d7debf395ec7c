//! Path utilities.
//!
//! - [`cache`]: memoized path parsing (`PathCache`, `PATH_CACHE`)
//! - [`fs`]: filesystem path normalization (`normalize_path`, `resolve_path`)

pub mod cache;
pub mod fs;

pub use cache::{PATH_CACHE, ParsedPath, PathCache};
pub use fs::{normalize_path, resolve_path, to_posix};
