//! Shared utilities: path parsing, hashing, MIME detection, templating.

pub mod hash;
pub mod mime;
pub mod path;
pub mod plural;
pub mod template;

pub use plural::{plural_count, plural_s};
