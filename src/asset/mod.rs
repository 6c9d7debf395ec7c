//! Page asset extraction.
//!
//! Pages are stripped of their stylesheet and module-script references,
//! which flow through the bundler as imports of a per-page entry module.
//! A placeholder marker keeps the spot where the bundled chunk goes.

mod extract;
pub mod placeholder;

pub use extract::{AssetExtractor, ExtractError, Extracted};
pub use placeholder::Placeholders;
