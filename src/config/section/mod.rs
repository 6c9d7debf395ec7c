//! Configuration section definitions.
//!
//! Each module corresponds to a section in `joy.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `build`    | `[build]`      | Routes/output paths, skip, transformers |
//! | `markdown` | `[markdown]`   | Named layout templates               |
//! | `serve`    | `[serve]`      | Development server and watcher       |

mod build;
mod markdown;
mod serve;

pub use build::BuildSectionConfig;
pub use markdown::MarkdownConfig;
pub use serve::ServeConfig;
