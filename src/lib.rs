//! Joy - a static site build pipeline.
//!
//! Source files under a routes directory become URL routes, pass through
//! per-extension transformers, have their stylesheets and module scripts
//! pulled out for bundling, and get the bundled chunks spliced back in.
//! In dev mode the result is served from memory and rebuilt on change,
//! with a `"reload"` frame pushed to every connected browser.
//!
//! ```text
//! RouteMap ─> Transformer ─> AssetExtractor ─> Bundler ─> splice ─> output
//!                                                     ^
//!                           Watcher ─> DevLoop ───────┘──> PeerSet
//! ```

pub mod actor;
pub mod address;
pub mod asset;
pub mod bundle;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod core;
pub mod embed;
pub mod logger;
pub mod pipeline;
pub mod reload;
pub mod site;
pub mod utils;

pub use actor::{DevLoop, PeerSet, Watcher};
pub use address::{Route, RouteMap};
pub use asset::AssetExtractor;
pub use bundle::{BundleOutput, Bundler, ConcatBundler, splice};
pub use compiler::markdown::Markdown;
pub use pipeline::{Transformer, Transformers};
pub use site::{BuildReport, Site, build};
