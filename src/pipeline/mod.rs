//! Page pipeline: route map in, module graph out.
//!
//! ```text
//! Route ─read─> source ─Transformer─> html ─AssetExtractor─> page module
//!                                                  │
//!                         entry code: import "joy:dev-client"; import "./x.js"; ...
//!                         meta:       PlaceholderRecord { html, route, placeholder }
//! ```
//!
//! Every failure is scoped to its page: it is logged, returned in the
//! error list, and the page is left out of the graph.

mod module;
mod transform;

use std::path::PathBuf;

use thiserror::Error;

use crate::address::{Route, RouteMap};
use crate::asset::{AssetExtractor, ExtractError};
use crate::core::BuildMode;
use crate::{debug, log};

pub use module::{DEV_CLIENT_ID, Module, ModuleGraph, PlaceholderRecord, entry_code};
pub use transform::{Transformer, Transformers, identity};

/// A page that could not be turned into a module.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("{route}: failed to read {}", path.display())]
    Read {
        route: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{route}: transform failed for {}", path.display())]
    Transform {
        route: String,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("{route}: {source}")]
    Extract {
        route: String,
        path: PathBuf,
        #[source]
        source: ExtractError,
    },

    #[error("{route}: no transformer for `{ext}`")]
    NoTransformer { route: String, ext: String },
}

impl PageError {
    pub fn route(&self) -> &str {
        match self {
            Self::Read { route, .. }
            | Self::Transform { route, .. }
            | Self::Extract { route, .. }
            | Self::NoTransformer { route, .. } => route,
        }
    }
}

/// Loads every route of a map into a module graph.
pub struct Pipeline<'a> {
    transformers: &'a Transformers,
    mode: BuildMode,
    extractor: AssetExtractor,
}

impl<'a> Pipeline<'a> {
    pub fn new(transformers: &'a Transformers, mode: BuildMode) -> Self {
        Self {
            transformers,
            mode,
            extractor: AssetExtractor::new(),
        }
    }

    /// Use a specific extractor (e.g. with seeded placeholders).
    pub fn with_extractor(mut self, extractor: AssetExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Load all routes of `route_map`.
    pub fn load(
        route_map: &RouteMap,
        transformers: &'a Transformers,
        mode: BuildMode,
    ) -> (ModuleGraph, Vec<PageError>) {
        Self::new(transformers, mode).run(route_map)
    }

    /// Build the graph, collecting per-page errors.
    pub fn run(mut self, route_map: &RouteMap) -> (ModuleGraph, Vec<PageError>) {
        let mut graph = ModuleGraph::new();
        let mut errors = Vec::new();

        if self.mode.is_dev() {
            graph.insert(dev_client_module());
        }

        for route in route_map.iter() {
            match self.page_module(route) {
                Ok(module) => graph.insert(module),
                Err(e) => {
                    log!("error"; "{}", e);
                    errors.push(e);
                }
            }
        }

        debug!("pipeline"; "{} modules, {} failed pages", graph.len(), errors.len());
        (graph, errors)
    }

    /// Read, transform and extract one page.
    fn page_module(&mut self, route: &Route) -> Result<Module, PageError> {
        let transformer =
            self.transformers
                .get(&route.ext)
                .ok_or_else(|| PageError::NoTransformer {
                    route: route.route.clone(),
                    ext: route.ext.clone(),
                })?;

        let source = std::fs::read_to_string(&route.path).map_err(|source| PageError::Read {
            route: route.route.clone(),
            path: route.path.clone(),
            source,
        })?;

        let html = transformer
            .transform(route, &source)
            .map_err(|source| PageError::Transform {
                route: route.route.clone(),
                path: route.path.clone(),
                source,
            })?;

        let extracted = self
            .extractor
            .extract(&html)
            .map_err(|source| PageError::Extract {
                route: route.route.clone(),
                path: route.path.clone(),
                source,
            })?;

        let references = extracted
            .scripts
            .iter()
            .chain(&extracted.links)
            .map(String::as_str);

        Ok(Module {
            id: route.path.to_string_lossy().into_owned(),
            dir: route.dir.clone(),
            code: entry_code(self.mode.is_dev(), references),
            meta: Some(PlaceholderRecord {
                html: extracted.html,
                route: route.clone(),
                placeholder: extracted.placeholder,
            }),
        })
    }
}

/// The virtual live-reload client module.
fn dev_client_module() -> Module {
    Module {
        id: DEV_CLIENT_ID.to_string(),
        dir: PathBuf::new(),
        code: crate::embed::serve::dev_client_source(),
        meta: None,
    }
}
