//! One generation of the site, and the production build on top of it.
//!
//! ```text
//! RouteMap::generate ─> Pipeline::load ─> Bundler::generate ─> splice ─> BundleOutput
//!        (fatal)            (per page)          (fatal)         (per page)
//! ```
//!
//! `build` writes the output table to disk; the dev loop keeps it in
//! memory and serves it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::address::{RouteCollision, RouteMap, SkipRules, normalize_extension};
use crate::bundle::{BundleOutput, Bundler, ConcatBundler, SpliceError, splice, write_output};
use crate::compiler::markdown::Markdown;
use crate::config::{ConfigError, SiteConfig};
use crate::core::BuildMode;
use crate::pipeline::{PageError, Pipeline, Transformers, identity};
use crate::utils::plural_s;
use crate::{debug, log};

/// Everything needed to generate the site.
pub struct Site {
    routes_dir: PathBuf,
    output_dir: PathBuf,
    skip: SkipRules,
    transformers: Transformers,
    bundler: Arc<dyn Bundler>,
    clean: bool,
}

/// Result of one generation.
#[derive(Debug)]
pub struct Generation {
    pub output: BundleOutput,
    pub route_map: RouteMap,
    pub page_errors: Vec<PageError>,
    pub splice_errors: Vec<SpliceError>,
}

impl Generation {
    /// Number of pages that did not make it into the output.
    pub fn failed_pages(&self) -> usize {
        self.page_errors.len() + self.splice_errors.len()
    }
}

/// Result of a production build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Written files, sorted
    pub written: Vec<PathBuf>,
    /// Routes claimed by more than one source
    pub collisions: Vec<RouteCollision>,
    pub page_errors: Vec<PageError>,
    pub splice_errors: Vec<SpliceError>,
}

impl BuildReport {
    pub fn is_ok(&self) -> bool {
        self.page_errors.is_empty() && self.splice_errors.is_empty()
    }

    pub fn failed_pages(&self) -> usize {
        self.page_errors.len() + self.splice_errors.len()
    }
}

/// The built-in transformers: `.html` passes through, `.md` is rendered.
pub fn default_transformers() -> Transformers {
    Transformers::new()
        .register(".html", identity)
        .register(".md", Markdown::new())
}

impl Site {
    /// A site with the built-in transformers and the concatenating bundler.
    pub fn new(routes_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let routes_dir = routes_dir.into();
        Self {
            bundler: Arc::new(ConcatBundler::new(&routes_dir)),
            routes_dir,
            output_dir: output_dir.into(),
            skip: SkipRules::new(),
            transformers: default_transformers(),
            clean: false,
        }
    }

    /// Build a site from validated configuration.
    ///
    /// Only the transformers listed in `build.extensions` are enabled.
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let skip = SkipRules::from_patterns(&config.build.skip)?;

        let mut transformers = Transformers::new();
        for ext in &config.build.extensions {
            transformers = match normalize_extension(ext).as_str() {
                ".html" => transformers.register(".html", identity),
                ".md" => transformers.register(".md", Markdown::from_config(&config.markdown)),
                other => {
                    return Err(ConfigError::Validation(format!(
                        "no transformer for extension `{other}`"
                    )));
                }
            };
        }

        Ok(Self::new(&config.build.routes, &config.build.output)
            .with_skip(skip)
            .with_transformers(transformers)
            .with_clean(config.build.clean))
    }

    pub fn with_skip(mut self, skip: SkipRules) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_transformers(mut self, transformers: Transformers) -> Self {
        self.transformers = transformers;
        self
    }

    pub fn with_bundler(mut self, bundler: impl Bundler + 'static) -> Self {
        self.bundler = Arc::new(bundler);
        self
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn routes_dir(&self) -> &Path {
        &self.routes_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate the full output table.
    ///
    /// Fails only on configuration problems (missing routes directory) and
    /// bundler failures; page-level failures are collected.
    pub fn generate(&self, mode: BuildMode) -> Result<Generation> {
        let route_map = RouteMap::generate(
            &self.routes_dir,
            &self.transformers.extensions(),
            &self.skip,
        )?;
        debug!("routes"; "{} route{}", route_map.len(), plural_s(route_map.len()));

        let (graph, page_errors) = Pipeline::load(&route_map, &self.transformers, mode);

        let mut output = self
            .bundler
            .generate(&graph)
            .context("bundler failed")?;
        let splice_errors = splice(&graph, &mut output);

        Ok(Generation {
            output,
            route_map,
            page_errors,
            splice_errors,
        })
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("routes_dir", &self.routes_dir)
            .field("output_dir", &self.output_dir)
            .field("skip", &self.skip)
            .field("transformers", &self.transformers)
            .field("clean", &self.clean)
            .finish_non_exhaustive()
    }
}

/// Production build: generate and write everything under the output directory.
pub fn build(site: &Site) -> Result<BuildReport> {
    let start = Instant::now();
    let mode = BuildMode::PRODUCTION;

    let generation = site.generate(mode)?;

    let written = if mode.write_output {
        write_output(&generation.output, &site.output_dir, site.clean)?
    } else {
        Vec::new()
    };

    log!(
        "build";
        "{} file{} in {:.2?}",
        written.len(),
        plural_s(written.len()),
        start.elapsed()
    );

    Ok(BuildReport {
        written,
        collisions: generation.route_map.collisions().to_vec(),
        page_errors: generation.page_errors,
        splice_errors: generation.splice_errors,
    })
}
