//! Markdown pages.
//!
//! Front matter is required and must carry a `title`. The body is
//! rendered with pulldown-cmark and then wrapped by the layout named in
//! the `layout` key, if any:
//!
//! ```text
//! ---
//! title: Home
//! layout: base      -> [markdown.layouts] base = "layouts/base.html"
//! ---
//! # Welcome
//! ```

mod frontmatter;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use pulldown_cmark::{Options, Parser, html};

use crate::address::Route;
use crate::config::MarkdownConfig;
use crate::log;
use crate::pipeline::Transformer;
use crate::utils::template::template;

pub use frontmatter::{FrontMatter, FrontMatterError, extract as extract_frontmatter};

/// Wraps a rendered body into a full page.
pub type Layout = Arc<dyn Fn(&str, &FrontMatter) -> Result<String> + Send + Sync>;

/// Options for markdown conversion
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
        }
    }
}

impl MarkdownOptions {
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        opts
    }
}

/// Render a markdown body to HTML.
pub fn render_body(source: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(source, options.to_pulldown_options());
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// The markdown transformer.
#[derive(Clone, Default)]
pub struct Markdown {
    options: MarkdownOptions,
    layouts: BTreeMap<String, Layout>,
}

impl Markdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: MarkdownOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a named layout.
    pub fn with_layout<F>(mut self, name: impl Into<String>, layout: F) -> Self
    where
        F: Fn(&str, &FrontMatter) -> Result<String> + Send + Sync + 'static,
    {
        self.layouts.insert(name.into(), Arc::new(layout));
        self
    }

    /// Layouts from `[markdown.layouts]`, each a `{key}` template.
    pub fn from_config(config: &MarkdownConfig) -> Self {
        config
            .layouts
            .iter()
            .fold(Self::new(), |md, (name, file)| {
                md.with_layout(name.clone(), template_layout(file.clone()))
            })
    }

    /// Convert one markdown document to page HTML.
    pub fn convert(&self, route: &Route, source: &str) -> Result<String> {
        let (front, body) = extract_frontmatter(source)
            .with_context(|| format!("{}: bad front matter", route.path.display()))?;
        let body = render_body(body, &self.options);

        let Some(name) = front.layout.as_deref() else {
            return Ok(body);
        };
        match self.layouts.get(name) {
            Some(layout) => layout(&body, &front)
                .with_context(|| format!("layout `{name}` failed for {}", route.route)),
            None => {
                log!("warning"; "{}: unknown layout `{}`, using body as-is", route.route, name);
                Ok(body)
            }
        }
    }
}

impl Transformer for Markdown {
    fn transform(&self, route: &Route, source: &str) -> Result<String> {
        self.convert(route, source)
    }
}

impl std::fmt::Debug for Markdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Markdown")
            .field("options", &self.options)
            .field("layouts", &self.layouts.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A layout backed by a template file.
///
/// `{body}` receives the rendered body; every front matter key is
/// available as `{key}`.
fn template_layout(file: PathBuf) -> impl Fn(&str, &FrontMatter) -> Result<String> + Send + Sync {
    move |body: &str, front: &FrontMatter| -> Result<String> {
        let replacements = front
            .fields
            .iter()
            .filter(|(key, _)| key.as_str() != "body")
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .chain(std::iter::once(("body", body)));
        template(&file, replacements)
    }
}
