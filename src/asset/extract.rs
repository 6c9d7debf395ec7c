//! Streaming extraction of stylesheet and module-script references.
//!
//! One pass over the markup with lol_html:
//!
//! - `<script type="module" src=X>` is recorded in `scripts` and removed
//! - any other `<script>` rejects the document
//! - `<link rel="stylesheet" href=X>` (or a `<link>` whose href ends in
//!   `.css`) is recorded in `links` and removed
//! - the placeholder marker is appended to `<head>`, or to the end of the
//!   document when there is no `<head>`

use std::cell::Cell;

use lol_html::errors::RewritingError;
use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, element, end, rewrite_str};
use thiserror::Error;

use super::placeholder::{Placeholders, marker};

/// Rejected page markup.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(
        "scripts in html files must be modules: {}",
        .src.as_deref().unwrap_or("<inline script>")
    )]
    NonModuleScript { src: Option<String> },

    #[error("module scripts must reference a file with `src`")]
    BareScript,

    #[error("asset reference cannot contain a double quote: {reference}")]
    QuotedReference { reference: String },

    #[error("html rewrite failed")]
    Rewrite(#[source] RewritingError),
}

/// Result of extracting one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Rewritten markup carrying the placeholder marker
    pub html: String,
    /// Stylesheet references in document order
    pub links: Vec<String>,
    /// Module script references in document order
    pub scripts: Vec<String>,
    /// Placeholder token
    pub placeholder: String,
}

/// Extracts asset references from pages of one build.
///
/// Owns the placeholder generator so tokens stay unique across the build.
#[derive(Debug, Default)]
pub struct AssetExtractor {
    placeholders: Placeholders,
}

impl AssetExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholders(placeholders: Placeholders) -> Self {
        Self { placeholders }
    }

    /// Extract references from `source` and inject a fresh placeholder.
    pub fn extract(&mut self, source: &str) -> Result<Extracted, ExtractError> {
        let placeholder = self.placeholders.next_token();
        let injected = marker(&placeholder);

        let mut links = Vec::new();
        let mut scripts = Vec::new();
        let head_seen = Cell::new(false);

        let html = rewrite_str(
            source,
            RewriteStrSettings {
                element_content_handlers: vec![
                    element!("script", |el| {
                        let src = script_src(el.get_attribute("type"), el.get_attribute("src"))?;
                        scripts.push(unquoted(src)?);
                        el.remove();
                        Ok(())
                    }),
                    element!("link", |el| {
                        if let Some(href) =
                            stylesheet_href(el.get_attribute("rel"), el.get_attribute("href"))
                        {
                            links.push(unquoted(href)?);
                            el.remove();
                        }
                        Ok(())
                    }),
                    element!("head", |el| {
                        if !head_seen.replace(true) {
                            el.append(&injected, ContentType::Html);
                        }
                        Ok(())
                    }),
                ],
                document_content_handlers: vec![end!(|end| {
                    if !head_seen.get() {
                        end.append(&injected, ContentType::Html);
                    }
                    Ok(())
                })],
                ..RewriteStrSettings::new()
            },
        )
        .map_err(into_extract_error)?;

        Ok(Extracted {
            html,
            links,
            scripts,
            placeholder,
        })
    }
}

/// The `src` of an acceptable script element.
fn script_src(ty: Option<String>, src: Option<String>) -> Result<String, ExtractError> {
    let is_module = ty.is_some_and(|ty| ty.trim().eq_ignore_ascii_case("module"));
    if !is_module {
        return Err(ExtractError::NonModuleScript { src });
    }
    src.ok_or(ExtractError::BareScript)
}

/// References become `import "..";` lines, which have no escaping.
fn unquoted(reference: String) -> Result<String, ExtractError> {
    if reference.contains('"') {
        return Err(ExtractError::QuotedReference { reference });
    }
    Ok(reference)
}

/// The `href` of a stylesheet link, `None` for any other link.
fn stylesheet_href(rel: Option<String>, href: Option<String>) -> Option<String> {
    let href = href?;
    let is_stylesheet = rel.is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|r| r.eq_ignore_ascii_case("stylesheet"))
    });
    let is_css = href
        .split(['?', '#'])
        .next()
        .is_some_and(|path| path.ends_with(".css"));

    (is_stylesheet || is_css).then_some(href)
}

/// Recover our own error from a handler abort.
fn into_extract_error(err: RewritingError) -> ExtractError {
    match err {
        RewritingError::ContentHandlerError(inner) => match inner.downcast::<ExtractError>() {
            Ok(extract) => *extract,
            Err(other) => ExtractError::Rewrite(RewritingError::ContentHandlerError(other)),
        },
        other => ExtractError::Rewrite(other),
    }
}
