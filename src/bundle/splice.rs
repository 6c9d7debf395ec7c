//! Folding bundled chunks back into their pages.
//!
//! For every page module, the chunk generated for it replaces the page's
//! placeholder marker:
//!
//! ```text
//! chunk with code        -> <link rel="stylesheet" href="/assets/s-….css">
//!                           <script type="module" src="/index-….js"></script>
//! chunk with empty code  -> stylesheet links only; the chunk is dropped
//! no chunk, no entry     -> "" (page had nothing to bundle)
//! no chunk, entry code   -> SpliceError::MissingChunk (that page only)
//! ```
//!
//! The finished page is emitted as an asset at the route's output file.

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::{BundleOutput, OutputAsset, OutputFile};
use crate::asset::placeholder::marker;
use crate::log;
use crate::pipeline::ModuleGraph;

#[derive(Debug, Error)]
pub enum SpliceError {
    #[error("{route}: no chunk was emitted for entry module {module}")]
    MissingChunk { route: String, module: String },
}

/// `/`-rooted public path of an emitted file. External URLs pass through.
pub fn public_path(file_name: &str) -> String {
    if file_name.starts_with("//") || file_name.contains("://") {
        file_name.to_string()
    } else {
        format!("/{}", file_name.trim_start_matches('/'))
    }
}

/// Splice every page of `graph` into `output`.
///
/// Pages whose chunk is missing are left out and reported; every other
/// page is emitted.
pub fn splice(graph: &ModuleGraph, output: &mut BundleOutput) -> Vec<SpliceError> {
    let by_facade: FxHashMap<String, String> = output
        .chunks()
        .filter_map(|chunk| {
            chunk
                .facade_module_id
                .clone()
                .map(|id| (id, chunk.file_name.clone()))
        })
        .collect();

    let mut errors = Vec::new();

    for (module, meta) in graph.pages() {
        let substitution = match by_facade.get(&module.id) {
            None if !module.has_code() => String::new(),
            None => {
                let error = SpliceError::MissingChunk {
                    route: meta.route.route.clone(),
                    module: module.id.clone(),
                };
                log!("error"; "{}", error);
                errors.push(error);
                continue;
            }
            Some(file_name) => chunk_tags(output, file_name),
        };

        let html = meta.html.replace(&marker(&meta.placeholder), &substitution);
        output.insert(OutputFile::Asset(OutputAsset {
            file_name: meta.route.output_file(),
            source: html.into_bytes(),
            original_file_name: Some(meta.route.path.clone()),
        }));
    }

    errors
}

/// Tags for one chunk. An empty chunk is removed from `output`.
fn chunk_tags(output: &mut BundleOutput, file_name: &str) -> String {
    let Some(OutputFile::Chunk(chunk)) = output.get(file_name) else {
        return String::new();
    };

    let mut tags: String = chunk
        .imported_css
        .iter()
        .map(|css| format!(r#"<link rel="stylesheet" href="{}">"#, public_path(css)))
        .collect();

    if chunk.code.trim().is_empty() {
        output.remove(file_name);
    } else {
        tags.push_str(&format!(
            r#"<script type="module" src="{}"></script>"#,
            public_path(file_name)
        ));
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Route;
    use crate::bundle::OutputChunk;
    use crate::pipeline::{Module, PlaceholderRecord};
    use std::path::PathBuf;

    fn page(id: &str, route: &str, code: &str) -> Module {
        Module {
            id: id.into(),
            dir: PathBuf::from("/site/routes"),
            code: code.into(),
            meta: Some(PlaceholderRecord {
                html: format!("<head><title>t</title>{}</head><p>x</p>", marker("tok123")),
                route: Route {
                    route: route.into(),
                    ext: ".html".into(),
                    path: PathBuf::from(id),
                    dir: PathBuf::from("/site/routes"),
                },
                placeholder: "tok123".into(),
            }),
        }
    }

    fn chunk(id: &str, name: &str, code: &str, css: &[&str]) -> OutputFile {
        OutputFile::Chunk(OutputChunk {
            file_name: name.into(),
            code: code.into(),
            facade_module_id: Some(id.into()),
            imported_css: css.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn html(output: &BundleOutput, name: &str) -> String {
        String::from_utf8(output.get(name).unwrap().bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_non_empty_chunk_gets_script_tag() {
        let mut graph = ModuleGraph::new();
        graph.insert(page("/site/routes/index.html", "/", "import \"./a.js\";\n"));
        let mut output = BundleOutput::new();
        output.insert(chunk("/site/routes/index.html", "index-1234abcd.js", "x()", &[]));

        assert!(splice(&graph, &mut output).is_empty());

        let page = html(&output, "index.html");
        assert_eq!(
            page.matches(r#"<script type="module" src="/index-1234abcd.js"></script>"#).count(),
            1
        );
        assert!(!page.contains("tok123"));
        assert!(output.contains("index-1234abcd.js"));
    }

    #[test]
    fn test_empty_chunk_is_removed() {
        let mut graph = ModuleGraph::new();
        graph.insert(page("/site/routes/about.html", "/about", "import \"./s.css\";\n"));
        let mut output = BundleOutput::new();
        output.insert(chunk(
            "/site/routes/about.html",
            "about-00000000.js",
            "",
            &["assets/s-1a2b3c4d.css"],
        ));

        assert!(splice(&graph, &mut output).is_empty());

        let page = html(&output, "about/index.html");
        assert!(!page.contains("<script"));
        assert!(!page.contains("tok123"));
        assert!(page.contains(r#"<link rel="stylesheet" href="/assets/s-1a2b3c4d.css">"#));
        assert!(!output.contains("about-00000000.js"));
    }

    #[test]
    fn test_page_without_entry_code() {
        let mut graph = ModuleGraph::new();
        graph.insert(page("/site/routes/index.html", "/", ""));
        let mut output = BundleOutput::new();

        assert!(splice(&graph, &mut output).is_empty());
        assert_eq!(
            html(&output, "index.html"),
            "<head><title>t</title></head><p>x</p>"
        );
    }

    #[test]
    fn test_missing_chunk_fails_that_page_only() {
        let mut graph = ModuleGraph::new();
        graph.insert(page("/site/routes/a.html", "/a", "import \"./a.js\";\n"));
        graph.insert(page("/site/routes/b.html", "/b", ""));
        let mut output = BundleOutput::new();

        let errors = splice(&graph, &mut output);
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], SpliceError::MissingChunk { route, .. } if route == "/a"));
        assert!(!output.contains("a/index.html"));
        assert!(output.contains("b/index.html"));
    }

    #[test]
    fn test_non_page_modules_are_skipped() {
        let mut graph = ModuleGraph::new();
        graph.insert(Module {
            id: "joy:dev-client".into(),
            dir: PathBuf::new(),
            code: "x".into(),
            meta: None,
        });
        let mut output = BundleOutput::new();
        assert!(splice(&graph, &mut output).is_empty());
        assert!(output.is_empty());
    }

    #[test]
    fn test_public_path() {
        assert_eq!(public_path("a.js"), "/a.js");
        assert_eq!(public_path("/a.js"), "/a.js");
        assert_eq!(public_path("https://cdn/x.css"), "https://cdn/x.css");
    }
}
