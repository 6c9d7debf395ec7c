//! The built-in bundler.
//!
//! Each page's entry module becomes one chunk: every imported script is
//! read and concatenated in import order. Stylesheets are emitted as
//! hashed assets and listed on the chunk for the splicer. There is no
//! module resolution beyond plain paths, no tree-shaking and no
//! minification.
//!
//! ```text
//! import "joy:dev-client";   -> dev client source (from the graph)
//! import "./main.js";        -> <page dir>/main.js
//! import "/shared/nav.js";   -> <routes dir>/shared/nav.js
//! import "style.css";        -> assets/style-1a2b3c4d.css
//! import "https://cdn/x.js"; -> kept as an import statement
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{BundleOutput, Bundler, OutputAsset, OutputChunk, OutputFile};
use crate::pipeline::{DEV_CLIENT_ID, Module, ModuleGraph};
use crate::utils::hash::fingerprint;
use crate::utils::path::{PATH_CACHE, normalize_path};
use crate::{debug, log};

/// Output directory for stylesheet assets.
const ASSET_DIR: &str = "assets";

/// Concatenating bundler rooted at the routes directory.
#[derive(Debug, Clone)]
pub struct ConcatBundler {
    routes_dir: PathBuf,
}

/// Where an import specifier points.
#[derive(Debug, PartialEq, Eq)]
enum Source {
    DevClient,
    External(String),
    File(PathBuf),
}

impl ConcatBundler {
    pub fn new(routes_dir: impl Into<PathBuf>) -> Self {
        Self {
            routes_dir: routes_dir.into(),
        }
    }

    fn resolve(&self, spec: &str, importer_dir: &Path) -> Source {
        if spec == DEV_CLIENT_ID {
            return Source::DevClient;
        }
        if is_external(spec) {
            return Source::External(spec.to_string());
        }

        let spec = strip_suffixes(spec);
        let path = match spec.strip_prefix('/') {
            Some(rooted) => self.routes_dir.join(rooted),
            None => importer_dir.join(spec),
        };
        Source::File(normalize_path(&path))
    }

    /// Build one page chunk, emitting stylesheet assets as a side effect.
    fn page_chunk(
        &self,
        module: &Module,
        graph: &ModuleGraph,
        output: &mut BundleOutput,
    ) -> OutputChunk {
        let mut code = String::new();
        let mut imported_css = Vec::new();

        for spec in module.imports() {
            match self.resolve(spec, &module.dir) {
                Source::DevClient => match graph.get(DEV_CLIENT_ID) {
                    Some(client) => push_source(&mut code, DEV_CLIENT_ID, &client.code),
                    None => log!("warning"; "{}: dev client module is not in the graph", module.id),
                },
                Source::External(url) if is_css(&url) => imported_css.push(url),
                Source::External(url) => code.push_str(&format!("import {url:?};\n")),
                Source::File(path) => {
                    output.add_watch_file(path.clone());
                    let bytes = match std::fs::read(&path) {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            log!("warning"; "{}: cannot read import '{}': {}", module.id, spec, e);
                            continue;
                        }
                    };

                    if is_css(&path.to_string_lossy()) {
                        let asset = css_asset(&path, bytes);
                        imported_css.push(asset.file_name.clone());
                        output.insert(OutputFile::Asset(asset));
                    } else {
                        push_source(&mut code, spec, &String::from_utf8_lossy(&bytes));
                    }
                }
            }
        }

        let name = module
            .meta
            .as_ref()
            .map(|meta| chunk_stem(&meta.route.route))
            .unwrap_or_else(|| PATH_CACHE.parse(Path::new(&module.id)).base.clone());

        // Keyed by facade as well as code: `/a-b` and `/a/b` share a stem.
        let mut keyed = module.id.clone().into_bytes();
        keyed.push(0);
        keyed.extend_from_slice(code.as_bytes());

        OutputChunk {
            file_name: format!("{name}-{}.js", fingerprint(&keyed)),
            code,
            facade_module_id: Some(module.id.clone()),
            imported_css,
        }
    }
}

impl Bundler for ConcatBundler {
    fn generate(&self, graph: &ModuleGraph) -> Result<BundleOutput> {
        let mut output = BundleOutput::new();

        for (module, _) in graph.pages() {
            if !module.has_code() {
                continue;
            }
            let chunk = self.page_chunk(module, graph, &mut output);
            debug!("bundle"; "{} -> {} ({} bytes)", module.id, chunk.file_name, chunk.code.len());
            output.insert(OutputFile::Chunk(chunk));
        }

        Ok(output)
    }
}

fn push_source(code: &mut String, spec: &str, source: &str) {
    code.push_str(&format!("// {spec}\n"));
    code.push_str(source);
    if !source.ends_with('\n') {
        code.push('\n');
    }
}

fn css_asset(path: &Path, bytes: Vec<u8>) -> OutputAsset {
    let parsed = PATH_CACHE.parse(path);
    OutputAsset {
        file_name: format!("{ASSET_DIR}/{}-{}.css", parsed.base, fingerprint(&bytes)),
        source: bytes,
        original_file_name: Some(path.to_path_buf()),
    }
}

/// Chunk name for a route: `/` -> `index`, `/posts/foo` -> `posts-foo`.
fn chunk_stem(route: &str) -> String {
    let trimmed = route.trim_matches('/');
    if trimmed.is_empty() {
        "index".to_string()
    } else {
        trimmed.replace('/', "-")
    }
}

fn is_external(spec: &str) -> bool {
    spec.starts_with("//") || spec.contains("://") || spec.starts_with("data:")
}

fn is_css(spec: &str) -> bool {
    strip_suffixes(spec).to_ascii_lowercase().ends_with(".css")
}

/// Drop `?query` and `#fragment`.
fn strip_suffixes(spec: &str) -> &str {
    spec.split(['?', '#']).next().unwrap_or(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Route;
    use crate::pipeline::{PlaceholderRecord, entry_code};
    use tempfile::TempDir;

    fn page(dir: &Path, route: &str, imports: &[&str], dev: bool) -> Module {
        let path = dir.join("index.html");
        Module {
            id: path.to_string_lossy().into_owned(),
            dir: dir.to_path_buf(),
            code: entry_code(dev, imports.iter().copied()),
            meta: Some(PlaceholderRecord {
                html: String::new(),
                route: Route {
                    route: route.into(),
                    ext: ".html".into(),
                    path,
                    dir: dir.to_path_buf(),
                },
                placeholder: "tok".into(),
            }),
        }
    }

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_concatenates_in_import_order() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        write(&root, "a.js", "console.log('a');");
        write(&root, "lib/b.js", "console.log('b');\n");

        let mut graph = ModuleGraph::new();
        graph.insert(page(&root, "/", &["./a.js", "/lib/b.js"], false));

        let out = ConcatBundler::new(&root).generate(&graph).unwrap();
        let chunk = out.chunks().next().unwrap();
        assert!(chunk.file_name.starts_with("index-"));
        assert!(chunk.file_name.ends_with(".js"));
        let a = chunk.code.find("console.log('a')").unwrap();
        let b = chunk.code.find("console.log('b')").unwrap();
        assert!(a < b);
        assert_eq!(chunk.facade_module_id.as_deref(), Some(graph.modules()[0].id.as_str()));
        assert_eq!(out.watch_files(), &[root.join("a.js"), root.join("lib/b.js")]);
    }

    #[test]
    fn test_css_becomes_asset() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        write(&root, "style.css", "body { color: red }");

        let mut graph = ModuleGraph::new();
        graph.insert(page(&root, "/about", &["style.css"], false));

        let out = ConcatBundler::new(&root).generate(&graph).unwrap();
        let chunk = out.chunks().next().unwrap();
        assert!(chunk.code.is_empty());
        assert!(chunk.file_name.starts_with("about-"));
        assert_eq!(chunk.imported_css.len(), 1);

        let css = &chunk.imported_css[0];
        assert!(css.starts_with("assets/style-") && css.ends_with(".css"));
        assert_eq!(out.get(css).unwrap().bytes(), b"body { color: red }");
    }

    #[test]
    fn test_dev_client_from_graph() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());

        let mut graph = ModuleGraph::new();
        graph.insert(Module {
            id: DEV_CLIENT_ID.into(),
            dir: PathBuf::new(),
            code: "/* client */".into(),
            meta: None,
        });
        graph.insert(page(&root, "/", &[], true));

        let out = ConcatBundler::new(&root).generate(&graph).unwrap();
        assert_eq!(out.chunks().count(), 1);
        assert!(out.chunks().next().unwrap().code.contains("/* client */"));
    }

    #[test]
    fn test_unreadable_import_is_skipped_but_watched() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());

        let mut graph = ModuleGraph::new();
        graph.insert(page(&root, "/", &["./missing.js"], false));

        let out = ConcatBundler::new(&root).generate(&graph).unwrap();
        assert!(out.chunks().next().unwrap().code.is_empty());
        assert_eq!(out.watch_files(), &[root.join("missing.js")]);
    }

    #[test]
    fn test_pages_without_code_get_no_chunk() {
        let dir = TempDir::new().unwrap();
        let mut graph = ModuleGraph::new();
        graph.insert(page(dir.path(), "/", &[], false));

        let out = ConcatBundler::new(dir.path()).generate(&graph).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_external_imports() {
        let dir = TempDir::new().unwrap();
        let mut graph = ModuleGraph::new();
        graph.insert(page(
            dir.path(),
            "/",
            &["https://cdn.example/x.js", "//cdn.example/y.css"],
            false,
        ));

        let out = ConcatBundler::new(dir.path()).generate(&graph).unwrap();
        let chunk = out.chunks().next().unwrap();
        assert_eq!(chunk.code, "import \"https://cdn.example/x.js\";\n");
        assert_eq!(chunk.imported_css, vec!["//cdn.example/y.css"]);
        assert!(out.watch_files().is_empty());
    }

    #[test]
    fn test_shared_stem_gets_distinct_chunks() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        write(&root, "main.js", "console.log('main');");

        let mut graph = ModuleGraph::new();
        graph.insert(page(&root.join("dash"), "/a-b", &["/main.js"], true));
        graph.insert(page(&root.join("nested"), "/a/b", &["/main.js"], true));
        graph.insert(Module {
            id: DEV_CLIENT_ID.into(),
            dir: PathBuf::new(),
            code: "/* client */".into(),
            meta: None,
        });

        let mut out = ConcatBundler::new(&root).generate(&graph).unwrap();
        let names: Vec<_> = out.chunks().map(|c| c.file_name.clone()).collect();
        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);
        assert!(names.iter().all(|n| n.starts_with("a-b-")));

        assert!(crate::bundle::splice(&graph, &mut out).is_empty());
        assert!(out.contains("a-b/index.html"));
        assert!(out.contains("a/b/index.html"));
    }

    #[test]
    fn test_chunk_stem() {
        assert_eq!(chunk_stem("/"), "index");
        assert_eq!(chunk_stem("/posts/foo"), "posts-foo");
    }

    #[test]
    fn test_strip_suffixes() {
        assert_eq!(strip_suffixes("a.css?v=1"), "a.css");
        assert_eq!(strip_suffixes("a.js#x"), "a.js");
        assert!(is_css("A.CSS?v=2"));
    }
}
