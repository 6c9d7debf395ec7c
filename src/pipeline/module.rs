//! The module graph handed to the bundler.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::address::Route;

/// Id of the virtual live-reload client module.
pub const DEV_CLIENT_ID: &str = "joy:dev-client";

/// Page metadata attached to a page module, consumed once by the splicer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderRecord {
    /// Extracted page markup carrying the placeholder marker
    pub html: String,
    /// Route the page belongs to
    pub route: Route,
    /// Placeholder token
    pub placeholder: String,
}

/// One module of the graph.
#[derive(Debug, Clone)]
pub struct Module {
    /// Unique id: the source path for pages, `joy:*` for virtual modules
    pub id: String,
    /// Directory relative imports resolve against
    pub dir: PathBuf,
    /// Module source. For pages: the entry code importing extracted assets
    pub code: String,
    /// Present on page modules only
    pub meta: Option<PlaceholderRecord>,
}

impl Module {
    /// Whether the module has any code to bundle.
    pub fn has_code(&self) -> bool {
        !self.code.trim().is_empty()
    }

    /// Import specifiers of `import "x";` lines, in order.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.code.lines().filter_map(parse_import)
    }
}

/// Parse one `import "spec";` statement.
fn parse_import(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("import")?.trim_start();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    let quote = rest.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    rest.strip_prefix(quote)?.strip_suffix(quote)
}

/// Entry code for a page: the dev client first, then every reference.
///
/// References are written verbatim and must not contain `"`.
pub fn entry_code<'a>(dev_client: bool, references: impl IntoIterator<Item = &'a str>) -> String {
    let mut code = String::new();
    if dev_client {
        code.push_str(&format!("import \"{DEV_CLIENT_ID}\";\n"));
    }
    for spec in references {
        code.push_str(&format!("import \"{spec}\";\n"));
    }
    code
}

/// Modules in insertion order with an id index.
#[derive(Debug, Default, Clone)]
pub struct ModuleGraph {
    modules: Vec<Module>,
    by_id: FxHashMap<String, usize>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module, replacing any module with the same id.
    pub fn insert(&mut self, module: Module) {
        match self.by_id.get(&module.id) {
            Some(&i) => self.modules[i] = module,
            None => {
                self.by_id.insert(module.id.clone(), self.modules.len());
                self.modules.push(module);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.by_id.get(id).map(|&i| &self.modules[i])
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Modules carrying page metadata.
    pub fn pages(&self) -> impl Iterator<Item = (&Module, &PlaceholderRecord)> {
        self.modules
            .iter()
            .filter_map(|m| m.meta.as_ref().map(|meta| (m, meta)))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
