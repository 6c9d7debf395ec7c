//! The bundler seam and its output table.
//!
//! A [`Bundler`] turns the page module graph into emitted files. The
//! splicer then folds each page's chunk back into its HTML, and the result
//! is either written to disk (build) or served from memory (dev).
//!
//! - [`concat`]: the built-in bundler (one concatenated chunk per page)
//! - [`splice`]: placeholder replacement and page emission
//! - [`write`]: writing an output table to the output directory

mod concat;
mod splice;
mod write;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::pipeline::ModuleGraph;

pub use concat::ConcatBundler;
pub use splice::{SpliceError, public_path, splice};
pub use write::write_output;

/// Produces emitted files from a module graph.
pub trait Bundler: Send + Sync {
    fn generate(&self, graph: &ModuleGraph) -> Result<BundleOutput>;
}

/// Emitted JavaScript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub file_name: String,
    pub code: String,
    /// Module this chunk was generated for
    pub facade_module_id: Option<String>,
    /// Stylesheet files the chunk's module imported
    pub imported_css: Vec<String>,
}

/// Any other emitted file (stylesheets, final pages).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputAsset {
    pub file_name: String,
    pub source: Vec<u8>,
    pub original_file_name: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFile {
    Chunk(OutputChunk),
    Asset(OutputAsset),
}

impl OutputFile {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Chunk(chunk) => &chunk.file_name,
            Self::Asset(asset) => &asset.file_name,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Chunk(chunk) => chunk.code.as_bytes(),
            Self::Asset(asset) => &asset.source,
        }
    }
}

/// Emitted files keyed by output file name, plus the files the bundler
/// read to produce them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOutput {
    files: BTreeMap<String, OutputFile>,
    watch_files: Vec<PathBuf>,
}

impl BundleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any file with the same name.
    pub fn insert(&mut self, file: OutputFile) {
        self.files.insert(file.file_name().to_string(), file);
    }

    pub fn remove(&mut self, file_name: &str) -> Option<OutputFile> {
        self.files.remove(file_name)
    }

    pub fn get(&self, file_name: &str) -> Option<&OutputFile> {
        self.files.get(file_name)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.files.contains_key(file_name)
    }

    /// All files, sorted by name.
    pub fn files(&self) -> impl Iterator<Item = &OutputFile> {
        self.files.values()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &OutputChunk> {
        self.files.values().filter_map(|f| match f {
            OutputFile::Chunk(chunk) => Some(chunk),
            OutputFile::Asset(_) => None,
        })
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Record a file the output depends on. Duplicates are ignored.
    pub fn add_watch_file(&mut self, path: PathBuf) {
        if !self.watch_files.contains(&path) {
            self.watch_files.push(path);
        }
    }

    pub fn watch_files(&self) -> &[PathBuf] {
        &self.watch_files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
