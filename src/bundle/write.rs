//! Writing an output table to disk.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;

use super::BundleOutput;

/// Write every file of `output` under `out_dir`.
///
/// With `clean`, the output directory is removed first. Returns the
/// written paths, sorted.
pub fn write_output(output: &BundleOutput, out_dir: &Path, clean: bool) -> Result<Vec<PathBuf>> {
    if clean && out_dir.exists() {
        fs::remove_dir_all(out_dir).with_context(|| {
            format!("Failed to clear output directory: {}", out_dir.display())
        })?;
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let files: Vec<_> = output.files().collect();
    let mut written = files
        .par_iter()
        .map(|file| -> Result<PathBuf> {
            let path = output_path(out_dir, file.file_name())?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, file.bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    written.sort();
    Ok(written)
}

/// Join `file_name` onto `out_dir`, refusing names that leave it.
fn output_path(out_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let relative = Path::new(file_name);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        bail!("refusing to write '{file_name}' outside the output directory");
    }
    Ok(out_dir.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{OutputAsset, OutputFile};
    use tempfile::TempDir;

    fn asset(name: &str, body: &str) -> OutputFile {
        OutputFile::Asset(OutputAsset {
            file_name: name.into(),
            source: body.as_bytes().to_vec(),
            original_file_name: None,
        })
    }

    #[test]
    fn test_writes_nested_files() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("build");
        let mut output = BundleOutput::new();
        output.insert(asset("index.html", "home"));
        output.insert(asset("about/index.html", "about"));

        let written = write_output(&output, &out_dir, false).unwrap();
        assert_eq!(
            written,
            vec![out_dir.join("about/index.html"), out_dir.join("index.html")]
        );
        assert_eq!(fs::read_to_string(out_dir.join("about/index.html")).unwrap(), "about");
    }

    #[test]
    fn test_clean_removes_stale_files() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("build");
        fs::create_dir_all(&out_dir).unwrap();
        fs::write(out_dir.join("stale.html"), "old").unwrap();

        let mut output = BundleOutput::new();
        output.insert(asset("index.html", "home"));

        write_output(&output, &out_dir, true).unwrap();
        assert!(!out_dir.join("stale.html").exists());
        assert!(out_dir.join("index.html").exists());
    }

    #[test]
    fn test_rejects_escaping_names() {
        let dir = TempDir::new().unwrap();
        let mut output = BundleOutput::new();
        output.insert(asset("../evil.html", "x"));
        assert!(write_output(&output, dir.path(), false).is_err());
    }
}
