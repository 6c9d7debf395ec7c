use std::path::{Path, PathBuf};

/// Roots the dev loop watches: the routes directory plus every file the
/// bundler resolved.
///
/// Files under `output_dir` are dropped so that writing output can never
/// trigger a rebuild.
pub(super) fn collect_watch_paths(
    routes_dir: &Path,
    output_dir: &Path,
    watch_files: &[PathBuf],
) -> Vec<PathBuf> {
    let mut paths = vec![routes_dir.to_path_buf()];
    for file in watch_files {
        if !file.starts_with(output_dir) && !paths.contains(file) {
            paths.push(file.clone());
        }
    }
    paths
}
