//! `joy build`: generate the site and write it to the output directory.
//!
//! Pages that fail are logged as they fail and left out; everything else
//! is still written. The command exits with an error when any page failed.

use anyhow::{Result, bail};

use crate::address::conflict::print_collisions;
use crate::config::SiteConfig;
use crate::debug;
use crate::site::{BuildReport, Site, build};
use crate::utils::plural_count;

/// Build the site described by `config`.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    let site = Site::from_config(config)?;
    debug!("build"; "{:?}", site);

    let report = build(&site)?;
    for path in &report.written {
        debug!("build"; "wrote {}", path.display());
    }

    print_collisions(&report.collisions, site.routes_dir());

    let failed = report.failed_pages();
    if failed > 0 {
        bail!("{} failed", plural_count(failed, "page"));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> SiteConfig {
        let mut config = test_parse_config("");
        config.root = dir.path().to_path_buf();
        config.normalize_paths();
        config
    }

    #[test]
    fn test_build_site_writes_pages() {
        let dir = TempDir::new().unwrap();
        let routes = dir.path().join("routes");
        std::fs::create_dir_all(&routes).unwrap();
        std::fs::write(routes.join("index.html"), "<p>home</p>").unwrap();

        let report = build_site(&config_for(&dir)).unwrap();
        assert_eq!(report.written, vec![dir.path().join("build/index.html")]);
        assert!(report.collisions.is_empty());
    }

    #[test]
    fn test_build_site_reports_collisions() {
        let dir = TempDir::new().unwrap();
        let routes = dir.path().join("routes");
        std::fs::create_dir_all(routes.join("about")).unwrap();
        std::fs::write(routes.join("about.html"), "<p>flat</p>").unwrap();
        std::fs::write(routes.join("about/index.html"), "<p>nested</p>").unwrap();

        let report = build_site(&config_for(&dir)).unwrap();
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].route, "/about");
        assert_eq!(report.collisions[0].kept, routes.join("about.html"));
        assert_eq!(report.collisions[0].skipped, routes.join("about/index.html"));
    }

    #[test]
    fn test_build_site_fails_on_broken_page() {
        let dir = TempDir::new().unwrap();
        let routes = dir.path().join("routes");
        std::fs::create_dir_all(&routes).unwrap();
        std::fs::write(routes.join("index.html"), "<p>home</p>").unwrap();
        std::fs::write(routes.join("post.md"), "no front matter").unwrap();

        let err = build_site(&config_for(&dir)).unwrap_err();
        assert!(err.to_string().contains("1 page failed"));
        assert!(dir.path().join("build/index.html").exists());
    }
}
