//! Dev loop: watch, rebuild, broadcast.
//!
//! ```text
//! Watcher --batch--> rebuild (spawn_blocking) --swap--> ArcSwap<BundleOutput>
//!                                                  \--> PeerSet::broadcast("reload")
//! ```
//!
//! The HTTP server reads the same `ArcSwap`, so a request sees either the
//! old or the new output table, never a mix.

mod watch_paths;

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use arc_swap::ArcSwap;
use crossbeam::channel::Receiver;

use super::fs::{WatchEvent, Watcher};
use super::ws::PeerSet;
use crate::address::conflict::print_collisions;
use crate::bundle::BundleOutput;
use crate::core::BuildMode;
use crate::logger::{status_error, status_success, status_warning};
use crate::reload::message::RELOAD;
use crate::site::{Generation, Site};
use crate::utils::plural_s;
use crate::{debug, log};

/// Serves one site in memory and keeps it fresh.
pub struct DevLoop {
    shared: Arc<Shared>,
    debounce: Duration,
    watch_files: Vec<PathBuf>,
}

/// State touched from both the watcher task and the HTTP threads.
struct Shared {
    site: Site,
    output: Arc<ArcSwap<BundleOutput>>,
    peers: Arc<PeerSet>,
}

impl DevLoop {
    /// Run the first generation. Nothing is written to disk.
    pub fn new(site: Site, debounce: Duration) -> Result<Self> {
        let start = Instant::now();
        let generation = site
            .generate(BuildMode::DEVELOPMENT)
            .context("initial build failed")?;
        print_collisions(generation.route_map.collisions(), site.routes_dir());
        report_failures(&generation);
        log!(
            "serve";
            "{} file{} ready in {:.2?}",
            generation.output.len(),
            plural_s(generation.output.len()),
            start.elapsed()
        );

        let watch_files = generation.output.watch_files().to_vec();
        Ok(Self {
            shared: Arc::new(Shared {
                site,
                output: Arc::new(ArcSwap::from_pointee(generation.output)),
                peers: Arc::new(PeerSet::new()),
            }),
            debounce,
            watch_files,
        })
    }

    /// Latest good output table, shared with the HTTP server.
    pub fn output(&self) -> Arc<ArcSwap<BundleOutput>> {
        Arc::clone(&self.shared.output)
    }

    /// Connected live-reload peers.
    pub fn peers(&self) -> Arc<PeerSet> {
        Arc::clone(&self.shared.peers)
    }

    /// Regenerate once, swap the snapshot and broadcast `"reload"`.
    ///
    /// If the generation fails, or any page in it fails, the previous
    /// snapshot is kept and nothing is broadcast.
    /// Returns the watch dependencies of the new generation.
    pub async fn rebuild(&self) -> Result<Vec<PathBuf>> {
        Shared::rebuild(Arc::clone(&self.shared)).await
    }

    /// Start watching the routes directory and the current dependencies.
    ///
    /// Every batch triggers a rebuild; dependencies reported by later
    /// generations are added to the watcher. The returned watcher must be
    /// stopped explicitly.
    pub fn start_watcher(&self) -> Result<Watcher> {
        let site = &self.shared.site;
        let paths = watch_paths::collect_watch_paths(
            site.routes_dir(),
            site.output_dir(),
            &self.watch_files,
        );

        let slot: Arc<OnceLock<Watcher>> = Arc::new(OnceLock::new());
        let shared = Arc::clone(&self.shared);
        let handler_slot = Arc::clone(&slot);

        let watcher = Watcher::start(paths, self.debounce, move |batch: Vec<WatchEvent>| {
            let shared = Arc::clone(&shared);
            let slot = Arc::clone(&handler_slot);
            async move {
                describe_batch(&batch);
                let Ok(watch_files) = Shared::rebuild(shared).await else {
                    return;
                };
                if let Some(watcher) = slot.get() {
                    for file in &watch_files {
                        watcher.add(file);
                    }
                }
            }
        })
        .context("failed to start file watcher")?;

        let _ = slot.set(watcher.clone());
        Ok(watcher)
    }

    /// Watch and rebuild until `shutdown` fires.
    pub async fn run(self, shutdown: Receiver<()>) -> Result<()> {
        let watcher = self.start_watcher()?;
        debug!("watch"; "roots: {:?}", watcher.roots());

        loop {
            if shutdown.try_recv().is_ok() || crate::core::is_shutdown() {
                debug!("watch"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        watcher.stop();
        Ok(())
    }
}

impl Shared {
    async fn rebuild(shared: Arc<Self>) -> Result<Vec<PathBuf>> {
        let start = Instant::now();
        let worker = Arc::clone(&shared);
        let result = tokio::task::spawn_blocking(move || {
            worker.site.generate(BuildMode::DEVELOPMENT)
        })
        .await
        .map_err(|e| anyhow!("rebuild task failed: {e}"))
        .and_then(|generation| generation);

        let generation = match result {
            Ok(generation) => generation,
            Err(e) => {
                status_error("rebuild failed", &format!("{e:#}"));
                return Err(e);
            }
        };

        let elapsed = start.elapsed();
        let watch_files = generation.output.watch_files().to_vec();
        if report_failures(&generation) {
            // Keep serving the last good build; dependencies still get watched.
            log!("watch"; "kept previous output");
            return Ok(watch_files);
        }

        shared.output.store(Arc::new(generation.output));
        status_success(&format!("rebuilt in {elapsed:.2?}"));

        // Socket writes block; keep them off the async workers.
        let peers = Arc::clone(&shared.peers);
        match tokio::task::spawn_blocking(move || peers.broadcast(RELOAD)).await {
            Ok(delivered) => {
                debug!("ws"; "reload sent to {} peer{}", delivered, plural_s(delivered));
            }
            Err(e) => log!("ws"; "reload broadcast failed: {e}"),
        }

        Ok(watch_files)
    }
}

/// Report pages left out of a generation. Returns whether any failed.
fn report_failures(generation: &Generation) -> bool {
    let failed = generation.failed_pages();
    if failed == 0 {
        return false;
    }
    let detail = generation
        .page_errors
        .iter()
        .map(ToString::to_string)
        .chain(generation.splice_errors.iter().map(ToString::to_string))
        .collect::<Vec<_>>()
        .join("\n");
    status_warning(&format!("{failed} page{} failed\n{detail}", plural_s(failed)));
    true
}

fn describe_batch(batch: &[WatchEvent]) {
    for event in batch {
        for path in &event.paths {
            debug!("watch"; "{} {}", event.kind.label(), path.display());
        }
    }
}
