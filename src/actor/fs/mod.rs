//! Filesystem watcher with directory subsumption and debounced batches.
//!
//! Architecture:
//! ```text
//! notify (recursive, one per root) → WatchEvent → channel → Debouncer → on_batch
//! ```
//!
//! Only one batch is dispatched at a time: while `on_batch` runs, new
//! events wait in the channel and form the next batch.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher as _};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::utils::path::normalize_path;
use crate::{debug, log};

// Pure timing and buffering.
mod debouncer;
// Shared fs event types.
mod types;
// Ancestor/descendant bookkeeping for watch roots.
mod watch_roots;


use debouncer::Debouncer;
use watch_roots::WatchRoots;

pub use debouncer::DEBOUNCE;
pub use types::{ChangeKind, WatchEvent};
pub use watch_roots::RootChange;

/// Future returned by a batch handler.
pub type BatchFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Receives every debounced batch.
pub type BatchHandler = Arc<dyn Fn(Vec<WatchEvent>) -> BatchFuture + Send + Sync>;

/// Closed once `stop()` has run; checked under the lock before every dispatch.
type Gate = Arc<Mutex<bool>>;

/// Handle to a running watcher. Clones share the same watches.
///
/// Must be started inside a tokio runtime.
#[derive(Clone)]
pub struct Watcher {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    open: Gate,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct State {
    notify: Option<RecommendedWatcher>,
    roots: WatchRoots,
}

impl Watcher {
    /// Watch `paths` and deliver debounced batches to `on_batch`.
    ///
    /// Paths that cannot be watched are logged and skipped.
    pub fn start<P, F, Fut>(
        paths: impl IntoIterator<Item = P>,
        debounce: Duration,
        on_batch: F,
    ) -> notify::Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(Vec<WatchEvent>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: BatchHandler =
            Arc::new(move |batch: Vec<WatchEvent>| -> BatchFuture { Box::pin(on_batch(batch)) });

        let (tx, rx) = mpsc::unbounded_channel();
        let notify = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    if let Some(event) = WatchEvent::from_notify(&event) {
                        let _ = tx.send(event);
                    }
                }
                Err(e) => log!("watch"; "notify error: {}", e),
            }
        })?;

        let open: Gate = Arc::new(Mutex::new(true));
        let task = tokio::spawn(dispatch_loop(
            rx,
            Debouncer::new(debounce),
            Arc::clone(&open),
            handler,
        ));

        let watcher = Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    notify: Some(notify),
                    roots: WatchRoots::new(),
                }),
                open,
                task: Mutex::new(Some(task)),
            }),
        };

        for path in paths {
            watcher.add(path.as_ref());
        }
        Ok(watcher)
    }

    /// Watch one more path. Files are watched through their directory.
    ///
    /// Returns `None` after `stop()` or when the watch could not be
    /// started (logged).
    pub fn add(&self, path: &Path) -> Option<RootChange> {
        let dir = watch_dir(path);

        let mut guard = self.inner.state.lock();
        let state = &mut *guard;
        let notify = state.notify.as_mut()?;

        let change = state.roots.add(&dir);
        match &change {
            RootChange::Covered { by } => {
                debug!("watch"; "{} covered by {}", dir.display(), by.display());
            }
            RootChange::Attached { path, replaced } => {
                // Replaced roots go first: inotify shares descriptors per
                // inode, so unwatching a child after the parent is watched
                // drops the parent's coverage of that subtree.
                for old in replaced {
                    if let Err(e) = notify.unwatch(old) {
                        debug!("watch"; "unwatch {}: {}", old.display(), e);
                    }
                }
                if let Err(e) = notify.watch(path, RecursiveMode::Recursive) {
                    log!("watch"; "cannot watch {}: {}", path.display(), e);
                    for old in replaced {
                        if let Err(e) = notify.watch(old, RecursiveMode::Recursive) {
                            log!("watch"; "cannot restore {}: {}", old.display(), e);
                        }
                    }
                    state.roots.undo(&change);
                    return None;
                }
                debug!("watch"; "watching {}", path.display());
            }
        }
        Some(change)
    }

    /// Currently watched roots.
    pub fn roots(&self) -> Vec<PathBuf> {
        self.inner.state.lock().roots.roots().to_vec()
    }

    /// Stop every watch. No batch is dispatched after this returns.
    ///
    /// Safe to call more than once, from any thread, including while a
    /// batch is being handled.
    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn is_stopped(&self) -> bool {
        !*self.inner.open.lock()
    }
}

impl Inner {
    fn stop(&self) {
        *self.open.lock() = false;

        if let Some(task) = self.task.lock().take() {
            task.abort();
        }

        let mut state = self.state.lock();
        // Dropping the notify watcher ends every underlying watch.
        state.notify = None;
        state.roots.clear();
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Directory to watch for `path`: itself if it is a directory, otherwise
/// its parent.
fn watch_dir(path: &Path) -> PathBuf {
    let path = normalize_path(path);
    if path.is_dir() {
        return path;
    }
    match path.parent() {
        Some(parent) => parent.to_path_buf(),
        None => path,
    }
}

/// Buffer incoming events and dispatch a batch once the window passes
/// without new events.
async fn dispatch_loop(
    mut rx: mpsc::UnboundedReceiver<WatchEvent>,
    mut debouncer: Debouncer,
    open: Gate,
    on_batch: BatchHandler,
) {
    loop {
        let deadline = debouncer.deadline();
        tokio::select! {
            biased;
            event = rx.recv() => match event {
                Some(event) => debouncer.push(event),
                None => break,
            },
            _ = sleep_until(deadline), if deadline.is_some() => {
                let batch = debouncer.take();
                let dispatch = {
                    let open = open.lock();
                    if !*open {
                        break;
                    }
                    debug!("watch"; "dispatching {} event(s)", batch.len());
                    on_batch(batch)
                };
                dispatch.await;
            }
        }
    }
}

async fn sleep_until(deadline: Option<tokio::time::Instant>) {
    if let Some(deadline) = deadline {
        tokio::time::sleep_until(deadline).await;
    }
}
