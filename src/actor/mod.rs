//! Dev-mode machinery.
//!
//! ```text
//! fs::Watcher --batch--> coordinator::DevLoop --"reload"--> ws::PeerSet
//!  (debounce)               (rebuild, swap)                  (broadcast)
//! ```
//!
//! - `fs` - File system watcher with subsumption and debouncing
//! - `ws` - Live-reload peers
//! - `coordinator` - Wires the watcher to rebuilds and broadcasts

pub mod coordinator;
pub mod fs;
pub mod ws;

pub use coordinator::DevLoop;
pub use fs::Watcher;
pub use ws::PeerSet;
