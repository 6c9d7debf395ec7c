//! Live-reload peer set.
//!
//! Broadcast-only: peers are written to, never read from. A peer whose
//! send fails is dropped; the others are unaffected.
//!
//! ```text
//! /__dev upgrade --connect--> PeerSet <--broadcast("reload")-- DevLoop
//! ```

use std::io::{Read, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use crate::debug;

pub type PeerId = u64;

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("websocket send failed: {0}")]
    Send(#[from] tungstenite::Error),
    #[error("peer closed")]
    Closed,
}

/// One connected live-reload client.
pub trait Peer {
    fn send_text(&mut self, text: &str) -> Result<(), PeerError>;
}

impl<S: Read + Write> Peer for WebSocket<S> {
    fn send_text(&mut self, text: &str) -> Result<(), PeerError> {
        self.send(Message::Text(text.to_owned().into()))?;
        Ok(())
    }
}

/// Currently connected peers.
#[derive(Default)]
pub struct PeerSet {
    peers: Mutex<FxHashMap<PeerId, Box<dyn Peer + Send>>>,
    next_id: AtomicU64,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, peer: impl Peer + Send + 'static) -> PeerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut peers = self.peers.lock();
        peers.insert(id, Box::new(peer));
        debug!("ws"; "peer {} connected (total: {})", id, peers.len());
        id
    }

    /// Remove a peer. Returns whether it was still connected.
    pub fn disconnect(&self, id: PeerId) -> bool {
        let removed = self.peers.lock().remove(&id).is_some();
        if removed {
            debug!("ws"; "peer {} disconnected", id);
        }
        removed
    }

    /// Send `text` to every peer. Returns how many received it.
    pub fn broadcast(&self, text: &str) -> usize {
        let mut peers = self.peers.lock();
        if peers.is_empty() {
            debug!("ws"; "no peers connected");
            return 0;
        }

        peers.retain(|id, peer| match peer.send_text(text) {
            Ok(()) => true,
            Err(e) => {
                debug!("ws"; "peer {} dropped: {}", id, e);
                false
            }
        });
        debug!("ws"; "broadcast '{}' to {} peer(s)", text, peers.len());
        peers.len()
    }

    pub fn len(&self) -> usize {
        self.peers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.lock().is_empty()
    }
}

impl std::fmt::Debug for PeerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerSet").field("peers", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;
    use tungstenite::protocol::Role;

    #[derive(Clone, Default)]
    struct Recording(Arc<Mutex<Vec<String>>>);

    impl Peer for Recording {
        fn send_text(&mut self, text: &str) -> Result<(), PeerError> {
            self.0.lock().push(text.to_string());
            Ok(())
        }
    }

    struct Gone;

    impl Peer for Gone {
        fn send_text(&mut self, _: &str) -> Result<(), PeerError> {
            Err(PeerError::Closed)
        }
    }

    #[test]
    fn test_broadcast_reaches_every_peer() {
        let peers = PeerSet::new();
        let a = Recording::default();
        let b = Recording::default();
        peers.connect(a.clone());
        peers.connect(b.clone());

        assert_eq!(peers.broadcast("reload"), 2);
        assert_eq!(*a.0.lock(), vec!["reload"]);
        assert_eq!(*b.0.lock(), vec!["reload"]);
    }

    #[test]
    fn test_failed_peer_is_dropped_alone() {
        let peers = PeerSet::new();
        let ok = Recording::default();
        peers.connect(ok.clone());
        peers.connect(Gone);
        assert_eq!(peers.len(), 2);

        assert_eq!(peers.broadcast("reload"), 1);
        assert_eq!(peers.len(), 1);

        assert_eq!(peers.broadcast("reload"), 1);
        assert_eq!(ok.0.lock().len(), 2);
    }

    #[test]
    fn test_disconnect() {
        let peers = PeerSet::new();
        let rec = Recording::default();
        let id = peers.connect(rec.clone());

        assert!(peers.disconnect(id));
        assert!(!peers.disconnect(id));
        assert!(peers.is_empty());
        assert_eq!(peers.broadcast("reload"), 0);
        assert!(rec.0.lock().is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let peers = PeerSet::new();
        let a = peers.connect(Recording::default());
        let b = peers.connect(Recording::default());
        assert_ne!(a, b);
    }

    #[test]
    fn test_websocket_peer_writes_text_frame() {
        let mut ws = WebSocket::from_raw_socket(Cursor::new(Vec::new()), Role::Server, None);
        ws.send_text("reload").unwrap();

        let written = ws.get_ref().get_ref();
        assert_eq!(written[0], 0x81);
        assert_eq!(written[1], 6);
        assert_eq!(&written[2..], b"reload");
    }
}
