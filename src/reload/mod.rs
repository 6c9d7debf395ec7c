//! Live reload over a websocket.
//!
//! The wire protocol is a single text frame, `"reload"`, sent from the
//! dev server to every connected browser after a successful rebuild.
//!
//! - `message` - Endpoint path and signal frame
//! - `server` - `/__dev` upgrade handshake

pub mod message;
pub mod server;
