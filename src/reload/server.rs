//! Websocket upgrade on the HTTP server.
//!
//! The live-reload socket shares the dev server's port: a request to
//! `/__dev` carrying `Upgrade: websocket` is answered with `101` and the
//! raw stream is handed to the peer set.

use anyhow::{Result, anyhow};
use tiny_http::{Header, Request, Response, StatusCode};
use tungstenite::WebSocket;
use tungstenite::handshake::derive_accept_key;
use tungstenite::protocol::Role;

use crate::actor::ws::{PeerId, PeerSet};
use crate::debug;

/// Whether the request asks for a websocket upgrade.
pub fn is_websocket_upgrade(request: &Request) -> bool {
    header(request, "Upgrade").is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
}

/// Complete the handshake and register the connection as a peer.
pub fn accept(request: Request, peers: &PeerSet) -> Result<PeerId> {
    let key = header(&request, "Sec-WebSocket-Key")
        .ok_or_else(|| anyhow!("websocket upgrade without Sec-WebSocket-Key"))?
        .to_string();
    let accept = derive_accept_key(key.trim().as_bytes());

    let response = Response::empty(StatusCode(101))
        .with_header(make_header("Upgrade", "websocket")?)
        .with_header(make_header("Connection", "Upgrade")?)
        .with_header(make_header("Sec-WebSocket-Accept", &accept)?);

    let remote = request.remote_addr().copied();
    let stream = request.upgrade("websocket", response);
    let socket = WebSocket::from_raw_socket(stream, Role::Server, None);

    let id = peers.connect(socket);
    debug!("ws"; "upgraded {:?} as peer {}", remote, id);
    Ok(id)
}

fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|_| anyhow!("invalid header {key}: {value}"))
}
