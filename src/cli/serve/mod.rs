//! Development server with live reload.
//!
//! ```text
//! tiny_http ──GET──> ArcSwap<BundleOutput> (in memory, never written)
//!     └──/__dev upgrade──> PeerSet <──"reload"── DevLoop (tokio thread)
//! ```

mod lifecycle;
mod path;
mod response;

use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use crossbeam::channel;
use tiny_http::{Method, Request, Server};

use crate::actor::{DevLoop, PeerSet};
use crate::bundle::BundleOutput;
use crate::config::SiteConfig;
use crate::core::is_shutdown;
use crate::reload::message::is_dev_path;
use crate::reload::server as ws_server;
use crate::site::Site;
use crate::{debug, log};

/// Request handler threads.
const REQUEST_THREADS: usize = 4;

/// Serve the site described by `config` until Ctrl+C.
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    let site = Site::from_config(config)?;
    let dev = DevLoop::new(site, config.serve.debounce())?;
    let output = dev.output();
    let peers = dev.peers();

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);

    let handle = lifecycle::spawn_dev_loop(dev, shutdown_rx);
    run_request_loop(&server, &output, &peers)?;
    lifecycle::wait_for_shutdown(handle);
    Ok(())
}

fn run_request_loop(
    server: &Server,
    output: &Arc<ArcSwap<BundleOutput>>,
    peers: &Arc<PeerSet>,
) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let output = Arc::clone(output);
        let peers = Arc::clone(peers);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &output, &peers) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, output: &ArcSwap<BundleOutput>, peers: &PeerSet) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    if ws_server::is_websocket_upgrade(&request) {
        if is_dev_path(request.url()) {
            ws_server::accept(request, peers)?;
            return Ok(());
        }
        debug!("serve"; "refusing upgrade for {}", request.url());
        return response::respond_not_found(request);
    }

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    // One snapshot per request: a concurrent swap is not observed halfway.
    let snapshot = output.load();
    match path::resolve_output_key(request.url(), &snapshot) {
        Some(key) => response::respond_output(request, &key, &snapshot),
        None => response::respond_not_found(request),
    }
}
