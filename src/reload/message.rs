//! Live-reload protocol constants.

/// Text frame telling the browser to reload the page.
pub const RELOAD: &str = "reload";

/// Request path upgraded to the live-reload websocket.
pub const DEV_PATH: &str = "/__dev";

/// Whether a request URL targets the live-reload endpoint.
///
/// Query strings are ignored.
pub fn is_dev_path(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/') == DEV_PATH
}
