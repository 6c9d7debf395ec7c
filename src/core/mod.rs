//! Core types shared across the build and serve paths.

mod mode;
mod state;

pub use mode::BuildMode;
pub use state::{is_shutdown, register_server, request_shutdown, setup_shutdown_handler};
