//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Dev server resources (live-reload client)

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};
    use crate::reload::message::{DEV_PATH, RELOAD};

    /// Variables for devclient.js.
    pub struct DevClientVars<'a> {
        pub path: &'a str,
        pub reload: &'a str,
    }

    impl Default for DevClientVars<'_> {
        fn default() -> Self {
            Self {
                path: DEV_PATH,
                reload: RELOAD,
            }
        }
    }

    impl TemplateVars for DevClientVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__DEV_PATH__", self.path)
                .replace("__RELOAD__", self.reload)
        }
    }

    /// Live-reload client: reconnecting websocket, reload on the signal frame.
    pub const DEV_CLIENT_JS: Template<DevClientVars<'static>> =
        Template::new(include_str!("serve/devclient.js"));

    /// The client source with the default endpoint and signal.
    pub fn dev_client_source() -> String {
        DEV_CLIENT_JS.render(&DevClientVars::default())
    }
}
