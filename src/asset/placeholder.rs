//! Placeholder tokens standing in for a page's not-yet-bundled entry chunk.
//!
//! A page's `<head>` receives `marker(token)`, a module script pointing at
//! `{token}.js`. After bundling, the whole marker is replaced by the real
//! chunk tag, or removed when the page has no scripts.

use rustc_hash::FxHashSet;

/// Token alphabet (URL and filename safe).
const ALPHABET: &[u8] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Token length. 64^6 possible values.
pub const TOKEN_LEN: usize = 6;

/// The markup injected into a page for `token`.
pub fn marker(token: &str) -> String {
    format!(r#"<script type="module" src="{}"></script>"#, import_name(token))
}

/// File name the marker refers to.
pub fn import_name(token: &str) -> String {
    format!("{token}.js")
}

/// Issues tokens that never repeat within one generator.
#[derive(Debug)]
pub struct Placeholders {
    rng: fastrand::Rng,
    issued: FxHashSet<String>,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self::new()
    }
}

impl Placeholders {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
            issued: FxHashSet::default(),
        }
    }

    /// Deterministic tokens for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            issued: FxHashSet::default(),
        }
    }

    /// A fresh token, distinct from every token issued before.
    pub fn next_token(&mut self) -> String {
        loop {
            let token: String = (0..TOKEN_LEN)
                .map(|_| ALPHABET[self.rng.usize(..ALPHABET.len())] as char)
                .collect();
            if self.issued.insert(token.clone()) {
                return token;
            }
        }
    }

    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}
