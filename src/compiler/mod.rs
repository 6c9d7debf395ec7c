//! Source formats compiled to page HTML.

pub mod markdown;
