//! URL to output table key resolution.

use percent_encoding::percent_decode_str;

use crate::bundle::BundleOutput;

/// Resolve a request URL to the key of an output file.
///
/// `/x/` maps to `x/index.html`; `/x` falls back to `x/index.html` when
/// `x` itself is not an output file. Query strings and fragments are
/// ignored, and any `..` segment is rejected.
pub fn resolve_output_key(url: &str, output: &BundleOutput) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(path).decode_utf8().ok()?;

    if decoded.split(['/', '\\']).any(|segment| segment == "..") {
        return None;
    }

    let key = decoded.trim_start_matches('/');
    if key.is_empty() || key.ends_with('/') {
        let index = format!("{key}index.html");
        return output.contains(&index).then_some(index);
    }

    if output.contains(key) {
        return Some(key.to_string());
    }
    let index = format!("{key}/index.html");
    output.contains(&index).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{OutputAsset, OutputFile};

    fn output() -> BundleOutput {
        let mut output = BundleOutput::new();
        for name in ["index.html", "about/index.html", "index-1a2b3c4d.js", "my page/index.html"] {
            output.insert(OutputFile::Asset(OutputAsset {
                file_name: name.into(),
                source: Vec::new(),
                original_file_name: None,
            }));
        }
        output
    }

    #[test]
    fn test_index_resolution() {
        let output = output();
        assert_eq!(resolve_output_key("/", &output).as_deref(), Some("index.html"));
        assert_eq!(resolve_output_key("/about/", &output).as_deref(), Some("about/index.html"));
        assert_eq!(resolve_output_key("/about", &output).as_deref(), Some("about/index.html"));
    }

    #[test]
    fn test_files_and_queries() {
        let output = output();
        assert_eq!(
            resolve_output_key("/index-1a2b3c4d.js?v=1", &output).as_deref(),
            Some("index-1a2b3c4d.js")
        );
        assert_eq!(
            resolve_output_key("/my%20page/", &output).as_deref(),
            Some("my page/index.html")
        );
    }

    #[test]
    fn test_missing_and_traversal() {
        let output = output();
        assert_eq!(resolve_output_key("/nope", &output), None);
        assert_eq!(resolve_output_key("/nope/", &output), None);
        assert_eq!(resolve_output_key("/about/../index.html", &output), None);
        assert_eq!(resolve_output_key("/%2e%2e/index.html", &output), None);
    }
}
