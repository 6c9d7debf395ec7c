//! `{key}` placeholder templating for layout files.

use std::path::Path;

use anyhow::{Context, Result};

/// Read `file` and replace every `{key}` with its value.
///
/// ```ignore
/// // layouts/base.html: <title>{title}</title><main>{body}</main>
/// let html = template(Path::new("layouts/base.html"), [("title", "Home"), ("body", "<p>hi</p>")])?;
/// ```
pub fn template<'a>(
    file: &Path,
    replacements: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<String> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read template {}", file.display()))?;
    Ok(render(contents, replacements))
}

/// Replace every `{key}` in `contents`.
pub fn render<'a>(
    mut contents: String,
    replacements: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    for (key, value) in replacements {
        let needle = format!("{{{key}}}");
        if contents.contains(&needle) {
            contents = contents.replace(&needle, value);
        }
    }
    contents
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_replaces_all_occurrences() {
        let out = render(
            "<h1>{title}</h1><title>{title}</title>{body}".to_string(),
            [("title", "Hello"), ("body", "<p>x</p>")],
        );
        assert_eq!(out, "<h1>Hello</h1><title>Hello</title><p>x</p>");
    }

    #[test]
    fn test_render_leaves_unknown_keys() {
        let out = render("{title} {missing}".to_string(), [("title", "Hi")]);
        assert_eq!(out, "Hi {missing}");
    }

    #[test]
    fn test_template_reads_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("base.html");
        std::fs::write(&file, "<main>{body}</main>").unwrap();

        let out = template(&file, [("body", "content")]).unwrap();
        assert_eq!(out, "<main>content</main>");
    }

    #[test]
    fn test_template_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(template(&dir.path().join("nope.html"), []).is_err());
    }
}
