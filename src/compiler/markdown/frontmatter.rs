//! Front matter extraction.
//!
//! Two delimiters are recognized at the very start of the document:
//!
//! ```text
//! ---                      +++
//! title: "Hello"           title = "Hello"
//! layout: post             layout = "post"
//! ---                      +++
//! ```
//!
//! `---` blocks are simple `key: value` lines (not full YAML); `+++`
//! blocks are TOML.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front matter is missing")]
    Missing,

    #[error("front matter opened with `{0}` is never closed")]
    Unterminated(&'static str),

    #[error("invalid front matter line {line}: `{text}`")]
    InvalidLine { line: usize, text: String },

    #[error("invalid TOML front matter")]
    Toml(#[from] toml::de::Error),

    #[error("front matter has no `title`")]
    MissingTitle,
}

/// Parsed page metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub layout: Option<String>,
    /// Every key, including `title` and `layout`
    pub fields: BTreeMap<String, String>,
}

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    fn from_fields(fields: BTreeMap<String, String>) -> Result<Self, FrontMatterError> {
        let title = fields
            .get("title")
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .ok_or(FrontMatterError::MissingTitle)?
            .to_string();
        let layout = fields.get("layout").cloned().filter(|l| !l.is_empty());
        Ok(Self {
            title,
            layout,
            fields,
        })
    }
}

/// Split `content` into front matter and body.
pub fn extract(content: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();

    let (delimiter, is_toml) = if trimmed.starts_with("---") {
        ("---", false)
    } else if trimmed.starts_with("+++") {
        ("+++", true)
    } else {
        return Err(FrontMatterError::Missing);
    };

    let rest = &trimmed[3..];
    let closing = format!("\n{delimiter}");
    let end = rest
        .find(&closing)
        .ok_or(FrontMatterError::Unterminated(delimiter))?;

    let raw = &rest[..end];
    let body = rest[end + closing.len()..]
        .trim_start_matches(['\r', '\n']);

    let fields = if is_toml {
        parse_toml(raw)?
    } else {
        parse_lines(raw)?
    };
    Ok((FrontMatter::from_fields(fields)?, body))
}

/// Parse `key: value` lines. Blank lines and `#` comments are skipped.
///
/// `raw` starts right after the opening delimiter, so line numbers match
/// the document.
fn parse_lines(raw: &str) -> Result<BTreeMap<String, String>, FrontMatterError> {
    let mut fields = BTreeMap::new();
    for (i, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(FrontMatterError::InvalidLine {
                line: i + 1,
                text: line.to_string(),
            });
        };
        fields.insert(key.trim().to_string(), unquote(value.trim()).to_string());
    }
    Ok(fields)
}

fn parse_toml(raw: &str) -> Result<BTreeMap<String, String>, FrontMatterError> {
    let table: toml::Table = toml::from_str(raw)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
