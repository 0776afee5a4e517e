//! Encoding labels into a single persisted field.
//!
//! `"` and `\` are escaped with a backslash, and the persisted form wraps the
//! escaped label in double quotes so the field is self-delimiting.

use thiserror::Error;

/// Errors decoding a persisted label field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// The field is not wrapped in double quotes.
    #[error("label field is not quoted: {field}")]
    Unquoted { field: String },

    /// A quote inside the field was not escaped.
    #[error("unescaped quote in label field: {field}")]
    StrayQuote { field: String },

    /// The field ends in the middle of an escape.
    #[error("dangling escape in label field: {field}")]
    DanglingEscape { field: String },
}

/// Escapes every `"` and `\` in `label`.
pub fn escape_label(label: &str) -> String {
    let extra = label.chars().filter(|c| matches!(c, '"' | '\\')).count();
    let mut out = String::with_capacity(label.len() + extra);
    for c in label.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Reverses [`escape_label`]: every backslash escapes the character after it.
pub fn unescape_label(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut in_escape = false;
    for c in escaped.chars() {
        if !in_escape && c == '\\' {
            in_escape = true;
            continue;
        }
        out.push(c);
        in_escape = false;
    }
    out
}

/// Returns the persisted form of `label`.
pub fn quote_label(label: &str) -> String {
    format!("\"{}\"", escape_label(label))
}

/// Decodes a field written by [`quote_label`].
pub fn unquote_label(field: &str) -> Result<String, LabelError> {
    let inner = field
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| LabelError::Unquoted {
            field: field.to_string(),
        })?;

    let mut in_escape = false;
    for c in inner.chars() {
        match (in_escape, c) {
            (false, '\\') => in_escape = true,
            (false, '"') => {
                return Err(LabelError::StrayQuote {
                    field: field.to_string(),
                });
            }
            _ => in_escape = false,
        }
    }
    if in_escape {
        return Err(LabelError::DanglingEscape {
            field: field.to_string(),
        });
    }

    Ok(unescape_label(inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 9] = [
        "th\"i\"s", "\"", "\\", "\\is\\", "\"\\\"", "a", "test", "", "ünï \u{1F600}",
    ];

    #[test]
    fn escape_roundtrip_is_identity() {
        for label in LABELS {
            assert_eq!(unescape_label(&escape_label(label)), label);
        }
    }

    #[test]
    fn quote_roundtrip_is_identity() {
        for label in LABELS {
            assert_eq!(unquote_label(&quote_label(label)).unwrap(), label);
        }
    }

    #[test]
    fn escape_prefixes_quotes_and_backslashes() {
        assert_eq!(escape_label(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(quote_label("x\"y"), r#""x\"y""#);
    }

    #[test]
    fn unquote_rejects_malformed_fields() {
        assert_eq!(
            unquote_label("plain"),
            Err(LabelError::Unquoted {
                field: "plain".to_string()
            })
        );
        assert!(matches!(
            unquote_label("\""),
            Err(LabelError::Unquoted { .. })
        ));
        assert!(matches!(
            unquote_label(r#""a"b""#),
            Err(LabelError::StrayQuote { .. })
        ));
        assert!(matches!(
            unquote_label(r#""a\""#),
            Err(LabelError::DanglingEscape { .. })
        ));
    }
}
