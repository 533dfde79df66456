//! Comment file parsing.
//!
//! A comment file comes in one of two physical layouts:
//!
//! ```text
//! ---                      post_id: /2011/05/hello
//! post_id: /2011/05/hello  name: Jo
//! name: Jo                 comment: |
//! ---                        Whole-file YAML, the
//! Body text becomes          layout older comment
//! the `content` field.       files were written in.
//! ```
//!
//! The left form is a front-matter block followed by a body; anything that lacks the two
//! delimiter lines is read as a single YAML document (the right form), which must then carry its
//! own `content` (or legacy `comment`) field.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value as YamlValue;
use std::{fs, path::Path};

use crate::{
    error::CommentError,
    record::{CommentRecord, CONTENT_FIELD},
};

/// A leading `---` line, the metadata, and a closing `---` line. Delimiter lines may carry
/// trailing whitespace (including a CR) but nothing else.
static FRONTMATTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)\A---[ \t\r]*\n(?P<metadata>.*?)^---[ \t\r]*$\n?")
        .expect("front-matter pattern is valid")
});

/// Which physical layout a comment file used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Delimited metadata block followed by a body.
    FrontMatter,
    /// The whole file is one YAML document.
    Document,
}

/// A parsed but not yet converted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub layout: Layout,
    pub fields: CommentRecord,
}

/// Parses raw file bytes into a record. Pure function of its input.
pub fn parse(raw: &[u8]) -> Result<RawRecord, CommentError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| CommentError::Parse(format!("File is not valid UTF-8: {e}")))?;
    parse_str(text)
}

pub fn parse_str(text: &str) -> Result<RawRecord, CommentError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    match split_frontmatter(text) {
        Some((metadata, body)) => {
            let mut fields = yaml_to_record(metadata)?;
            if !fields.apply_legacy_alias() {
                fields.insert(CONTENT_FIELD, body);
            }
            Ok(RawRecord {
                layout: Layout::FrontMatter,
                fields,
            })
        }
        None => {
            let mut fields = yaml_to_record(text)?;
            fields.apply_legacy_alias();
            if !fields.contains(CONTENT_FIELD) {
                return Err(CommentError::MissingContent);
            }
            Ok(RawRecord {
                layout: Layout::Document,
                fields,
            })
        }
    }
}

/// Reads and parses one comment file.
pub fn read_record<P: AsRef<Path>>(path: P) -> Result<RawRecord, CommentError> {
    tracing::debug!("Reading {:?}", path.as_ref());
    let raw = fs::read(path)?;
    parse(&raw)
}

/// Splits `text` into `(metadata, body)` when it opens with a front-matter block.
pub fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let captures = FRONTMATTER.captures(text)?;
    let metadata = captures.name("metadata").map_or("", |m| m.as_str());
    let end = captures.get(0).map_or(0, |m| m.end());
    Some((metadata, &text[end..]))
}

fn yaml_to_record(yaml: &str) -> Result<CommentRecord, CommentError> {
    if yaml.trim().is_empty() {
        return Ok(CommentRecord::new());
    }
    match serde_yaml::from_str::<YamlValue>(yaml)? {
        YamlValue::Null => Ok(CommentRecord::new()),
        YamlValue::Mapping(mapping) => {
            let mut record = CommentRecord::new();
            for (key, value) in mapping.iter() {
                record.insert(flatten_value(key)?, flatten_value(value)?);
            }
            Ok(record)
        }
        other => Err(CommentError::Parse(format!(
            "Expected a key/value mapping, found {}",
            kind_name(&other)
        ))),
    }
}

/// Renders a YAML value as the string stored in a [`CommentRecord`].
///
/// Scalars keep their textual form, null becomes the empty string, and collections are kept as
/// compact YAML text.
pub fn flatten_value(value: &YamlValue) -> Result<String, CommentError> {
    Ok(match value {
        YamlValue::Null => String::new(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::String(s) => s.clone(),
        YamlValue::Tagged(tagged) => flatten_value(&tagged.value)?,
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
            serde_yaml::to_string(value)?.trim_end().to_string()
        }
    })
}

fn kind_name(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_frontmatter_splits_metadata_from_body() {
        let raw = "---\npost_id: /2011/05/hello\nname: Jo\n---\nNice post!\n\nThanks.\n";
        let parsed = parse(raw.as_bytes()).unwrap();
        assert_eq!(parsed.layout, Layout::FrontMatter);
        assert_eq!(parsed.fields.get("post_id"), Some("/2011/05/hello"));
        assert_eq!(parsed.fields.get("name"), Some("Jo"));
        assert_eq!(parsed.fields.content(), "Nice post!\n\nThanks.\n");
    }

    #[test]
    fn test_delimiters_allow_trailing_whitespace_and_crlf() {
        let raw = "---  \r\npost_id: a\r\n--- \t\r\nbody\r\n";
        let parsed = parse_str(raw).unwrap();
        assert_eq!(parsed.layout, Layout::FrontMatter);
        assert_eq!(parsed.fields.get("post_id"), Some("a"));
        assert_eq!(parsed.fields.content(), "body\r\n");
    }

    #[test]
    fn test_delimiter_must_be_whole_line() {
        // "----" is not a delimiter, so this whole file is read as YAML and has no content.
        let raw = "---\npost_id: a\n----\nbody\n";
        assert!(parse_str(raw).is_err());
    }

    #[test]
    fn test_empty_metadata_block_and_empty_body() {
        let parsed = parse_str("---\n---\n").unwrap();
        assert_eq!(parsed.layout, Layout::FrontMatter);
        assert_eq!(parsed.fields.content(), "");
        assert_eq!(parsed.fields.len(), 1);
    }

    #[test]
    fn test_multiline_metadata_values() {
        let raw = "---\npost_id: x\nbio: |\n  line one\n  line two\n---\nhi";
        let parsed = parse_str(raw).unwrap();
        assert_eq!(parsed.fields.get("bio"), Some("line one\nline two\n"));
        assert_eq!(parsed.fields.content(), "hi");
    }

    #[test]
    fn test_frontmatter_legacy_comment_field_becomes_content() {
        let raw = "---\npost_id: x\ncomment: from metadata\n---\nignored body\n";
        let parsed = parse_str(raw).unwrap();
        assert_eq!(parsed.fields.content(), "from metadata");
        assert!(!parsed.fields.contains("comment"));
    }

    #[test]
    fn test_body_replaces_metadata_content() {
        let raw = "---\npost_id: x\ncontent: stale\n---\nfresh\n";
        let parsed = parse_str(raw).unwrap();
        assert_eq!(parsed.fields.content(), "fresh\n");
    }

    #[test]
    fn test_whole_file_document_mode() {
        let raw = "post_id: /about\ndate: 2011-05-01 12:00\nname: 'O''Brien'\ncomment: 'Hello there'\n";
        let parsed = parse_str(raw).unwrap();
        assert_eq!(parsed.layout, Layout::Document);
        assert_eq!(parsed.fields.get("name"), Some("O'Brien"));
        assert_eq!(parsed.fields.get("date"), Some("2011-05-01 12:00"));
        assert_eq!(parsed.fields.content(), "Hello there");
        assert!(!parsed.fields.contains("comment"));
    }

    #[test]
    fn test_document_mode_without_content_is_an_error() {
        let raw = "post_id: /about\nname: Jo\n";
        assert_eq!(parse_str(raw), Err(CommentError::MissingContent));
    }

    #[test]
    fn test_document_that_is_not_a_mapping() {
        let err = parse_str("just some words").unwrap_err();
        assert!(matches!(err, CommentError::Parse(ref msg) if msg.contains("a string")));
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let err = parse_str("---\npost_id: [unclosed\n---\nbody\n").unwrap_err();
        assert!(matches!(err, CommentError::Parse(_)));

        let err = parse_str("post_id: a\n  bad: indentation: here\n").unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let err = parse(&[0x2d, 0x2d, 0x2d, 0x0a, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, CommentError::Parse(_)));
    }

    #[test]
    fn test_scalar_and_collection_flattening() {
        let raw = "---\npost_id: 42\napproved: true\nscore: 1.5\nempty:\ntags: [a, b]\n---\n";
        let fields = parse_str(raw).unwrap().fields;
        assert_eq!(fields.get("post_id"), Some("42"));
        assert_eq!(fields.get("approved"), Some("true"));
        assert_eq!(fields.get("score"), Some("1.5"));
        assert_eq!(fields.get("empty"), Some(""));
        assert_eq!(fields.get("tags"), Some("- a\n- b"));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let parsed = parse_str("\u{feff}---\npost_id: a\n---\nbody").unwrap();
        assert_eq!(parsed.layout, Layout::FrontMatter);
    }
}
