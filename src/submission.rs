//! Writing new comment files.
//!
//! This is the file-producing half of a comment form handler: it takes the submitted form fields
//! and renders them in the whole-file YAML layout the store reads back. Receiving the form post
//! and delivering the result (mail, a pull request, a drop directory) belong to the host.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value as YamlValue};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{error::CommentError, record::POST_ID_FIELD};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const FILE_STAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
pub const DEFAULT_NAME: &str = "Anonymous";

/// Control characters, space, anything outside printable ASCII, and characters reserved in file
/// names on common platforms.
static UNSAFE_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:[^\x21-\x7e]|[\\/:*?"<>|])+"#).expect("filename pattern is valid")
});

/// Cleans a commenter's display name: no control whitespace, no angle brackets or double quotes.
pub fn filter_name(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .map(|c| match c {
            '"' => '\'',
            '<' => '[',
            '>' => ']',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Strips characters that could break out of an address header.
pub fn filter_email(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t' | '"' | ',' | '<' | '>'))
        .collect()
}

/// Replaces every run of unsafe file-name characters with `replacement`.
pub fn filter_filename(filename: &str, replacement: &str) -> String {
    UNSAFE_FILENAME
        .replace_all(filename, regex::NoExpand(replacement))
        .into_owned()
}

/// One submitted comment, fields kept in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSubmission {
    post_id: String,
    fields: Vec<(String, String)>,
    extension: String,
}

impl CommentSubmission {
    pub fn new(post_id: impl Into<String>) -> Self {
        CommentSubmission {
            post_id: post_id.into(),
            fields: Vec::new(),
            extension: "yaml".to_string(),
        }
    }

    /// Builds a submission from raw form pairs. The `post_id` pair becomes the routing key.
    pub fn from_form<I, K, V>(form: I) -> Result<Self, CommentError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut post_id = None;
        let mut fields = Vec::new();
        for (key, value) in form {
            let (key, value) = (key.into(), value.into());
            if key == POST_ID_FIELD {
                post_id = Some(value);
            } else {
                fields.push((key, value));
            }
        }
        let post_id = post_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(CommentError::MissingIdentifier)?;
        Ok(CommentSubmission {
            post_id,
            fields,
            extension: "yaml".to_string(),
        })
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// File extension of the written file, which picks the body converter at build time.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// The last non-empty value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    pub fn commenter_name(&self) -> String {
        self.get("name")
            .map(filter_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string())
    }

    pub fn commenter_email(&self) -> Option<String> {
        self.get("email")
            .map(filter_email)
            .filter(|email| !email.is_empty())
    }

    /// Renders the comment file: `post_id`, `date`, then the submitted fields in order.
    ///
    /// `name` and `email` are stored filtered; every other value is stored as submitted.
    pub fn to_yaml(&self, submitted_at: NaiveDateTime) -> Result<String, CommentError> {
        let mut doc = Mapping::new();
        doc.insert(
            YamlValue::from(POST_ID_FIELD),
            YamlValue::from(self.post_id.as_str()),
        );
        doc.insert(
            YamlValue::from("date"),
            YamlValue::from(submitted_at.format(DATE_FORMAT).to_string()),
        );
        doc.insert(YamlValue::from("name"), YamlValue::from(self.commenter_name()));
        if let Some(email) = self.commenter_email() {
            doc.insert(YamlValue::from("email"), YamlValue::from(email));
        }
        for (key, value) in self.fields.iter() {
            if matches!(key.as_str(), "name" | "email" | "date" | POST_ID_FIELD) {
                continue;
            }
            doc.insert(YamlValue::from(key.as_str()), YamlValue::from(value.as_str()));
        }
        Ok(serde_yaml::to_string(&doc)?)
    }

    pub fn file_name(&self, submitted_at: NaiveDateTime) -> String {
        let stem = filter_filename(&self.post_id, "-");
        let stem = stem.trim_matches('-');
        let stamp = submitted_at.format(FILE_STAMP_FORMAT);
        if stem.is_empty() {
            format!("comment-{stamp}.{}", self.extension)
        } else {
            format!("{stem}-comment-{stamp}.{}", self.extension)
        }
    }

    /// Writes the comment into `dir` (created if needed). Never overwrites an existing file.
    pub fn write_to<P: AsRef<Path>>(
        &self,
        dir: P,
        submitted_at: NaiveDateTime,
    ) -> Result<PathBuf, CommentError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name(submitted_at));
        let yaml = self.to_yaml(submitted_at)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    CommentError::Io(format!("Comment file {path:?} already exists"))
                }
                _ => CommentError::from(e),
            })?;
        file.write_all(yaml.as_bytes())?;
        tracing::info!("Wrote comment for {} to {:?}", self.post_id, path);
        Ok(path)
    }

    /// [`write_to`](Self::write_to) stamped with the current local time.
    pub fn write_now<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, CommentError> {
        self.write_to(dir, chrono::Local::now().naive_local())
    }
}
