//! The comment record: a flat field-name to value mapping.

use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap};

/// Routing key correlating a comment with the post or page it was submitted against.
pub const POST_ID_FIELD: &str = "post_id";
/// Display text of the comment.
pub const CONTENT_FIELD: &str = "content";
/// Name older comment files used for [`CONTENT_FIELD`].
pub const LEGACY_COMMENT_FIELD: &str = "comment";

/// One comment, as a mapping from field name to string value.
///
/// Serializes as a plain map so it can be handed to templates directly. Fields are kept and
/// serialized sorted by name, not in the order the file listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentRecord(BTreeMap<String, String>);

impl CommentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    /// The `content` field, or the empty string if the record has none yet.
    pub fn content(&self) -> &str {
        self.get(CONTENT_FIELD).unwrap_or_default()
    }

    /// Removes and returns the routing key. Blank identifiers count as absent.
    pub fn take_post_id(&mut self) -> Option<String> {
        self.0
            .remove(POST_ID_FIELD)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    }

    /// Renames a legacy `comment` field to `content` when no `content` field exists.
    ///
    /// Returns true if the rename happened.
    pub fn apply_legacy_alias(&mut self) -> bool {
        if self.contains(CONTENT_FIELD) {
            return false;
        }
        match self.0.remove(LEGACY_COMMENT_FIELD) {
            Some(comment) => {
                self.0.insert(CONTENT_FIELD.to_string(), comment);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CommentRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        CommentRecord(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a CommentRecord {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
