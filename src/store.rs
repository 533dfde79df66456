//! The comment store: discovery, parsing, conversion and grouping of every comment file in a
//! site, computed once per build.
//!
//! ## Discovery
//!
//! Every regular file below a directory named [`DEFAULT_COMMENTS_DIR`] (or the configured
//! [`DiscoveryOptions::dir_name`]) is a candidate, at any depth and however many such directories
//! the site has:
//!
//! ```text
//! site/
//!   ├── _comments/
//!   │   ├── 2011-05-01-hello-1.yaml
//!   │   └── 2011-05-01-hello-2.txt
//!   └── blog/
//!       └── _comments/
//!           └── archive/
//!               └── old.html
//! ```
//!
//! Candidate paths are sorted as plain strings before any of them is read, so the order of
//! comments within a [`CommentIndex`] group is the path order, independent of timestamps or
//! directory listing order.
//!
//! ## Lifecycle
//!
//! A [`CommentStore`] starts [`StoreState::Unbuilt`]. The first lookup builds the index and moves
//! it to [`StoreState::Built`], where it stays: later lookups never touch the filesystem again,
//! so every read within one build sees the same snapshot.

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};

use crate::{
    codec::{frontmatter, ConverterRegistry},
    error::CommentError,
    record::{CommentRecord, CONTENT_FIELD},
};

/// Directory name that marks comment storage.
pub const DEFAULT_COMMENTS_DIR: &str = "_comments";

/// Which files count as comment files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Name of the directories holding comments. Matched case-sensitively.
    pub dir_name: String,
    /// Descend into dot-directories and read dot-files.
    pub include_hidden: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        DiscoveryOptions {
            dir_name: DEFAULT_COMMENTS_DIR.to_string(),
            include_hidden: false,
        }
    }
}

/// A comment file that was left out of the index, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: CommentError,
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// All comments of a site, grouped by the identifier of the post or page they belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentIndex {
    groups: BTreeMap<String, Vec<CommentRecord>>,
    skipped: Vec<SkippedFile>,
}

impl CommentIndex {
    /// The comments for `identifier` in discovery order. Unknown identifiers yield an empty slice.
    pub fn get(&self, identifier: &str) -> &[CommentRecord] {
        self.groups
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CommentRecord])> {
        self.groups
            .iter()
            .map(|(id, group)| (id.as_str(), group.as_slice()))
    }

    /// Number of identifiers with at least one comment.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_comments(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Files that were discovered but could not be turned into comments.
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    fn push(&mut self, identifier: String, record: CommentRecord) {
        self.groups.entry(identifier).or_default().push(record);
    }
}

/// Lists every candidate comment file below `root`, sorted by path.
pub fn discover<P: AsRef<Path>>(root: P, options: &DiscoveryOptions) -> Vec<PathBuf> {
    fn is_hidden(entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
    }

    let root = root.as_ref();
    let dir_name = options.dir_name.as_str();
    let in_comments_dir = |path: &Path| {
        path.strip_prefix(root)
            .ok()
            .and_then(Path::parent)
            .map(|parent| parent.components().any(|c| c.as_os_str() == dir_name))
            .unwrap_or(false)
    };

    let mut sorted_files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || options.include_hidden || !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                let e = CommentError::from(e);
                tracing::warn!("Skipping unreadable entry during comment discovery: {e}");
                None
            }
        })
        .filter(|p| in_comments_dir(p) && p.is_file())
        .collect::<Vec<PathBuf>>();
    // Byte order of the whole path string, so `a-b/` sorts before `a/`.
    sorted_files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    sorted_files.dedup();
    sorted_files
}

/// Reads, parses and converts one comment file, returning its identifier and display record.
pub fn read_comment<P: AsRef<Path>>(
    path: P,
    converters: &ConverterRegistry,
) -> Result<(String, CommentRecord), CommentError> {
    let path = path.as_ref();
    let mut record = frontmatter::read_record(path)?.fields;
    let identifier = record
        .take_post_id()
        .ok_or(CommentError::MissingIdentifier)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let converted = converters.convert(extension, record.content())?;
    record.insert(CONTENT_FIELD, converted);
    Ok((identifier, record))
}

/// Discovers and loads every comment below `root`.
///
/// Files that fail to read, parse or convert are logged and recorded in
/// [`CommentIndex::skipped`]; they never abort the build.
pub fn build_index<P: AsRef<Path>>(
    root: P,
    options: &DiscoveryOptions,
    converters: &ConverterRegistry,
) -> CommentIndex {
    let root = root.as_ref();
    let paths = discover(root, options);
    tracing::debug!(
        "Discovered {} candidate comment files below {:?}",
        paths.len(),
        root
    );

    let mut index = CommentIndex::default();
    for path in paths {
        match read_comment(&path, converters) {
            Ok((identifier, record)) => index.push(identifier, record),
            Err(reason) => {
                tracing::warn!("Skipping comment file {:?}: {}", path, reason);
                index.skipped.push(SkippedFile { path, reason });
            }
        }
    }

    tracing::info!(
        "Loaded {} comments for {} pages ({} files skipped)",
        index.total_comments(),
        index.len(),
        index.skipped.len()
    );
    index
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Unbuilt,
    Built,
}

/// Owns the comment index for one build and builds it lazily on first use.
pub struct CommentStore {
    root: PathBuf,
    options: DiscoveryOptions,
    converters: ConverterRegistry,
    index: OnceCell<CommentIndex>,
}

impl CommentStore {
    pub fn new(root: impl Into<PathBuf>, converters: ConverterRegistry) -> Self {
        CommentStore::with_options(root, DiscoveryOptions::default(), converters)
    }

    pub fn with_options(
        root: impl Into<PathBuf>,
        options: DiscoveryOptions,
        converters: ConverterRegistry,
    ) -> Self {
        CommentStore {
            root: root.into(),
            options,
            converters,
            index: OnceCell::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn state(&self) -> StoreState {
        match self.index.get() {
            Some(_) => StoreState::Built,
            None => StoreState::Unbuilt,
        }
    }

    /// The index, built on the first call and reused for the lifetime of the store.
    pub fn index(&self) -> &CommentIndex {
        self.index.get_or_init(|| {
            tracing::debug!("Building comment index for {:?}", self.root);
            build_index(&self.root, &self.options, &self.converters)
        })
    }

    pub fn comments_for(&self, identifier: &str) -> &[CommentRecord] {
        self.index().get(identifier)
    }

    pub fn count_for(&self, identifier: &str) -> usize {
        self.comments_for(identifier).len()
    }
}

impl fmt::Debug for CommentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentStore")
            .field("root", &self.root)
            .field("options", &self.options)
            .field("converters", &self.converters)
            .field("state", &self.state())
            .finish()
    }
}
