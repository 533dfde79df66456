//! Render-time access to comments.
//!
//! The host site generator exposes one extension point: before a post or page turns into
//! template data, every registered [`RenderExtension`] may add fields keyed by the item's
//! identifier. [`CommentsExtension`] uses it to add
//!
//! - `comment_list`: the item's comments, each a field-name to value object including `content`
//! - `comment_count`: the number of comments
//!
//! ```rust,no_run
//! use static_comments::render::{ContentItem, RenderPipeline, SiteContext};
//! use static_comments::codec::ConverterRegistry;
//!
//! # fn main() -> Result<(), static_comments::CommentError> {
//! let site = SiteContext::new("./site", ConverterRegistry::new());
//! let mut pipeline = RenderPipeline::new();
//! pipeline.register(site.comments_extension());
//!
//! let post = ContentItem::new("/2011/05/01/hello");
//! let data = pipeline.render_data(&post)?;
//! assert!(data.contains_key("comment_count"));
//! # Ok(())
//! # }
//! ```

use serde_json::{Map, Value};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    codec::ConverterRegistry,
    config::CommentsConfig,
    error::CommentError,
    record::CommentRecord,
    store::CommentStore,
};

pub const COMMENT_LIST_KEY: &str = "comment_list";
pub const COMMENT_COUNT_KEY: &str = "comment_count";

/// The field map a content item hands to its template.
pub type TemplateData = Map<String, Value>;

/// A post, page or other item the host renders.
pub trait Renderable {
    /// Identifier comments are keyed by. Items without one get no extension fields.
    fn identifier(&self) -> Option<&str>;

    fn template_data(&self) -> TemplateData;
}

/// Hook run on every item's template data before it is rendered.
pub trait RenderExtension: Send + Sync {
    fn extend(&self, identifier: &str, data: &mut TemplateData) -> Result<(), CommentError>;
}

/// Runs registered extensions, in registration order, over each item's template data.
#[derive(Default)]
pub struct RenderPipeline {
    extensions: Vec<Box<dyn RenderExtension>>,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<E: RenderExtension + 'static>(&mut self, extension: E) -> &mut Self {
        self.extensions.push(Box::new(extension));
        self
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn render_data(&self, item: &dyn Renderable) -> Result<TemplateData, CommentError> {
        let mut data = item.template_data();
        if let Some(identifier) = item.identifier() {
            for extension in self.extensions.iter() {
                extension.extend(identifier, &mut data)?;
            }
        }
        Ok(data)
    }
}

/// Adds `comment_list` and `comment_count` from a shared [`CommentStore`].
#[derive(Debug, Clone)]
pub struct CommentsExtension {
    store: Arc<CommentStore>,
}

impl CommentsExtension {
    pub fn new(store: Arc<CommentStore>) -> Self {
        CommentsExtension { store }
    }
}

impl RenderExtension for CommentsExtension {
    fn extend(&self, identifier: &str, data: &mut TemplateData) -> Result<(), CommentError> {
        let comments = self.store.comments_for(identifier);
        data.insert(
            COMMENT_LIST_KEY.to_string(),
            serde_json::to_value(comments)?,
        );
        data.insert(COMMENT_COUNT_KEY.to_string(), Value::from(comments.len()));
        Ok(())
    }
}

/// Per-build state: the site's source root and the one comment store that serves it.
#[derive(Debug, Clone)]
pub struct SiteContext {
    source: PathBuf,
    comments: Arc<CommentStore>,
}

impl SiteContext {
    pub fn new(source: impl Into<PathBuf>, converters: ConverterRegistry) -> Self {
        let source = source.into();
        let comments = Arc::new(CommentStore::new(source.clone(), converters));
        SiteContext { source, comments }
    }

    pub fn from_config(
        source: impl Into<PathBuf>,
        config: &CommentsConfig,
    ) -> Result<Self, CommentError> {
        let source = source.into();
        let comments = Arc::new(config.store(source.clone(), Vec::new())?);
        Ok(SiteContext { source, comments })
    }

    pub fn with_store(source: impl Into<PathBuf>, store: Arc<CommentStore>) -> Self {
        SiteContext {
            source: source.into(),
            comments: store,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn store(&self) -> &Arc<CommentStore> {
        &self.comments
    }

    /// Comments for `identifier`; the first call of a build loads the index.
    pub fn comments_for(&self, identifier: &str) -> &[CommentRecord] {
        self.comments.comments_for(identifier)
    }

    pub fn count_for(&self, identifier: &str) -> usize {
        self.comments_for(identifier).len()
    }

    pub fn comments_extension(&self) -> CommentsExtension {
        CommentsExtension::new(self.comments.clone())
    }
}

/// A minimal [`Renderable`] for hosts without their own content type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentItem {
    pub id: Option<String>,
    pub data: TemplateData,
}

impl ContentItem {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut data = TemplateData::new();
        data.insert("id".to_string(), Value::from(id.clone()));
        ContentItem { id: Some(id), data }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

impl Renderable for ContentItem {
    fn identifier(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn template_data(&self) -> TemplateData {
        self.data.clone()
    }
}
