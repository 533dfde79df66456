//! TOML configuration for comment discovery and conversion.

use serde::{Deserialize, Serialize};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    codec::{
        md::{MarkdownConverter, MARKDOWN_EXTENSIONS},
        Converter, ConverterRegistry,
    },
    error::CommentError,
    store::{CommentStore, DiscoveryOptions, DEFAULT_COMMENTS_DIR},
};

/// Settings for the comment pipeline, read from the `[comments]` table of a TOML file.
///
/// ```toml
/// [comments]
/// dir_name = "_comments"
/// include_hidden = false
/// markdown = true
/// markdown_extensions = ["md", "markdown"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub dir_name: String,
    pub include_hidden: bool,
    pub markdown: bool,
    pub markdown_extensions: Vec<String>,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        CommentsConfig {
            dir_name: DEFAULT_COMMENTS_DIR.to_string(),
            include_hidden: false,
            markdown: true,
            markdown_extensions: MARKDOWN_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    comments: CommentsConfig,
}

impl CommentsConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, CommentError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.comments.validate()?;
        Ok(file.comments)
    }

    /// Loads the configuration at `path`. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CommentError> {
        let path = path.as_ref();
        tracing::debug!("Attempting to read comment configuration from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Config file not found, using default comment configuration.");
            return Ok(CommentsConfig::default());
        }
        let content = read_to_string(path)?;
        CommentsConfig::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, CommentError> {
        let file = ConfigFile {
            comments: self.clone(),
        };
        Ok(toml::to_string(&file)?)
    }

    pub fn validate(&self) -> Result<(), CommentError> {
        let name = self.dir_name.as_str();
        if name.is_empty() || name == "." || name == ".." {
            return Err(CommentError::Config(format!(
                "dir_name must name a directory, got {name:?}"
            )));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(CommentError::Config(format!(
                "dir_name must be a single path component, got {name:?}"
            )));
        }
        Ok(())
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            dir_name: self.dir_name.clone(),
            include_hidden: self.include_hidden,
        }
    }

    /// Built-ins plus the Markdown converter when enabled.
    pub fn converter_registry(&self) -> ConverterRegistry {
        let mut registry = ConverterRegistry::new();
        if self.markdown {
            registry.register(MarkdownConverter::new(self.markdown_extensions.clone()));
        }
        registry
    }

    /// A store over `root` using these settings, with `extra` converters registered after the
    /// configured ones.
    pub fn store<I>(&self, root: impl Into<PathBuf>, extra: I) -> Result<CommentStore, CommentError>
    where
        I: IntoIterator<Item = Arc<dyn Converter>>,
    {
        self.validate()?;
        let mut registry = self.converter_registry();
        for converter in extra {
            registry.register_shared(converter);
        }
        Ok(CommentStore::with_options(
            root,
            self.discovery_options(),
            registry,
        ))
    }
}
