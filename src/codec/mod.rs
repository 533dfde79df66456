//! Comment file parsing and body conversion.
//!
//! ## Key Components
//!
//! - [`frontmatter`] - turns raw file bytes into a [`RawRecord`](frontmatter::RawRecord)
//! - [`Converter`] trait - the contract external (host-provided) converters implement
//! - [`ConverterRegistry`] - picks a [`ConverterStrategy`] for a file extension
//!
//! ## Strategy Precedence
//!
//! Selection always runs in this order, and the first hit wins:
//!
//! 1. Built-ins: `txt` → [`ConverterStrategy::PlainText`], `html`/`htm` →
//!    [`ConverterStrategy::SanitizedHtml`]
//! 2. External converters, in registration order
//! 3. [`ConverterStrategy::Identity`]
//!
//! Built-ins shadow any external converter that also claims `txt` or `html`.
//!
//! ```rust
//! use static_comments::codec::{ConverterRegistry, ConverterStrategy, md::MarkdownConverter};
//!
//! let mut registry = ConverterRegistry::new();
//! registry.register(MarkdownConverter::default());
//!
//! assert!(matches!(registry.select("txt"), ConverterStrategy::PlainText));
//! assert!(matches!(registry.select("md"), ConverterStrategy::External(_)));
//! assert!(matches!(registry.select("yaml"), ConverterStrategy::Identity));
//! assert_eq!(registry.convert("txt", "a\nb").unwrap(), "a<br />\nb");
//! ```

use std::{fmt, sync::Arc};

use crate::error::CommentError;

pub mod frontmatter;
pub mod html;
pub mod md;

pub use frontmatter::{Layout, RawRecord};

/// A host-supplied body converter, such as a Markdown or Textile renderer.
pub trait Converter: Send + Sync {
    /// Short label used in diagnostics.
    fn name(&self) -> &str {
        "external"
    }

    /// Whether this converter handles files with `extension` (given without the leading dot).
    fn matches(&self, extension: &str) -> bool;

    fn convert(&self, text: &str) -> Result<String, CommentError>;
}

/// How one comment body gets converted.
#[derive(Clone, Copy)]
pub enum ConverterStrategy<'a> {
    PlainText,
    SanitizedHtml,
    External(&'a dyn Converter),
    Identity,
}

impl ConverterStrategy<'_> {
    pub fn convert(&self, body: &str) -> Result<String, CommentError> {
        match self {
            ConverterStrategy::PlainText => Ok(html::plain_text(body)),
            ConverterStrategy::SanitizedHtml => Ok(html::sanitize_html(body)),
            ConverterStrategy::External(converter) => converter.convert(body).map_err(|e| {
                CommentError::Conversion(format!("{} converter failed: {e}", converter.name()))
            }),
            ConverterStrategy::Identity => Ok(body.to_string()),
        }
    }
}

impl fmt::Debug for ConverterStrategy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterStrategy::PlainText => write!(f, "PlainText"),
            ConverterStrategy::SanitizedHtml => write!(f, "SanitizedHtml"),
            ConverterStrategy::External(converter) => {
                write!(f, "External({})", converter.name())
            }
            ConverterStrategy::Identity => write!(f, "Identity"),
        }
    }
}

/// Ordered list of external converters plus the fixed built-ins.
#[derive(Clone, Default)]
pub struct ConverterRegistry(Vec<Arc<dyn Converter>>);

impl ConverterRegistry {
    /// A registry with only the built-ins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an external converter. Earlier registrations take precedence.
    pub fn register<C: Converter + 'static>(&mut self, converter: C) -> &mut Self {
        self.0.push(Arc::new(converter));
        self
    }

    pub fn register_shared(&mut self, converter: Arc<dyn Converter>) -> &mut Self {
        self.0.push(converter);
        self
    }

    pub fn select(&self, extension: &str) -> ConverterStrategy<'_> {
        let extension = extension.trim_start_matches('.');
        if extension.eq_ignore_ascii_case("txt") {
            return ConverterStrategy::PlainText;
        }
        if extension.eq_ignore_ascii_case("html") || extension.eq_ignore_ascii_case("htm") {
            return ConverterStrategy::SanitizedHtml;
        }
        self.0
            .iter()
            .find(|converter| converter.matches(extension))
            .map(|converter| ConverterStrategy::External(converter.as_ref()))
            .unwrap_or(ConverterStrategy::Identity)
    }

    pub fn convert(&self, extension: &str, body: &str) -> Result<String, CommentError> {
        let strategy = self.select(extension);
        tracing::trace!("Converting .{extension} body with {strategy:?}");
        strategy.convert(body)
    }

    pub fn external_names(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|converter| converter.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConverterRegistry")
            .field(&self.external_names())
            .finish()
    }
}
