//! Markdown comment bodies, rendered with pulldown-cmark.

use pulldown_cmark::{html, CowStr, Event as MdEvent, Options, Parser as MdParser};

use crate::{codec::Converter, error::CommentError};

pub use pulldown_cmark;

/// Extensions Markdown comment files conventionally use.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mkd", "mkdn", "mkdown"];

pub fn comment_md_options() -> Options {
    let mut md_options = Options::empty();
    // Enabled explicitly rather than via Options::all() for reproducibility. Comments don't get
    // metadata blocks, math or wikilinks.
    md_options.insert(Options::ENABLE_FOOTNOTES);
    md_options.insert(Options::ENABLE_STRIKETHROUGH);
    md_options.insert(Options::ENABLE_TABLES);
    md_options.insert(Options::ENABLE_TASKLISTS);
    md_options
}

/// External converter rendering Markdown comment bodies to HTML with pulldown-cmark.
///
/// Raw HTML inside the Markdown is emitted as escaped text unless [`MarkdownConverter::allow_raw_html`]
/// is set, so a visitor can't smuggle markup through a `.md` comment.
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    extensions: Vec<String>,
    raw_html: bool,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        MarkdownConverter::new(MARKDOWN_EXTENSIONS.iter().map(|ext| ext.to_string()))
    }
}

impl MarkdownConverter {
    pub fn new<I: IntoIterator<Item = String>>(extensions: I) -> Self {
        MarkdownConverter {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            raw_html: false,
        }
    }

    pub fn allow_raw_html(mut self, allow: bool) -> Self {
        self.raw_html = allow;
        self
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Converter for MarkdownConverter {
    fn name(&self) -> &str {
        "markdown"
    }

    fn matches(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    fn convert(&self, text: &str) -> Result<String, CommentError> {
        let raw_html = self.raw_html;
        let parser = MdParser::new_ext(text, comment_md_options()).map(|event| match event {
            MdEvent::Html(markup) | MdEvent::InlineHtml(markup) if !raw_html => {
                MdEvent::Text(CowStr::from(markup.into_string()))
            }
            other => other,
        });
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}
