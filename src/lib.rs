//! # static-comments
//!
//! A static, file-based comment store for static-site builds.
//!
//! ## Overview
//!
//! Comments live as individual text files inside `_comments` directories anywhere in a site's
//! source tree. At build time static-comments discovers every one of them, parses its metadata
//! and body, converts the body into safely renderable HTML, and groups the results by the
//! identifier of the post or page each comment belongs to. Templates then receive a
//! `comment_list` and a `comment_count` for every item.
//!
//! ### Key Features
//!
//! - **Two file layouts**: front-matter plus body, or a single YAML document (older files)
//! - **Extension-driven conversion**: `.txt` is escaped, `.html` is stripped of scripts, styles
//!   and comments, anything else goes to host-supplied converters (Markdown ships built in)
//! - **Deterministic ordering**: comments appear in path order, never in timestamp order
//! - **Error tolerance**: a broken comment file is skipped with a diagnostic, the build goes on
//! - **Build-once cache**: the index is computed on first use and reused for the whole build
//!
//! ## Architecture
//!
//! - **[`codec`]**: file parsing ([`codec::frontmatter`]) and body conversion
//!   ([`codec::ConverterRegistry`])
//! - **[`store`]**: discovery and the per-build [`store::CommentStore`]
//! - **[`render`]**: the render extension point and [`render::SiteContext`]
//! - **[`config`]**: TOML configuration
//! - **[`submission`]**: writing new comment files
//!
//! Data flows build → [`render::SiteContext::comments_for`] → [`store::CommentStore`] (build or
//! reuse) → [`codec::frontmatter::parse`] → [`codec::ConverterRegistry::convert`] → template data.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use static_comments::{config::CommentsConfig, render::SiteContext};
//!
//! fn main() -> Result<(), static_comments::CommentError> {
//!     let config = CommentsConfig::load("./site/comments.toml")?;
//!     let site = SiteContext::from_config("./site", &config)?;
//!
//!     for comment in site.comments_for("/2011/05/01/hello") {
//!         println!("{}: {}", comment.get("name").unwrap_or("Anonymous"), comment.content());
//!     }
//!     println!("{} comments", site.count_for("/2011/05/01/hello"));
//!     Ok(())
//! }
//! ```
//!
//! ## Comment Files
//!
//! ```text
//! ---
//! post_id: /2011/05/01/hello
//! name: Jo
//! link: https://example.com
//! ---
//! Great post!
//! ```
//!
//! `post_id` routes the comment and is removed from the stored record. The body becomes the
//! `content` field; older files that call it `comment` are read the same way.

pub mod codec;
pub mod config;
pub mod error;
pub mod record;
pub mod render;
pub mod store;
pub mod submission;

pub use error::*;
pub use record::CommentRecord;
pub use store::{CommentIndex, CommentStore};
