//! Rich-text processing for Quill.
//!
//! This crate turns CMS rich-text documents into page-ready content:
//! - [`RichTextTransformer`] replaces every code block with highlighted markup
//! - [`Highlighter`] caches highlighted markup and falls back to escaped code
//!   when a backend fails
//! - [`SyntectHighlighter`] and [`RemoteHighlighter`] are the shipped backends
//! - [`render_html`] renders a tree to HTML, emitting highlighted markup verbatim
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - [`node`]: Document model (`RichTextNode`, `NodeMeta`, `Mark`) and JSON I/O
//! - `highlight`: `SyntaxHighlighter` trait, cache keys and the cached `Highlighter`
//! - `builtin`: syntect backend
//! - `remote`: HTTP backend
//! - `transform`: Parallel tree transformation
//! - `render`: HTML rendering with link and html resolvers
//!
//! # Example
//!
//! ```
//! use quill_cache::{Cache, MemoryCache};
//! use quill_richtext::{Highlighter, RichTextTransformer, SyntectHighlighter, parse_document};
//!
//! let json = r#"{"type":"doc","content":[
//!     {"type":"code_block","attrs":{"class":"language-rust"},
//!      "content":[{"type":"text","text":"fn main() {}"}]}
//! ]}"#;
//!
//! let cache = MemoryCache::new();
//! let highlighter = Highlighter::new(SyntectHighlighter::new())
//!     .with_cache(cache.bucket("highlight"));
//! let transformer = RichTextTransformer::new(highlighter);
//!
//! let doc = transformer.transform(parse_document(json).unwrap()).unwrap();
//! assert_eq!(doc.content().unwrap()[0].kind(), "html");
//! ```

mod builtin;
mod consts;
mod escape;
mod highlight;
pub mod node;
mod remote;
mod render;
mod transform;

pub use builtin::SyntectHighlighter;
pub use consts::{DEFAULT_THEME, HIGHLIGHT_BUCKET};
pub use escape::escape_html;
pub use highlight::{HighlightError, HighlightKey, Highlighter, SyntaxHighlighter, fallback_html};
pub use node::{DocumentError, RichTextNode, document_to_json, parse_document};
pub use remote::RemoteHighlighter;
pub use render::render_html;
pub use transform::RichTextTransformer;
