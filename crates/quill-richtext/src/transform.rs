//! Code block highlighting over rich-text trees.
//!
//! [`RichTextTransformer`] rebuilds a tree with every `code_block` node replaced
//! by an `html` node holding highlighted markup. Sibling subtrees are
//! transformed in parallel on the rayon pool; the indexed collect keeps the
//! children in their original positions.

use rayon::prelude::*;

use crate::consts::DEFAULT_LANGUAGE;
use crate::highlight::Highlighter;
use crate::node::{RichTextNode, code_source};

/// Replaces code blocks with highlighted markup.
///
/// # Example
///
/// ```
/// use quill_richtext::{Highlighter, RichTextNode, RichTextTransformer, SyntectHighlighter};
///
/// let transformer = RichTextTransformer::new(Highlighter::new(SyntectHighlighter::new()));
/// let doc = RichTextNode::container(
///     "doc",
///     vec![RichTextNode::code_block("rust", &["fn main() {}"])],
/// );
///
/// let out = transformer.transform(Some(doc)).unwrap();
/// assert_eq!(out.content().unwrap()[0].kind(), "html");
/// ```
pub struct RichTextTransformer {
    highlighter: Highlighter,
}

impl RichTextTransformer {
    /// Create a transformer using `highlighter` for code blocks.
    #[must_use]
    pub fn new(highlighter: Highlighter) -> Self {
        Self { highlighter }
    }

    /// The highlighter used for code blocks.
    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Transform a possibly absent document.
    ///
    /// `None` is returned unchanged. Never fails: highlighting errors are
    /// absorbed by the highlighter's fallback.
    pub fn transform(&self, node: Option<RichTextNode>) -> Option<RichTextNode> {
        let node = node?;
        let code_blocks = node.code_block_count();
        let transformed = self.transform_node(node);
        tracing::debug!(code_blocks, "transformed rich-text document");
        Some(transformed)
    }

    /// Transform one node and its subtree.
    pub fn transform_node(&self, node: RichTextNode) -> RichTextNode {
        match node {
            RichTextNode::CodeBlock { meta, content } => {
                let language = meta.code_language().unwrap_or(DEFAULT_LANGUAGE);
                let source = code_source(content.as_deref());
                RichTextNode::Html {
                    html: self.highlighter.highlight(&source, language),
                }
            }
            RichTextNode::Container { meta, content } => {
                let content = content
                    .into_par_iter()
                    .map(|child| self.transform_node(child))
                    .collect();
                RichTextNode::Container { meta, content }
            }
            node @ (RichTextNode::Leaf { .. }
            | RichTextNode::Html { .. }
            | RichTextNode::Opaque { .. }) => node,
        }
    }
}
