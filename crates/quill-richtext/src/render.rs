//! HTML rendering of rich-text trees.
//!
//! The renderer walks a (usually already transformed) tree and emits HTML5.
//! Synthetic `html` nodes are emitted verbatim; that is how highlighted code
//! reaches the page. Text is escaped and wrapped by its marks, first mark
//! innermost.
//!
//! Node kinds without a dedicated tag render their children only, and opaque
//! nodes of unknown kinds (embedded components, for instance) render nothing.

use serde_json::Value;

use crate::consts::{CODE_BLOCK_TYPE, HTML_TYPE, LANGUAGE_CLASS_PREFIX};
use crate::escape::{escape_code, escape_html};
use crate::node::{Mark, NodeMeta, RichTextNode, code_source};

/// Render a rich-text tree to HTML.
///
/// # Example
///
/// ```
/// use quill_richtext::{RichTextNode, render_html};
///
/// let doc = RichTextNode::container(
///     "doc",
///     vec![RichTextNode::container("paragraph", vec![RichTextNode::text("a < b")])],
/// );
/// assert_eq!(render_html(&doc), "<p>a &lt; b</p>");
/// ```
pub fn render_html(node: &RichTextNode) -> String {
    let mut out = String::new();
    render_node(node, &mut out);
    out
}

fn render_node(node: &RichTextNode, out: &mut String) {
    match node {
        RichTextNode::Html { html } => out.push_str(html),
        RichTextNode::Leaf { meta, text } => render_leaf(meta, text, out),
        RichTextNode::Container { meta, content } => render_container(meta, content, out),
        RichTextNode::CodeBlock { meta, content } => {
            render_code_block(meta, content.as_deref().unwrap_or_default(), out);
        }
        RichTextNode::Opaque { meta } => render_opaque(meta, out),
    }
}

fn render_children(content: &[RichTextNode], out: &mut String) {
    for child in content {
        render_node(child, out);
    }
}

fn render_container(meta: &NodeMeta, content: &[RichTextNode], out: &mut String) {
    let tag = match meta.kind.as_str() {
        "paragraph" => "p",
        "heading" => {
            let level = meta.attr_u64("level").unwrap_or(1).clamp(1, 6);
            out.push_str(&format!("<h{level}>"));
            render_children(content, out);
            out.push_str(&format!("</h{level}>"));
            return;
        }
        "ordered_list" => {
            match meta.attr_u64("order") {
                Some(start) if start != 1 => out.push_str(&format!(r#"<ol start="{start}">"#)),
                _ => out.push_str("<ol>"),
            }
            render_children(content, out);
            out.push_str("</ol>");
            return;
        }
        "bullet_list" => "ul",
        "list_item" => "li",
        "blockquote" => "blockquote",
        "table" => "table",
        "tableRow" => "tr",
        "tableCell" => "td",
        "tableHeader" => "th",
        // doc and anything unknown
        _ => {
            render_children(content, out);
            return;
        }
    };

    out.push('<');
    out.push_str(tag);
    out.push('>');
    render_children(content, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn render_leaf(meta: &NodeMeta, text: &str, out: &mut String) {
    if meta.kind == HTML_TYPE {
        out.push_str(text);
        return;
    }

    let mut html = escape_html(text);
    for mark in meta.marks.iter().flatten() {
        html = apply_mark(mark, &html);
    }
    out.push_str(&html);
}

fn render_opaque(meta: &NodeMeta, out: &mut String) {
    match meta.kind.as_str() {
        "horizontal_rule" => out.push_str("<hr>"),
        "hard_break" => out.push_str("<br>"),
        "image" => {
            out.push_str("<img");
            for attr in ["src", "alt", "title"] {
                if let Some(value) = meta.attr_str(attr) {
                    out.push_str(&format!(r#" {attr}="{}""#, escape_html(value)));
                }
            }
            out.push('>');
        }
        kind => tracing::trace!(kind, "skipping opaque node"),
    }
}

fn render_code_block(meta: &NodeMeta, content: &[RichTextNode], out: &mut String) {
    debug_assert_eq!(meta.kind, CODE_BLOCK_TYPE);
    let source = escape_code(&code_source(Some(content)));

    match meta.code_language() {
        Some(lang) => out.push_str(&format!(
            r#"<pre><code class="{LANGUAGE_CLASS_PREFIX}{}">{source}</code></pre>"#,
            escape_html(lang)
        )),
        None => out.push_str(&format!("<pre><code>{source}</code></pre>")),
    }
}

/// Wrap already-rendered `inner` markup in the element for `mark`.
fn apply_mark(mark: &Mark, inner: &str) -> String {
    let simple = |tag: &str| format!("<{tag}>{inner}</{tag}>");
    match mark.kind.as_str() {
        "bold" => simple("strong"),
        "italic" => simple("em"),
        "strike" => simple("s"),
        "underline" => simple("u"),
        "code" => simple("code"),
        "superscript" => simple("sup"),
        "subscript" => simple("sub"),
        "link" => resolve_link(mark, inner),
        "anchor" => match mark.attr_str("id") {
            Some(id) => format!(r#"<span id="{}">{inner}</span>"#, escape_html(id)),
            None => inner.to_owned(),
        },
        "styled" => match mark.attr_str("class") {
            Some(class) => format!(r#"<span class="{}">{inner}</span>"#, escape_html(class)),
            None => inner.to_owned(),
        },
        _ => inner.to_owned(),
    }
}

/// Render a link mark.
///
/// Targets default to `_self`; `_blank` links get `rel="noopener noreferrer"`.
fn resolve_link(mark: &Mark, inner: &str) -> String {
    let href = mark.attr_str("href").unwrap_or_default();
    let target = match mark.attrs.as_ref().and_then(|attrs| attrs.get("target")) {
        Some(Value::String(target)) if !target.is_empty() => target.as_str(),
        _ => "_self",
    };
    let rel = if target == "_blank" {
        r#" rel="noopener noreferrer""#
    } else {
        ""
    };
    format!(
        r#"<a href="{}" target="{}"{rel}>{inner}</a>"#,
        escape_html(href),
        escape_html(target)
    )
}
