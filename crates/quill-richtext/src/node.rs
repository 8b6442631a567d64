//! Rich-text document model.
//!
//! A CMS rich-text document is a JSON tree where every node has a `type` tag
//! and optional `attrs`, `content`, `text` and `marks` fields. [`RichTextNode`]
//! classifies each node into one of a few shapes so that consumers can match
//! exhaustively instead of probing optional fields:
//!
//! | JSON shape                          | Variant                          |
//! |-------------------------------------|----------------------------------|
//! | `type = "code_block"`               | [`RichTextNode::CodeBlock`]      |
//! | `type = "html"`, `text`, nothing else | [`RichTextNode::Html`]         |
//! | has `content`                       | [`RichTextNode::Container`]      |
//! | has `text`                          | [`RichTextNode::Leaf`]           |
//! | anything else                       | [`RichTextNode::Opaque`]         |
//!
//! Serialization goes back through the same wire shape, so fields Quill does
//! not interpret (unknown keys, non-string attribute values, explicit `null`s,
//! extra mark fields) survive a parse/serialize cycle untouched. A field
//! present as `null` counts as absent for classification and is kept in
//! `extra`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::consts::{CODE_BLOCK_TYPE, HTML_TYPE, LANGUAGE_CLASS_PREFIX, TEXT_TYPE};

/// Node attributes (`attrs` on the wire).
pub type Attrs = Map<String, Value>;

/// Distinguish a missing field (`None`) from an explicit `null` (`Some(None)`).
///
/// Used with `#[serde(default)]`, which covers the missing case.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Take a wire field, recording an explicit `null` in `extra`.
fn take_field<T>(field: Option<Option<T>>, name: &str, extra: &mut Map<String, Value>) -> Option<T> {
    match field {
        Some(Some(value)) => Some(value),
        Some(None) => {
            extra.insert(name.to_owned(), Value::Null);
            None
        }
        None => None,
    }
}

/// Inline formatting applied to a text node (`bold`, `link`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMark", into = "RawMark")]
pub struct Mark {
    /// Mark kind (`type` on the wire).
    pub kind: String,
    /// Mark attributes (e.g. `href` and `target` for links).
    pub attrs: Option<Attrs>,
    /// Any other field present on the wire.
    pub extra: Map<String, Value>,
}

impl Mark {
    /// Mark of the given kind without attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: None,
            extra: Map::new(),
        }
    }

    /// String attribute lookup.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(key)?.as_str()
    }
}

#[derive(Serialize, Deserialize)]
struct RawMark {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    attrs: Option<Option<Attrs>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawMark> for Mark {
    fn from(raw: RawMark) -> Self {
        let mut extra = raw.extra;
        let attrs = take_field(raw.attrs, "attrs", &mut extra);
        Self {
            kind: raw.kind,
            attrs,
            extra,
        }
    }
}

impl From<Mark> for RawMark {
    fn from(mark: Mark) -> Self {
        Self {
            kind: mark.kind,
            attrs: mark.attrs.map(Some),
            extra: mark.extra,
        }
    }
}

/// Fields shared by every non-synthetic node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeMeta {
    /// Node kind (`type` on the wire).
    pub kind: String,
    /// Node attributes.
    pub attrs: Option<Attrs>,
    /// Inline marks (text nodes only, in practice).
    pub marks: Option<Vec<Mark>>,
    /// Any other field present on the wire.
    pub extra: Map<String, Value>,
}

impl NodeMeta {
    /// Metadata with only a kind set.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// String attribute lookup.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(key)?.as_str()
    }

    /// Integer attribute lookup.
    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attrs.as_ref()?.get(key)?.as_u64()
    }

    /// Language declared by a code block's `class` attribute.
    ///
    /// `language-rust` yields `rust`; a class without the prefix is used as
    /// is. Missing, non-string or empty classes yield `None`.
    pub fn code_language(&self) -> Option<&str> {
        self.attr_str("class")
            .map(|class| class.strip_prefix(LANGUAGE_CLASS_PREFIX).unwrap_or(class))
            .filter(|lang| !lang.is_empty())
    }
}

/// One node of a rich-text tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum RichTextNode {
    /// Node with ordered children (`doc`, `paragraph`, lists, ...).
    Container {
        meta: NodeMeta,
        content: Vec<RichTextNode>,
    },
    /// Text-bearing node without children.
    Leaf { meta: NodeMeta, text: String },
    /// Fenced source code; `content` holds text lines.
    CodeBlock {
        meta: NodeMeta,
        content: Option<Vec<RichTextNode>>,
    },
    /// Pre-rendered markup, emitted verbatim by renderers.
    Html { html: String },
    /// Node with neither children nor text (`horizontal_rule`, `image`, ...).
    Opaque { meta: NodeMeta },
}

impl RichTextNode {
    /// Plain text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Leaf {
            meta: NodeMeta::new(TEXT_TYPE),
            text: text.into(),
        }
    }

    /// Container of the given kind.
    pub fn container(kind: impl Into<String>, content: Vec<RichTextNode>) -> Self {
        Self::Container {
            meta: NodeMeta::new(kind),
            content,
        }
    }

    /// Code block tagged `language-{language}` holding one text line per entry.
    pub fn code_block(language: &str, lines: &[&str]) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert(
            "class".to_owned(),
            Value::String(format!("{LANGUAGE_CLASS_PREFIX}{language}")),
        );
        Self::CodeBlock {
            meta: NodeMeta {
                attrs: Some(attrs),
                ..NodeMeta::new(CODE_BLOCK_TYPE)
            },
            content: Some(lines.iter().map(|line| Self::text(*line)).collect()),
        }
    }

    /// Synthetic node carrying pre-rendered markup.
    pub fn html(html: impl Into<String>) -> Self {
        Self::Html { html: html.into() }
    }

    /// Node kind as it appears on the wire.
    pub fn kind(&self) -> &str {
        match self {
            Self::Container { meta, .. }
            | Self::Leaf { meta, .. }
            | Self::CodeBlock { meta, .. }
            | Self::Opaque { meta } => &meta.kind,
            Self::Html { .. } => HTML_TYPE,
        }
    }

    /// Metadata, absent for synthetic html nodes.
    pub fn meta(&self) -> Option<&NodeMeta> {
        match self {
            Self::Container { meta, .. }
            | Self::Leaf { meta, .. }
            | Self::CodeBlock { meta, .. }
            | Self::Opaque { meta } => Some(meta),
            Self::Html { .. } => None,
        }
    }

    /// Children, if this node has any.
    pub fn content(&self) -> Option<&[RichTextNode]> {
        match self {
            Self::Container { content, .. } => Some(content),
            Self::CodeBlock { content, .. } => content.as_deref(),
            Self::Leaf { .. } | Self::Html { .. } | Self::Opaque { .. } => None,
        }
    }

    /// Text payload of leaves and html nodes.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Leaf { text, .. } => Some(text),
            Self::Html { html } => Some(html),
            Self::Container { .. } | Self::CodeBlock { .. } | Self::Opaque { .. } => None,
        }
    }

    /// The `text` field as it appears on the wire, whatever the variant.
    ///
    /// Unlike [`text_content`](Self::text_content) this also finds text
    /// carried by a node that has `content` as well.
    pub fn wire_text(&self) -> Option<&str> {
        match self {
            Self::Leaf { text, .. } => Some(text),
            Self::Html { html } => Some(html),
            Self::Container { meta, .. } | Self::CodeBlock { meta, .. } | Self::Opaque { meta } => {
                meta.extra.get("text")?.as_str()
            }
        }
    }

    /// Number of code blocks in this subtree.
    pub fn code_block_count(&self) -> usize {
        match self {
            Self::CodeBlock { .. } => 1,
            Self::Container { content, .. } => content.iter().map(Self::code_block_count).sum(),
            Self::Leaf { .. } | Self::Html { .. } | Self::Opaque { .. } => 0,
        }
    }
}

/// Source of a code block: the wire `text` of each line joined by newlines.
///
/// Lines without text count as empty; absent content is an empty source.
pub(crate) fn code_source(content: Option<&[RichTextNode]>) -> String {
    content
        .map(|lines| {
            lines
                .iter()
                .map(|line| line.wire_text().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Wire form of a node, shared by serialization and deserialization.
#[derive(Serialize, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    attrs: Option<Option<Attrs>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    content: Option<Option<Vec<RichTextNode>>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    text: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    marks: Option<Option<Vec<Mark>>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawNode> for RichTextNode {
    fn from(raw: RawNode) -> Self {
        let mut extra = raw.extra;
        let kind = raw.kind;
        let attrs = take_field(raw.attrs, "attrs", &mut extra);
        let content = take_field(raw.content, "content", &mut extra);
        let text = take_field(raw.text, "text", &mut extra);
        let marks = take_field(raw.marks, "marks", &mut extra);

        let is_bare = attrs.is_none() && content.is_none() && marks.is_none() && extra.is_empty();
        if kind == HTML_TYPE
            && is_bare
            && let Some(html) = text
        {
            return Self::Html { html };
        }

        let stash_text = |extra: &mut Map<String, Value>, text: Option<String>| {
            if let Some(text) = text {
                extra.insert("text".to_owned(), Value::String(text));
            }
        };

        if kind == CODE_BLOCK_TYPE {
            stash_text(&mut extra, text);
            let meta = NodeMeta {
                kind,
                attrs,
                marks,
                extra,
            };
            return Self::CodeBlock { meta, content };
        }

        match (content, text) {
            (Some(content), text) => {
                stash_text(&mut extra, text);
                Self::Container {
                    meta: NodeMeta {
                        kind,
                        attrs,
                        marks,
                        extra,
                    },
                    content,
                }
            }
            (None, Some(text)) => Self::Leaf {
                meta: NodeMeta {
                    kind,
                    attrs,
                    marks,
                    extra,
                },
                text,
            },
            (None, None) => Self::Opaque {
                meta: NodeMeta {
                    kind,
                    attrs,
                    marks,
                    extra,
                },
            },
        }
    }
}

impl From<RichTextNode> for RawNode {
    fn from(node: RichTextNode) -> Self {
        let raw = |meta: NodeMeta, content: Option<Vec<RichTextNode>>, text: Option<String>| {
            let NodeMeta {
                kind,
                attrs,
                marks,
                mut extra,
            } = meta;
            // Text stashed for a node that also had content goes back to its own
            // field; an explicit null stays in extra
            let text = text.or_else(|| match extra.remove("text") {
                Some(Value::String(text)) => Some(text),
                Some(other) => {
                    extra.insert("text".to_owned(), other);
                    None
                }
                None => None,
            });
            RawNode {
                kind,
                attrs: attrs.map(Some),
                content: content.map(Some),
                text: text.map(Some),
                marks: marks.map(Some),
                extra,
            }
        };

        match node {
            RichTextNode::Container { meta, content } => raw(meta, Some(content), None),
            RichTextNode::Leaf { meta, text } => raw(meta, None, Some(text)),
            RichTextNode::CodeBlock { meta, content } => raw(meta, content, None),
            RichTextNode::Opaque { meta } => raw(meta, None, None),
            RichTextNode::Html { html } => RawNode {
                kind: HTML_TYPE.to_owned(),
                attrs: None,
                content: None,
                text: Some(Some(html)),
                marks: None,
                extra: Map::new(),
            },
        }
    }
}

/// Error reading or writing a rich-text document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The input is not a valid rich-text JSON document.
    #[error("invalid rich-text document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a rich-text document from JSON.
///
/// A JSON `null` is an absent document and parses to `None`.
pub fn parse_document(json: &str) -> Result<Option<RichTextNode>, DocumentError> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize a (possibly absent) rich-text document to pretty-printed JSON.
pub fn document_to_json(node: Option<&RichTextNode>) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(&node)?)
}
