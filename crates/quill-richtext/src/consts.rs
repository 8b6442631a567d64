//! Internal constants for rich-text processing.

use std::time::Duration;

/// Node type of fenced code blocks.
pub const CODE_BLOCK_TYPE: &str = "code_block";

/// Node type of synthetic pre-rendered markup nodes.
pub const HTML_TYPE: &str = "html";

/// Node type of plain text leaves.
pub const TEXT_TYPE: &str = "text";

/// Prefix of the code block `class` attribute carrying the language.
pub const LANGUAGE_CLASS_PREFIX: &str = "language-";

/// Language used when a code block does not declare one.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Cache bucket holding highlighted markup.
pub const HIGHLIGHT_BUCKET: &str = "highlight";

/// Class of the `<pre>` emitted when highlighting fails.
pub const FALLBACK_CLASS: &str = "highlight";

/// Default HTTP timeout for remote highlighting requests (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Language tags rendered with the plain-text grammar.
pub const PLAIN_TEXT_ALIASES: &[&str] = &["text", "plain", "plaintext", "txt"];
