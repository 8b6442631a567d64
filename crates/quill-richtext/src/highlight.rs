//! Cached syntax highlighting.
//!
//! [`Highlighter`] sits between the transformer and a [`SyntaxHighlighter`]
//! backend. Rendered markup is cached in a write-once [`CacheBucket`] keyed by
//! [`HighlightKey`]; failures are never cached and degrade to escaped,
//! unhighlighted markup so that one bad code block cannot fail a page.

use quill_cache::{Cache, CacheBucket, CacheBucketExt};
use sha2::{Digest, Sha256};

use crate::consts::{DEFAULT_LANGUAGE, DEFAULT_THEME, FALLBACK_CLASS, HIGHLIGHT_BUCKET};
use crate::escape::escape_code;

/// Why a backend could not highlight a code block.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// The backend does not know the language tag.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    /// The backend does not know the theme.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    /// The backend could not be reached (transport failure, timeout, 5xx).
    #[error("highlighter unavailable: {0}")]
    Unavailable(String),
    /// The backend failed while rendering.
    #[error("highlighting failed: {0}")]
    Render(String),
}

/// Capability to turn source code into highlighted HTML.
///
/// Implementations must be shareable across threads: the transformer calls
/// them from the rayon pool.
pub trait SyntaxHighlighter: Send + Sync {
    /// Render `code` written in `lang` using `theme`.
    fn render(&self, code: &str, lang: &str, theme: &str) -> Result<String, HighlightError>;
}

impl<T: SyntaxHighlighter + ?Sized> SyntaxHighlighter for Box<T> {
    fn render(&self, code: &str, lang: &str, theme: &str) -> Result<String, HighlightError> {
        (**self).render(code, lang, theme)
    }
}

/// Highlight parameters for cache key computation.
///
/// Contains everything that affects the rendered markup.
#[derive(Debug, Clone, Copy)]
pub struct HighlightKey<'a> {
    /// Language tag.
    pub lang: &'a str,
    /// Theme name.
    pub theme: &'a str,
    /// Source code.
    pub code: &'a str,
}

impl HighlightKey<'_> {
    /// Compute a content hash for this key.
    ///
    /// Every part is prefixed with its byte length (u64 LE) before hashing, so
    /// moving a separator-like character from one part into another always
    /// changes the input. A plain `"{lang}:{code}"` join would map
    /// `("x", "a:b")` and `("x:a", "b")` to the same key.
    ///
    /// # Hash Format
    ///
    /// Hex-encoded SHA-256 (64 characters).
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [self.lang, self.theme, self.code] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Escaped, unhighlighted markup for `code`.
pub fn fallback_html(code: &str) -> String {
    format!(
        r#"<pre class="{FALLBACK_CLASS}"><code>{}</code></pre>"#,
        escape_code(code)
    )
}

/// Cached front end of a [`SyntaxHighlighter`].
///
/// # Example
///
/// ```
/// use quill_cache::{Cache, MemoryCache};
/// use quill_richtext::{Highlighter, SyntectHighlighter};
///
/// let cache = MemoryCache::new();
/// let highlighter = Highlighter::new(SyntectHighlighter::new())
///     .with_cache(cache.bucket("highlight"));
///
/// let html = highlighter.highlight("fn main() {}", "rust");
/// assert!(html.contains("<pre"));
/// ```
pub struct Highlighter {
    backend: Box<dyn SyntaxHighlighter>,
    cache: Box<dyn CacheBucket>,
    theme: String,
}

impl Highlighter {
    /// Create a highlighter over `backend` with the default theme and no cache.
    #[must_use]
    pub fn new(backend: impl SyntaxHighlighter + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            cache: quill_cache::NullCache.bucket(HIGHLIGHT_BUCKET),
            theme: DEFAULT_THEME.to_owned(),
        }
    }

    /// Set the theme passed to the backend.
    #[must_use]
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Set the cache bucket for rendered markup.
    ///
    /// Defaults to a no-op bucket, so every call reaches the backend.
    #[must_use]
    pub fn with_cache(mut self, cache: Box<dyn CacheBucket>) -> Self {
        self.cache = cache;
        self
    }

    /// Theme in use.
    pub fn theme_name(&self) -> &str {
        &self.theme
    }

    /// Highlight `code` written in `lang`.
    ///
    /// An empty language is treated as plain text. Never fails: a backend
    /// error yields [`fallback_html`], which is not cached, so the next call
    /// with the same arguments tries the backend again.
    pub fn highlight(&self, code: &str, lang: &str) -> String {
        let lang = if lang.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            lang
        };
        let key = HighlightKey {
            lang,
            theme: &self.theme,
            code,
        }
        .compute_hash();

        if let Some(html) = self.cache.get_string(&key) {
            tracing::debug!(lang, "highlight cache hit");
            return html;
        }

        match self.backend.render(code, lang, &self.theme) {
            Ok(html) => {
                tracing::debug!(lang, "highlight cache miss, rendered");
                self.cache.insert_string(&key, &html);
                html
            }
            Err(err) => {
                tracing::warn!(lang, error = %err, "highlighting failed, using plain code block");
                fallback_html(code)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Backends for exercising the highlighter in tests.

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{HighlightError, SyntaxHighlighter};

    /// Backend that counts calls and rejects languages named `unknown*`.
    #[derive(Default, Clone)]
    pub(crate) struct CountingHighlighter {
        pub(crate) calls: Arc<AtomicUsize>,
    }

    impl CountingHighlighter {
        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SyntaxHighlighter for CountingHighlighter {
        fn render(&self, code: &str, lang: &str, theme: &str) -> Result<String, HighlightError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if lang.starts_with("unknown") || lang == "nonexistent-lang" {
                return Err(HighlightError::UnsupportedLanguage(lang.to_owned()));
            }
            Ok(format!(r#"<pre data-lang="{lang}" data-theme="{theme}">{code}</pre>"#))
        }
    }
}
