//! `quill highlight` and `quill render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use quill_cache::{Cache, MemoryCache};
use quill_config::{CliSettings, Config, HighlightBackend};
use quill_richtext::{
    HIGHLIGHT_BUCKET, Highlighter, RemoteHighlighter, RichTextTransformer, SyntaxHighlighter,
    SyntectHighlighter, document_to_json, parse_document, render_html,
};

use super::{read_input, write_output};
use crate::error::CliError;
use crate::output::Output;

/// What a document command writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DocumentOutput {
    /// The transformed rich-text JSON.
    Json,
    /// HTML rendered from the transformed tree.
    Html,
}

/// Arguments shared by the document commands.
#[derive(Args)]
pub(crate) struct DocumentArgs {
    /// Rich-text JSON document (`-` for stdin).
    input: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Highlighting theme (overrides config).
    #[arg(long)]
    theme: Option<String>,

    /// Highlighting backend: syntect or remote (overrides config).
    #[arg(long)]
    backend: Option<HighlightBackend>,

    /// Remote highlighting service URL (overrides config).
    #[arg(long, env = "QUILL_HIGHLIGHT_URL")]
    remote_url: Option<String>,

    /// Disable the highlight cache.
    #[arg(long)]
    no_cache: bool,
}

impl DocumentArgs {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, parsing or writing fails.
    pub(crate) fn execute(
        self,
        config_path: Option<&Path>,
        mode: DocumentOutput,
    ) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            theme: self.theme,
            backend: self.backend,
            remote_url: self.remote_url,
            cache_enabled: self.no_cache.then_some(false),
        };
        let config = Config::load(config_path, Some(&cli_settings))?;

        let input = read_input(&self.input)?;
        let cache = MemoryCache::new();
        let transformer = build_transformer(&config, &cache)?;

        let processed = process_document(&transformer, &input, mode)?;
        if processed.absent {
            output.empty_document();
        }

        write_output(self.output.as_deref(), &processed.content)?;

        output.document_done(processed.code_blocks, self.output.as_deref());

        Ok(())
    }
}

/// Result of processing one document.
#[derive(Debug)]
pub(crate) struct ProcessedDocument {
    /// Serialized output.
    pub(crate) content: String,
    /// Code blocks found in the input.
    pub(crate) code_blocks: usize,
    /// Whether the input was a JSON `null`.
    pub(crate) absent: bool,
}

/// Build a transformer from the loaded configuration.
///
/// The cache, when enabled, is a bucket of `cache`.
pub(crate) fn build_transformer(
    config: &Config,
    cache: &MemoryCache,
) -> Result<RichTextTransformer, CliError> {
    let theme = &config.highlight.theme;
    let backend: Box<dyn SyntaxHighlighter> = match config.highlight.backend {
        HighlightBackend::Syntect => {
            let syntect = SyntectHighlighter::new();
            if !syntect.has_theme(theme) {
                return Err(CliError::Validation(format!(
                    "unknown theme '{theme}' (available: {})",
                    syntect.themes().join(", ")
                )));
            }
            Box::new(syntect)
        }
        HighlightBackend::Remote => {
            let url = config.highlight.remote_url.as_deref().ok_or_else(|| {
                CliError::Validation("remote backend requires a remote URL".to_owned())
            })?;
            Box::new(RemoteHighlighter::new(url).timeout(config.highlight.timeout()))
        }
    };

    let mut highlighter = Highlighter::new(backend).theme(theme.as_str());
    if config.cache.enabled {
        highlighter = highlighter.with_cache(cache.bucket(HIGHLIGHT_BUCKET));
    } else {
        tracing::info!("highlight cache disabled");
    }

    Ok(RichTextTransformer::new(highlighter))
}

/// Parse, transform and serialize one document.
pub(crate) fn process_document(
    transformer: &RichTextTransformer,
    input: &str,
    mode: DocumentOutput,
) -> Result<ProcessedDocument, CliError> {
    let document = parse_document(input)?;
    let absent = document.is_none();
    let code_blocks = document.as_ref().map_or(0, |doc| doc.code_block_count());

    let transformed = transformer.transform(document);
    let content = match mode {
        DocumentOutput::Json => document_to_json(transformed.as_ref())?,
        DocumentOutput::Html => transformed.as_ref().map(render_html).unwrap_or_default(),
    };

    Ok(ProcessedDocument {
        content,
        code_blocks,
        absent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    const DOC: &str = r#"{
        "type": "doc",
        "content": [
            { "type": "paragraph", "content": [
                { "type": "text", "text": "See ", "marks": [] },
                { "type": "text", "text": "docs", "marks": [{ "type": "link", "attrs": { "href": "/docs", "target": "_blank" } }] }
            ]},
            { "type": "code_block", "attrs": { "class": "language-rust" }, "content": [
                { "type": "text", "text": "fn main() {}" }
            ]},
            { "type": "code_block", "attrs": { "class": "language-nope-not-real" }, "content": [
                { "type": "text", "text": "a < b" }
            ]}
        ]
    }"#;

    fn transformer() -> RichTextTransformer {
        build_transformer(&Config::default(), &MemoryCache::new()).unwrap()
    }

    #[test]
    fn test_process_json() {
        let processed = process_document(&transformer(), DOC, DocumentOutput::Json).unwrap();
        assert_eq!(processed.code_blocks, 2);
        assert!(!processed.absent);

        let value: Value = serde_json::from_str(&processed.content).unwrap();
        let content = value["content"].as_array().unwrap();
        assert_eq!(content[0]["type"], "paragraph");
        assert_eq!(content[1]["type"], "html");
        assert!(content[1]["text"].as_str().unwrap().contains("<pre"));
        assert_eq!(
            content[2]["text"],
            r#"<pre class="highlight"><code>a &lt; b</code></pre>"#
        );
    }

    #[test]
    fn test_process_html() {
        let processed = process_document(&transformer(), DOC, DocumentOutput::Html).unwrap();
        assert!(processed.content.starts_with(
            r#"<p>See <a href="/docs" target="_blank" rel="noopener noreferrer">docs</a></p><pre"#
        ));
        assert!(
            processed
                .content
                .ends_with(r#"<pre class="highlight"><code>a &lt; b</code></pre>"#)
        );
    }

    #[test]
    fn test_process_null_document() {
        let processed = process_document(&transformer(), "null", DocumentOutput::Json).unwrap();
        assert!(processed.absent);
        assert_eq!(processed.content, "null");

        let html = process_document(&transformer(), "null", DocumentOutput::Html).unwrap();
        assert_eq!(html.content, "");
    }

    #[test]
    fn test_process_invalid_json() {
        let err = process_document(&transformer(), "{", DocumentOutput::Json).unwrap_err();
        assert!(matches!(err, CliError::Document(_)));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let mut config = Config::default();
        config.highlight.theme = "no-such-theme".to_owned();

        let Err(err) = build_transformer(&config, &MemoryCache::new()) else {
            panic!("expected unknown theme error");
        };
        assert!(err.to_string().contains("no-such-theme"));
    }

    #[test]
    fn test_cache_bucket_populated_when_enabled() {
        let cache = MemoryCache::new();
        let transformer = build_transformer(&Config::default(), &cache).unwrap();

        process_document(&transformer, DOC, DocumentOutput::Json).unwrap();

        // Only the successfully highlighted block is cached
        assert_eq!(cache.bucket(HIGHLIGHT_BUCKET).len(), 1);
    }

    #[test]
    fn test_cache_disabled() {
        let cache = MemoryCache::new();
        let mut config = Config::default();
        config.cache.enabled = false;
        let transformer = build_transformer(&config, &cache).unwrap();

        process_document(&transformer, DOC, DocumentOutput::Json).unwrap();

        assert!(cache.bucket(HIGHLIGHT_BUCKET).is_empty());
    }
}
