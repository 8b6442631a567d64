//! In-process highlighting backend built on syntect.

use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::consts::PLAIN_TEXT_ALIASES;
use crate::highlight::{HighlightError, SyntaxHighlighter};

/// [`SyntaxHighlighter`] using syntect's bundled grammars and themes.
///
/// Loading the grammar and theme dumps takes a few milliseconds; build one
/// instance and share it.
#[derive(Debug)]
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectHighlighter {
    /// Load the default syntaxes and themes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Whether `theme` is one of the loaded themes.
    pub fn has_theme(&self, theme: &str) -> bool {
        self.theme_set.themes.contains_key(theme)
    }

    /// Names of the loaded themes, sorted.
    pub fn themes(&self) -> Vec<&str> {
        self.theme_set.themes.keys().map(String::as_str).collect()
    }

    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        if PLAIN_TEXT_ALIASES
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(lang))
        {
            return Some(self.syntax_set.find_syntax_plain_text());
        }
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_token(&lang.to_ascii_lowercase()))
    }
}

impl SyntaxHighlighter for SyntectHighlighter {
    fn render(&self, code: &str, lang: &str, theme: &str) -> Result<String, HighlightError> {
        let syntax = self
            .find_syntax(lang)
            .ok_or_else(|| HighlightError::UnsupportedLanguage(lang.to_owned()))?;
        let theme = self
            .theme_set
            .themes
            .get(theme)
            .ok_or_else(|| HighlightError::UnknownTheme(theme.to_owned()))?;

        highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
            .map_err(|e| HighlightError::Render(e.to_string()))
    }
}
