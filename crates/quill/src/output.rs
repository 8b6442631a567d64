//! Status reporting for CLI commands.
//!
//! Results go to stdout; everything here goes to stderr so pipelines only see
//! the document.

use std::path::Path;

use console::{Style, Term};

use crate::error::CliError;

/// Reporter for command progress and failures.
pub(crate) struct Output {
    term: Term,
    done: Style,
    notice: Style,
    failure: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            done: Style::new().green(),
            notice: Style::new().yellow(),
            failure: Style::new().red().bold(),
        }
    }

    /// Report a transformed document.
    ///
    /// Green when the result was written to a file, plain when it went to
    /// stdout.
    pub(crate) fn document_done(&self, code_blocks: usize, destination: Option<&Path>) {
        let summary = highlight_summary(code_blocks, destination);
        if destination.is_some() {
            self.line(&self.done.apply_to(summary).to_string());
        } else {
            self.line(&summary);
        }
    }

    /// Warn that the input document was JSON `null`.
    pub(crate) fn empty_document(&self) {
        self.line(
            &self
                .notice
                .apply_to("Document is empty (null), nothing to highlight")
                .to_string(),
        );
    }

    /// Report a failed command.
    pub(crate) fn failed(&self, err: &CliError) {
        self.line(&self.failure.apply_to(format!("Error: {err}")).to_string());
    }

    fn line(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }
}

/// One-line summary of a highlight run.
fn highlight_summary(code_blocks: usize, destination: Option<&Path>) -> String {
    let noun = if code_blocks == 1 {
        "code block"
    } else {
        "code blocks"
    };
    match destination {
        Some(path) => format!("Highlighted {code_blocks} {noun} into {}", path.display()),
        None => format!("Highlighted {code_blocks} {noun}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_highlight_summary() {
        assert_eq!(highlight_summary(0, None), "Highlighted 0 code blocks");
        assert_eq!(highlight_summary(1, None), "Highlighted 1 code block");
        assert_eq!(
            highlight_summary(3, Some(Path::new("out/page.json"))),
            "Highlighted 3 code blocks into out/page.json"
        );
    }
}
