//! `quill date` command implementation.

use clap::Args;
use quill_media::{format_date, format_date_iso, parse_date};

use super::write_output;
use crate::error::CliError;

/// Arguments for the date command.
#[derive(Args)]
pub(crate) struct DateArgs {
    /// Date string (`2024-03-09`, `2024-03-09 14:30`, RFC 3339).
    value: String,

    /// Print `YYYY-MM-DD` instead of `DD.MM.YYYY`.
    #[arg(long)]
    iso: bool,

    /// Fail on unparseable input instead of printing "Invalid Date".
    #[arg(long)]
    strict: bool,
}

impl DateArgs {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error in strict mode if the date cannot be parsed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let formatted = self.format()?;
        write_output(None, &formatted)?;
        Ok(())
    }

    fn format(&self) -> Result<String, CliError> {
        if self.strict {
            parse_date(&self.value)?;
        }
        Ok(if self.iso {
            format_date_iso(&self.value)
        } else {
            format_date(&self.value)
        })
    }
}
