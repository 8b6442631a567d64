//! CLI command implementations.

pub(crate) mod date;
pub(crate) mod document;
pub(crate) mod image;

pub(crate) use date::DateArgs;
pub(crate) use document::{DocumentArgs, DocumentOutput};
pub(crate) use image::ImageArgs;

use std::io::{Read, Write};
use std::path::Path;

/// Read a command input; `-` means stdin.
fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin().lock().read_to_string(&mut input)?;
        return Ok(input);
    }
    std::fs::read_to_string(path)
}

/// Write a command result to `path`, or stdout when absent.
fn write_output(path: Option<&Path>, content: &str) -> std::io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, content),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()
        }
    }
}
