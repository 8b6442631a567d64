//! Quill CLI - rich-text content tooling.
//!
//! Provides commands for:
//! - `highlight`: Replace code blocks in a rich-text document with highlighted HTML
//! - `render`: Highlight, then render the document to HTML
//! - `image`: Build resized or responsive image URLs
//! - `date`: Format a publication date

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DateArgs, DocumentArgs, DocumentOutput, ImageArgs};
use output::Output;

/// Quill - rich-text content tooling.
#[derive(Parser)]
#[command(name = "quill", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Highlight code blocks and write the transformed JSON document.
    Highlight(DocumentArgs),
    /// Highlight code blocks and render the document to HTML.
    Render(DocumentArgs),
    /// Print an image variant URL.
    Image(ImageArgs),
    /// Format a date.
    Date(DateArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Highlight(args) => args.execute(config_path, DocumentOutput::Json),
        Commands::Render(args) => args.execute(config_path, DocumentOutput::Html),
        Commands::Image(args) => args.execute(config_path),
        Commands::Date(args) => args.execute(),
    };

    if let Err(err) = result {
        output.failed(&err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_parse_highlight_with_global_flags() {
        let cli = Cli::try_parse_from([
            "quill",
            "highlight",
            "doc.json",
            "--config",
            "site/quill.toml",
            "--no-cache",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(Path::new("site/quill.toml")));
        assert!(matches!(cli.command, Commands::Highlight(_)));
    }

    #[test]
    fn test_parse_render_backend() {
        let cli =
            Cli::try_parse_from(["quill", "render", "-", "--backend", "remote", "-o", "out.html"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Render(_)));
    }

    #[test]
    fn test_reject_unknown_backend() {
        let result = Cli::try_parse_from(["quill", "highlight", "-", "--backend", "pygments"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_image_responsive_conflicts_with_width() {
        let result =
            Cli::try_parse_from(["quill", "image", "a.jpg", "--responsive", "--width", "100"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_date() {
        let cli = Cli::try_parse_from(["quill", "date", "2024-03-09", "--iso"]).unwrap();
        assert!(matches!(cli.command, Commands::Date(_)));
    }
}
