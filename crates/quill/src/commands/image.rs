//! `quill image` command implementation.

use std::path::Path;

use clap::Args;
use quill_config::{Config, ImagesConfig};
use quill_media::{ImageOptions, ResponsiveImageOptions, optimize_image, responsive_image};

use super::write_output;
use crate::error::CliError;

/// Arguments for the image command.
#[derive(Args)]
pub(crate) struct ImageArgs {
    /// Asset URL.
    filename: String,

    /// Target width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Target height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Focal point of the asset (e.g. `1234x5678:1235x5679`).
    #[arg(long)]
    focus: Option<String>,

    /// Print `src`, `srcset` and `sizes` as JSON instead of a single URL.
    #[arg(long, conflicts_with_all = ["width", "height"])]
    responsive: bool,
}

impl ImageArgs {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or writing fails.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let content = if self.responsive {
            let config = Config::load(config_path, None)?;
            let options = responsive_options(&config.images, self.focus);
            serde_json::to_string_pretty(&responsive_image(&self.filename, &options))?
        } else {
            optimize_image(
                &self.filename,
                &ImageOptions {
                    width: self.width,
                    height: self.height,
                    focus: self.focus,
                },
            )
        };

        if content.is_empty() {
            return Err(CliError::Validation("image filename is empty".to_owned()));
        }

        write_output(None, &content)?;
        Ok(())
    }
}

/// Merge configured image settings over the media defaults.
fn responsive_options(images: &ImagesConfig, focus: Option<String>) -> ResponsiveImageOptions {
    let defaults = ResponsiveImageOptions::default();
    ResponsiveImageOptions {
        breakpoints: images.breakpoints.clone().unwrap_or(defaults.breakpoints),
        aspect_ratio: images.aspect_ratio.unwrap_or(defaults.aspect_ratio),
        sizes: images.sizes.clone().unwrap_or(defaults.sizes),
        focus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quill_media::image::DEFAULT_SIZES;

    #[test]
    fn test_responsive_options_defaults() {
        let options = responsive_options(&ImagesConfig::default(), None);

        assert_eq!(options.sizes, DEFAULT_SIZES);
        assert!(!options.breakpoints.is_empty());
        assert!(options.focus.is_none());
    }

    #[test]
    fn test_responsive_options_from_config() {
        let images = ImagesConfig {
            breakpoints: Some(vec![320, 640]),
            aspect_ratio: Some(1.0),
            sizes: None,
        };

        let options = responsive_options(&images, Some("1x1:2x2".to_owned()));

        assert_eq!(options.breakpoints, vec![320, 640]);
        assert!((options.aspect_ratio - 1.0).abs() < f64::EPSILON);
        assert_eq!(options.sizes, DEFAULT_SIZES);
        assert_eq!(options.focus.as_deref(), Some("1x1:2x2"));
    }
}
