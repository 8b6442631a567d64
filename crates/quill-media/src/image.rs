//! Image variant URLs.
//!
//! CMS asset URLs can be suffixed with a resize path understood by the
//! asset CDN:
//!
//! ```text
//! {asset}/m/{width}x{height}/filters:format(webp)[:focal({focus})]/
//! ```
//!
//! A zero width or height lets the CDN keep the aspect ratio. `focus` is the
//! focal point stored with the asset (`"1234x5678:1235x5679"`), used to crop
//! around the subject.

use serde::Serialize;

/// Widths used for `srcset` when none are configured.
pub const DEFAULT_BREAKPOINTS: &[u32] = &[480, 768, 1024, 1280, 1536, 1920, 2560];

/// Aspect ratio used when none is configured (16:9).
pub const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;

/// `sizes` attribute used when none is configured.
pub const DEFAULT_SIZES: &str = "(max-width: 768px) 100vw, (max-width: 1024px) 80vw, 70vw";

/// Path segment separating the asset from its resize parameters.
const RESIZE_SEGMENT: &str = "/m/";

/// Requested variant of a single image.
#[derive(Debug, Clone, Default)]
pub struct ImageOptions {
    /// Target width in pixels.
    pub width: Option<u32>,
    /// Target height in pixels.
    pub height: Option<u32>,
    /// Focal point of the asset.
    pub focus: Option<String>,
}

/// Parameters for responsive image data.
#[derive(Debug, Clone)]
pub struct ResponsiveImageOptions {
    /// Widths to generate variants for.
    pub breakpoints: Vec<u32>,
    /// Width divided by height.
    pub aspect_ratio: f64,
    /// Value of the `sizes` attribute.
    pub sizes: String,
    /// Focal point of the asset.
    pub focus: Option<String>,
}

impl Default for ResponsiveImageOptions {
    fn default() -> Self {
        Self {
            breakpoints: DEFAULT_BREAKPOINTS.to_vec(),
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            sizes: DEFAULT_SIZES.to_owned(),
            focus: None,
        }
    }
}

/// Attributes for a responsive `<img>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponsiveImage {
    /// Largest variant, for browsers ignoring `srcset`.
    pub src: String,
    /// Comma-separated `"{url} {width}w"` entries.
    pub srcset: String,
    /// `sizes` attribute.
    pub sizes: String,
}

/// URL of a resized WebP variant of `filename`.
///
/// Any resize suffix already present on `filename` is replaced. Without a
/// width or height the bare asset URL is returned. An empty filename yields an
/// empty string.
///
/// # Examples
///
/// ```
/// use quill_media::{ImageOptions, optimize_image};
///
/// let url = optimize_image(
///     "https://a.example.com/f/1/hero.jpg",
///     &ImageOptions { width: Some(800), ..Default::default() },
/// );
/// assert_eq!(url, "https://a.example.com/f/1/hero.jpg/m/800x0/filters:format(webp)/");
/// ```
pub fn optimize_image(filename: &str, options: &ImageOptions) -> String {
    if filename.is_empty() {
        return String::new();
    }

    let base = filename.split(RESIZE_SEGMENT).next().unwrap_or(filename);
    let width = options.width.unwrap_or(0);
    let height = options.height.unwrap_or(0);

    if width == 0 && height == 0 {
        return base.to_owned();
    }

    let mut filters = vec!["format(webp)".to_owned()];
    if let Some(focus) = options.focus.as_deref().filter(|focus| !focus.is_empty()) {
        filters.push(format!("focal({focus})"));
    }

    format!(
        "{base}{RESIZE_SEGMENT}{width}x{height}/filters:{}/",
        filters.join(":")
    )
}

/// `src`, `srcset` and `sizes` for a responsive `<img>`.
///
/// Heights follow the aspect ratio (rounded); `src` is the variant for the
/// largest breakpoint. A non-positive or non-finite aspect ratio falls back to
/// 16:9. Without breakpoints `src` is the bare asset URL and `srcset` is
/// empty.
pub fn responsive_image(filename: &str, options: &ResponsiveImageOptions) -> ResponsiveImage {
    if filename.is_empty() {
        return ResponsiveImage::default();
    }

    let aspect_ratio = if options.aspect_ratio.is_finite() && options.aspect_ratio > 0.0 {
        options.aspect_ratio
    } else {
        DEFAULT_ASPECT_RATIO
    };

    let variant = |width: u32| {
        optimize_image(
            filename,
            &ImageOptions {
                width: Some(width),
                height: Some(scaled_height(width, aspect_ratio)),
                focus: options.focus.clone(),
            },
        )
    };

    let srcset = options
        .breakpoints
        .iter()
        .map(|&width| format!("{} {width}w", variant(width)))
        .collect::<Vec<_>>()
        .join(", ");

    let src = match options.breakpoints.iter().max() {
        Some(&largest) => variant(largest),
        None => optimize_image(filename, &ImageOptions::default()),
    };

    ResponsiveImage {
        src,
        srcset,
        sizes: options.sizes.clone(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_height(width: u32, aspect_ratio: f64) -> u32 {
    (f64::from(width) / aspect_ratio).round() as u32
}
