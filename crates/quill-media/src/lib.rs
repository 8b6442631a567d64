//! Media helpers for Quill pages.
//!
//! - [`image`]: URLs for resized image variants and responsive `srcset` data
//! - [`date`]: Publication date formatting

pub mod date;
pub mod image;

pub use date::{DateError, format_date, format_date_iso, parse_date};
pub use image::{ImageOptions, ResponsiveImage, ResponsiveImageOptions, optimize_image, responsive_image};
