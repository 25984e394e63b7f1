//! Core types and utilities for wire-bond inspection.
//!
//! This crate is intentionally small: borrowed image views, the pixel
//! foreground predicate shared by every detector, and least-squares line
//! fitting. It does *not* depend on any image decoding library.

mod image;
mod line_fit;
mod logger;
mod pixel;

pub use image::{gray_from_rgb, luma, resolve_axis_offset, GrayImage, GrayImageView, RgbImageView};
pub use line_fit::{fit_line, normalize_or_keep, LineFit};
pub use pixel::{is_foreground, normalized_norm, sum_of_squares, PixelCoord, PixelNorm};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{filter_directives, init_with_level, level_for_verbosity};
