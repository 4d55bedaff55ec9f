//! Error types for colour art generation.
//!
//! Every failure here is recoverable: the operation that produced it is
//! abandoned and whatever state the caller held before stays valid.

use thiserror::Error;

use crate::quantize::QuantizeError;

/// Colour art error type
#[derive(Error, Debug)]
pub enum Error {
    /// The source image could not be decoded
    #[error("unable to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The quantizer failed or the image had nothing to quantize
    #[error("palette extraction failed: {0}")]
    Extraction(#[from] QuantizeError),

    /// The rendered surface could not be encoded
    #[error("unable to encode artwork: {0}")]
    Encode(#[source] image::ImageError),

    /// Requested palette size is outside `1..=MAX_COLORS`
    #[error("invalid colour count: {0} (expected 1..={max})", max = crate::MAX_COLORS)]
    InvalidColorCount(usize),

    /// Surface dimensions must both be non-zero
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A colour string was neither `#rrggbb` nor `rgb(r,g,b)`
    #[error("invalid colour: {0:?}")]
    InvalidColor(String),

    /// An option string did not name a known variant
    #[error("unknown {kind}: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Result type alias for colour art operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
