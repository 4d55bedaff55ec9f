//! Turn a photograph into abstract colour art.
//!
//! The pipeline:
//! 1. Extract a `k`-colour palette ([`extract_palette`]): a [`Quantizer`]
//!    picks the representatives (k-means in Lab by default). Every pixel of
//!    a fixed 100×100 sample is then assigned to its nearest representative
//!    in RGB, which gives each colour's coverage percentage.
//! 2. Order it ([`order_palette`]): ascending coverage, or a random remix.
//! 3. Paint it ([`render_artwork`]) as proportional bands or as blocks.
//! 4. Clip it ([`apply_mask`]) to a square or circle.
//! 5. Export it ([`export_image`], [`export_swatch`]) as PNG/JPEG bytes and a
//!    CSV swatch.
//!
//! [`SessionState`] and [`ArtworkPipeline`] tie these together for an
//! interactive host. The `wasm` module exposes the same flow to JavaScript.

mod color;
mod error;
mod export;
mod extract;
mod mask;
mod order;
mod pipeline;
mod quantize;
mod render;
mod surface;
mod types;

pub mod wasm;

pub use color::{color_distance, css_hex, css_rgb, nearest_index, parse_color, parse_hex, rgb_to_hex};
pub use error::{Error, Result};
pub use export::{SWATCH_HEADER, artwork_file_name, export_image, export_swatch};
pub use extract::{SAMPLE_SIZE, coverage, extract_from_image, extract_palette};
pub use mask::{ClipRegion, apply_mask};
pub use order::order_palette;
pub use pipeline::{ArtworkPipeline, SessionState};
pub use quantize::{FixedPalette, KMeansQuantizer, QuantizeError, Quantizer};
pub use render::{band_layout, block_row_index, grid_size, render_artwork};
pub use surface::RasterSurface;
pub use types::{
    ArtworkOptions, ExportFormat, Palette, PaletteEntry, PaletteOrder, RenderMode, ShapeKind,
    validate_color_count,
};

/// Largest palette a caller may request.
pub const MAX_COLORS: usize = 20;
