//! Palette values and the option enums shared across the crate.

use std::{fmt, ops::Deref, str::FromStr};

use palette::Srgb;

use crate::{
    MAX_COLORS,
    color::{css_hex, css_rgb},
    error::{Error, Result},
};

/// One extracted colour and the share of sampled pixels nearest to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteEntry {
    pub color: Srgb<u8>,
    /// Coverage in `[0, 100]`.
    pub percentage: f64,
}

impl PaletteEntry {
    pub fn new(color: Srgb<u8>, percentage: f64) -> Self {
        Self { color, percentage }
    }

    /// `rgb(r,g,b)`
    pub fn css_rgb(&self) -> String {
        css_rgb(self.color)
    }

    /// `#rrggbb`
    pub fn css_hex(&self) -> String {
        css_hex(self.color)
    }
}

/// An ordered palette. Order drives band stacking and grid fill.
///
/// A palette produced by extraction has percentages summing to ~100.
/// Reordering never changes them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette(Vec<PaletteEntry>);

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.0
    }

    pub fn into_entries(self) -> Vec<PaletteEntry> {
        self.0
    }

    pub fn colors(&self) -> impl Iterator<Item = Srgb<u8>> + '_ {
        self.0.iter().map(|entry| entry.color)
    }

    pub fn total_percentage(&self) -> f64 {
        self.0.iter().map(|entry| entry.percentage).sum()
    }
}

impl Deref for Palette {
    type Target = [PaletteEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<PaletteEntry>> for Palette {
    fn from(entries: Vec<PaletteEntry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<PaletteEntry> for Palette {
    fn from_iter<I: IntoIterator<Item = PaletteEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a PaletteEntry;
    type IntoIter = std::slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Checks a requested palette size.
pub fn validate_color_count(k: usize) -> Result<usize> {
    if (1..=MAX_COLORS).contains(&k) {
        Ok(k)
    } else {
        Err(Error::InvalidColorCount(k))
    }
}

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $canonical:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($canonical $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(Error::UnknownVariant { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

option_enum! {
    /// Silhouette the artwork is clipped to.
    ShapeKind, "shape" {
        /// No clipping
        #[default]
        Rectangle => "rectangle" | "rect",
        Square => "square",
        Circle => "circle",
    }
}

option_enum! {
    /// Layout used to paint the palette.
    RenderMode, "render mode" {
        /// Full-width bands sized by coverage
        #[default]
        Banded => "banded" | "block" | "bands",
        /// Square blocks striped by palette index
        Pixelated => "pixelated" | "pixel" | "pixel-me",
    }
}

option_enum! {
    /// Order of palette entries before rendering.
    PaletteOrder, "palette order" {
        /// Increasing coverage, stable
        #[default]
        Ascending => "ascending" | "original",
        /// Random permutation ("remix")
        Shuffled => "shuffled" | "remix",
    }
}

option_enum! {
    /// Encoded image format for artwork export.
    ExportFormat, "export format" {
        #[default]
        Png => "png",
        Jpeg => "jpeg" | "jpg",
    }
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Everything that shapes one artwork besides the source image.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtworkOptions {
    pub num_colors: usize,
    pub order: PaletteOrder,
    pub mode: RenderMode,
    pub shape: ShapeKind,
    pub width: u32,
    pub height: u32,
}

impl Default for ArtworkOptions {
    fn default() -> Self {
        Self {
            num_colors: 5,
            order: PaletteOrder::Ascending,
            mode: RenderMode::Banded,
            shape: ShapeKind::Rectangle,
            width: 800,
            height: 600,
        }
    }
}

impl ArtworkOptions {
    pub fn with_num_colors(mut self, num_colors: usize) -> Self {
        self.num_colors = num_colors;
        self
    }

    pub fn with_order(mut self, order: PaletteOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_color_count(self.num_colors)?;
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
