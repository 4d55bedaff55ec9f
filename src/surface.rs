//! The raster the artwork is painted on.

use image::{Rgba, RgbaImage};
use palette::Srgb;

use crate::error::{Error, Result};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Fixed-size RGBA8 drawing surface.
///
/// Offers the few canvas operations rendering needs: clear, opaque
/// rectangle fill, and redrawing a snapshot through a clip region.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterSurface {
    pixels: RgbaImage,
}

impl RasterSurface {
    /// Create a transparent surface. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Reset every pixel to fully transparent black.
    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = TRANSPARENT;
        }
    }

    /// Paint an opaque rectangle. The part outside the surface is dropped.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Srgb<u8>) {
        let x_end = x.saturating_add(width).min(self.width());
        let y_end = y.saturating_add(height).min(self.height());
        let fill = Rgba([color.red, color.green, color.blue, 255]);
        for py in y..y_end {
            for px in x..x_end {
                self.pixels.put_pixel(px, py, fill);
            }
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> RgbaImage {
        self.pixels.clone()
    }

    /// Clear, then copy `source` back only where `inside(x, y)` holds.
    ///
    /// `source` must have the surface's dimensions.
    pub fn redraw_clipped<F>(&mut self, source: &RgbaImage, inside: F)
    where
        F: Fn(u32, u32) -> bool,
    {
        debug_assert_eq!(source.dimensions(), self.dimensions());
        self.clear();
        for (x, y, px) in source.enumerate_pixels() {
            if inside(x, y) {
                self.pixels.put_pixel(x, y, *px);
            }
        }
    }
}
