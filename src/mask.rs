//! Clip a rendered surface to a silhouette.

use crate::{surface::RasterSurface, types::ShapeKind};

/// Clip `surface` in place to `shape`.
///
/// The current contents are copied aside, the surface is cleared, and the
/// copy is drawn back through the clip region. Pixels inside keep their
/// exact value, the rest become fully transparent.
pub fn apply_mask(surface: &mut RasterSurface, shape: ShapeKind) {
    let (width, height) = surface.dimensions();
    let region = match shape {
        ShapeKind::Rectangle => return,
        ShapeKind::Circle => ClipRegion::circle(width, height),
        ShapeKind::Square => ClipRegion::square(width, height),
    };

    let snapshot = surface.snapshot();
    surface.redraw_clipped(&snapshot, |x, y| region.contains(x, y));
}

/// Geometry of a clip, in continuous surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipRegion {
    Circle { cx: f64, cy: f64, radius: f64 },
    Rect { x0: f64, y0: f64, x1: f64, y1: f64 },
}

impl ClipRegion {
    /// Circle inscribed in a `width × height` surface.
    pub fn circle(width: u32, height: u32) -> Self {
        ClipRegion::Circle {
            cx: width as f64 / 2.0,
            cy: height as f64 / 2.0,
            radius: width.min(height) as f64 / 2.0,
        }
    }

    /// Centred square with side `min(width, height)`.
    pub fn square(width: u32, height: u32) -> Self {
        let side = width.min(height) as f64;
        let x0 = (width as f64 - side) / 2.0;
        let y0 = (height as f64 - side) / 2.0;
        ClipRegion::Rect {
            x0,
            y0,
            x1: x0 + side,
            y1: y0 + side,
        }
    }

    /// Whether pixel `(x, y)` is drawn, sampled at its centre.
    ///
    /// A circle keeps pixels whose centre lies within half a pixel inside
    /// the rim, and never fewer than the pixels touching the circle's centre.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        let px = x as f64 + 0.5;
        let py = y as f64 + 0.5;
        match *self {
            ClipRegion::Circle { cx, cy, radius } => {
                let dx = px - cx;
                let dy = py - cy;
                let inset = (radius - 0.5).max(0.0);
                dx * dx + dy * dy <= (inset * inset).max(0.5)
            }
            ClipRegion::Rect { x0, y0, x1, y1 } => px >= x0 && px < x1 && py >= y0 && py < y1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use palette::Srgb;

    fn filled(width: u32, height: u32) -> RasterSurface {
        let mut surface = RasterSurface::new(width, height).unwrap();
        surface.fill_rect(0, 0, width, height, Srgb::new(12, 34, 56));
        surface
    }

    #[test]
    fn rectangle_is_identity() {
        let mut surface = filled(7, 3);
        let before = surface.clone();
        apply_mask(&mut surface, ShapeKind::Rectangle);
        assert_eq!(surface, before);
    }

    #[test]
    fn circle_keeps_centre_drops_corners() {
        let mut sizes = vec![(800, 600), (600, 800), (2, 50), (31, 10), (64, 64)];
        for w in 2..=12 {
            for h in 2..=12 {
                // on 2x2 every pixel is both a corner and the centre
                if (w, h) != (2, 2) {
                    sizes.push((w, h));
                }
            }
        }
        for (w, h) in sizes {
            let mut surface = filled(w, h);
            apply_mask(&mut surface, ShapeKind::Circle);
            assert_eq!(surface.pixel(w / 2, h / 2).0[3], 255, "centre of {w}x{h}");
            for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
                assert_eq!(surface.pixel(x, y).0[3], 0, "corner ({x},{y}) of {w}x{h}");
            }
        }
    }

    #[test]
    fn circle_preserves_inside_values() {
        let mut surface = filled(40, 40);
        apply_mask(&mut surface, ShapeKind::Circle);
        assert_eq!(surface.pixel(20, 20), Rgba([12, 34, 56, 255]));
        assert_eq!(surface.pixel(20, 1), Rgba([12, 34, 56, 255]));
        assert_eq!(surface.pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn small_circles_clear_their_corners() {
        let mut surface = filled(3, 3);
        apply_mask(&mut surface, ShapeKind::Circle);
        let alphas: Vec<u8> = surface.as_image().pixels().map(|px| px.0[3]).collect();
        assert_eq!(alphas, vec![0, 255, 0, 255, 255, 255, 0, 255, 0]);

        let mut surface = filled(2, 3);
        apply_mask(&mut surface, ShapeKind::Circle);
        let alphas: Vec<u8> = surface.as_image().pixels().map(|px| px.0[3]).collect();
        assert_eq!(alphas, vec![0, 0, 255, 255, 0, 0]);
    }

    #[test]
    fn square_clips_long_axis() {
        let mut surface = filled(10, 4);
        apply_mask(&mut surface, ShapeKind::Square);
        // side 4, columns 3..7 survive
        for x in 0..10 {
            let expected = if (3..7).contains(&x) { 255 } else { 0 };
            for y in 0..4 {
                assert_eq!(surface.pixel(x, y).0[3], expected, "({x},{y})");
            }
        }

        let mut surface = filled(4, 9);
        apply_mask(&mut surface, ShapeKind::Square);
        // offset 2.5: rows whose centre falls in [2.5, 6.5)
        let kept: Vec<u32> = (0..9).filter(|&y| surface.pixel(0, y).0[3] == 255).collect();
        assert_eq!(kept, vec![2, 3, 4, 5]);
    }

    #[test]
    fn square_on_square_surface_is_identity() {
        let mut surface = filled(6, 6);
        let before = surface.clone();
        apply_mask(&mut surface, ShapeKind::Square);
        assert_eq!(surface, before);
    }
}
