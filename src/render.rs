//! Paint an ordered palette onto a [`RasterSurface`].

use crate::{
    surface::RasterSurface,
    types::{PaletteEntry, RenderMode},
};

/// Clear `surface` and paint `palette` with the given layout.
///
/// An empty palette leaves the surface cleared.
pub fn render_artwork(surface: &mut RasterSurface, palette: &[PaletteEntry], mode: RenderMode) {
    surface.clear();
    if palette.is_empty() {
        log::debug!("nothing to render: empty palette");
        return;
    }

    match mode {
        RenderMode::Banded => render_bands(surface, palette),
        RenderMode::Pixelated => render_blocks(surface, palette),
    }
}

fn render_bands(surface: &mut RasterSurface, palette: &[PaletteEntry]) {
    let width = surface.width();
    for (entry, (start, end)) in palette.iter().zip(band_layout(palette, surface.height())) {
        surface.fill_rect(0, start, width, end - start, entry.color);
    }
}

fn render_blocks(surface: &mut RasterSurface, palette: &[PaletteEntry]) {
    let (width, height) = surface.dimensions();
    let k = palette.len();
    let grid = grid_size(width, height, k);

    for y in (0..height).step_by(grid as usize) {
        let idx = block_row_index(y, height, k);
        let color = palette[idx].color;
        for x in (0..width).step_by(grid as usize) {
            surface.fill_rect(x, y, grid, grid, color);
        }
    }
}

/// Half-open row ranges `(start, end)` of each band, top to bottom.
///
/// Band heights are proportional to each entry's share of the palette's
/// total percentage. Boundaries are rounded from the cumulative share, and
/// the last band always ends at `height`, so the bands tile the surface
/// exactly. A palette whose percentages are all zero gets equal bands.
pub fn band_layout(palette: &[PaletteEntry], height: u32) -> Vec<(u32, u32)> {
    let n = palette.len();
    let total: f64 = palette.iter().map(|e| e.percentage.max(0.0)).sum();
    let share = |entry: &PaletteEntry| {
        if total > 0.0 {
            entry.percentage.max(0.0) / total
        } else {
            1.0 / n as f64
        }
    };

    let mut bands = Vec::with_capacity(n);
    let mut start = 0u32;
    let mut cumulative = 0.0;
    for (i, entry) in palette.iter().enumerate() {
        let end = if i + 1 == n {
            height
        } else {
            cumulative += share(entry);
            let boundary = (cumulative * height as f64).round();
            boundary.clamp(start as f64, height as f64) as u32
        };
        bands.push((start, end));
        start = end;
    }
    bands
}

/// Side of a pixelated block: `floor(sqrt(width * height / k))`, at least 1.
pub fn grid_size(width: u32, height: u32, k: usize) -> u32 {
    if k == 0 {
        return width.max(height).max(1);
    }
    let area = width as f64 * height as f64;
    ((area / k as f64).sqrt().floor() as u32).max(1)
}

/// Palette index of a block row whose top edge is at `y`.
pub fn block_row_index(y: u32, height: u32, k: usize) -> usize {
    let idx = (y as f64 / height as f64 * k as f64).floor() as usize;
    idx.min(k.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use palette::Srgb;

    fn entries(pcts: &[f64]) -> Vec<PaletteEntry> {
        pcts.iter()
            .enumerate()
            .map(|(i, &p)| PaletteEntry::new(Srgb::new(i as u8 * 40, 100, 200 - i as u8 * 30), p))
            .collect()
    }

    fn opaque(color: Srgb<u8>) -> Rgba<u8> {
        Rgba([color.red, color.green, color.blue, 255])
    }

    #[test]
    fn band_heights_follow_percentages() {
        let layout = band_layout(&entries(&[50.0, 30.0, 20.0]), 600);
        assert_eq!(layout, vec![(0, 300), (300, 480), (480, 600)]);
    }

    #[test]
    fn bands_are_contiguous_and_exhaustive() {
        let palette = entries(&[33.33, 33.33, 33.34, 0.0, 12.5]);
        for height in [1, 7, 99, 600, 1001] {
            let layout = band_layout(&palette, height);
            assert_eq!(layout.len(), palette.len());
            assert_eq!(layout[0].0, 0);
            assert_eq!(layout.last().unwrap().1, height);
            assert!(layout.windows(2).all(|w| w[0].1 == w[1].0));
            assert!(layout.iter().all(|(s, e)| s <= e));
        }
    }

    #[test]
    fn zero_total_gets_equal_bands() {
        let layout = band_layout(&entries(&[0.0, 0.0, 0.0, 0.0]), 400);
        assert_eq!(layout, vec![(0, 100), (100, 200), (200, 300), (300, 400)]);
    }

    #[test]
    fn banded_render_paints_rows() {
        let palette = entries(&[50.0, 30.0, 20.0]);
        let mut surface = RasterSurface::new(10, 600).unwrap();
        render_artwork(&mut surface, &palette, RenderMode::Banded);
        assert_eq!(surface.pixel(0, 0), opaque(palette[0].color));
        assert_eq!(surface.pixel(9, 299), opaque(palette[0].color));
        assert_eq!(surface.pixel(5, 300), opaque(palette[1].color));
        assert_eq!(surface.pixel(5, 479), opaque(palette[1].color));
        assert_eq!(surface.pixel(5, 480), opaque(palette[2].color));
        assert_eq!(surface.pixel(9, 599), opaque(palette[2].color));
    }

    #[test]
    fn grid_size_matches_formula() {
        assert_eq!(grid_size(800, 600, 5), 309);
        assert_eq!(grid_size(10, 10, 1), 10);
        assert_eq!(grid_size(2, 2, 20), 1);
    }

    #[test]
    fn pixelated_cells_use_palette_colors() {
        let palette = entries(&[10.0, 20.0, 30.0, 25.0, 15.0]);
        let mut surface = RasterSurface::new(800, 600).unwrap();
        render_artwork(&mut surface, &palette, RenderMode::Pixelated);

        let allowed: Vec<Rgba<u8>> = palette.iter().map(|e| opaque(e.color)).collect();
        assert!(surface.as_image().pixels().all(|px| allowed.contains(px)));

        // rows start at 0, 309 and 618; only the first two are on the surface
        assert_eq!(surface.pixel(0, 0), opaque(palette[0].color));
        assert_eq!(surface.pixel(799, 308), opaque(palette[0].color));
        // floor(309 / 600 * 5) = 2
        assert_eq!(surface.pixel(400, 309), opaque(palette[2].color));
        assert_eq!(surface.pixel(799, 599), opaque(palette[2].color));
    }

    #[test]
    fn block_index_is_clamped() {
        assert_eq!(block_row_index(0, 100, 4), 0);
        assert_eq!(block_row_index(99, 100, 4), 3);
        assert_eq!(block_row_index(100, 100, 4), 3);
    }

    #[test]
    fn render_overwrites_previous_contents() {
        let mut surface = RasterSurface::new(20, 20).unwrap();
        render_artwork(&mut surface, &entries(&[100.0]), RenderMode::Banded);
        render_artwork(&mut surface, &[], RenderMode::Banded);
        assert!(surface.as_image().pixels().all(|px| px.0[3] == 0));

        let first = entries(&[50.0, 50.0]);
        render_artwork(&mut surface, &first, RenderMode::Pixelated);
        let second = entries(&[100.0]);
        render_artwork(&mut surface, &second, RenderMode::Banded);
        assert!(surface.as_image().pixels().all(|px| *px == opaque(second[0].color)));
    }
}
