//! Palette extraction: representatives from a [`Quantizer`], coverage from a
//! fixed-size sample of the image.

use image::{DynamicImage, GenericImageView, Rgba, imageops::FilterType};
use palette::Srgb;

use crate::{
    color::nearest_index,
    error::{Error, Result},
    quantize::Quantizer,
    types::{Palette, PaletteEntry, validate_color_count},
};

/// Side of the square sample grid coverage is measured on.
///
/// Every image is resampled to `SAMPLE_SIZE × SAMPLE_SIZE` regardless of its
/// aspect ratio, so a percentage always has a resolution of 0.01.
pub const SAMPLE_SIZE: u32 = 100;

/// Decode `input` and extract a `k`-colour palette from it.
pub fn extract_palette<Q: Quantizer>(input: &[u8], k: usize, quantizer: &Q) -> Result<Palette> {
    let k = validate_color_count(k)?;
    let img = image::load_from_memory(input).map_err(Error::Decode)?;
    extract_from_image(&img, k, quantizer)
}

/// Extract a `k`-colour palette from an already decoded image.
///
/// Entries keep the quantizer's order. Duplicate representatives are
/// collapsed onto their first occurrence.
pub fn extract_from_image<Q: Quantizer>(
    img: &DynamicImage,
    k: usize,
    quantizer: &Q,
) -> Result<Palette> {
    let k = validate_color_count(k)?;
    let (w, h) = img.dimensions();
    log::debug!("extracting {k} colours from {w}x{h} image");

    let mut rgba = img.to_rgba8();
    // Fully transparent pixels read back as black, whatever RGB they carry
    for px in rgba.pixels_mut().filter(|px| px.0[3] == 0) {
        *px = Rgba([0, 0, 0, 0]);
    }
    let mut representatives = quantizer.quantize(&rgba, k)?;
    let before = representatives.len();
    dedup_in_order(&mut representatives);
    if representatives.len() < before {
        log::warn!(
            "quantizer returned {} duplicate colour(s); palette has {} entries",
            before - representatives.len(),
            representatives.len()
        );
    }

    let sample = image::imageops::resize(&rgba, SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle);
    let samples = sample
        .as_raw()
        .chunks_exact(4)
        .map(|px| Srgb::new(px[0], px[1], px[2]));

    Ok(coverage(&representatives, samples))
}

/// Assign every sample to its nearest representative and turn the counts
/// into percentages of the sample total.
pub fn coverage<I>(representatives: &[Srgb<u8>], samples: I) -> Palette
where
    I: IntoIterator<Item = Srgb<u8>>,
{
    if representatives.is_empty() {
        return Palette::default();
    }

    let mut counts = vec![0u64; representatives.len()];
    let mut total = 0u64;
    for sample in samples {
        if let Some(idx) = nearest_index(sample, representatives) {
            counts[idx] += 1;
        }
        total += 1;
    }

    representatives
        .iter()
        .zip(counts)
        .map(|(&color, count)| {
            let percentage = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            PaletteEntry::new(color, percentage)
        })
        .collect()
}

fn dedup_in_order(colors: &mut Vec<Srgb<u8>>) {
    let mut seen = Vec::with_capacity(colors.len());
    colors.retain(|c| {
        if seen.contains(c) {
            false
        } else {
            seen.push(*c);
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantize::{FixedPalette, KMeansQuantizer, QuantizeError};
    use image::RgbaImage;

    fn quadrants() -> DynamicImage {
        // top half red, bottom-left green, bottom-right blue
        DynamicImage::ImageRgba8(RgbaImage::from_fn(200, 200, |x, y| {
            if y < 100 {
                Rgba([255, 0, 0, 255])
            } else if x < 100 {
                Rgba([0, 255, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }))
    }

    #[test]
    fn coverage_counts_nearest() {
        let reps = [Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)];
        let samples = [
            Srgb::new(10, 10, 10),
            Srgb::new(250, 250, 250),
            Srgb::new(20, 0, 0),
            Srgb::new(0, 30, 0),
        ];
        let palette = coverage(&reps, samples);
        assert_eq!(palette[0].percentage, 75.0);
        assert_eq!(palette[1].percentage, 25.0);
    }

    #[test]
    fn coverage_tie_goes_to_first() {
        let reps = [Srgb::new(0, 0, 0), Srgb::new(2, 0, 0)];
        let palette = coverage(&reps, [Srgb::new(1, 0, 0)]);
        assert_eq!(palette[0].percentage, 100.0);
        assert_eq!(palette[1].percentage, 0.0);
    }

    #[test]
    fn coverage_of_nothing() {
        assert!(coverage(&[], [Srgb::new(1, 2, 3)]).is_empty());
        let palette = coverage(&[Srgb::new(1, 2, 3)], std::iter::empty());
        assert_eq!(palette[0].percentage, 0.0);
    }

    #[test]
    fn fixed_palette_quadrants() {
        let fixed = FixedPalette(vec![
            Srgb::new(255, 0, 0),
            Srgb::new(0, 255, 0),
            Srgb::new(0, 0, 255),
        ]);
        let palette = extract_from_image(&quadrants(), 3, &fixed).unwrap();
        assert_eq!(palette.len(), 3);
        assert!((palette.total_percentage() - 100.0).abs() < 0.01);
        // the triangle filter blurs one row/column at the boundaries
        assert!((palette[0].percentage - 50.0).abs() <= 1.5);
        assert!((palette[1].percentage - 25.0).abs() <= 1.5);
        assert!((palette[2].percentage - 25.0).abs() <= 1.5);
    }

    #[test]
    fn kmeans_percentages_sum_to_hundred() {
        let quantizer = KMeansQuantizer::default();
        for k in [1, 2, 3, 5] {
            let palette = extract_from_image(&quadrants(), k, &quantizer).unwrap();
            assert!(!palette.is_empty());
            assert!(palette.len() <= k);
            assert!((palette.total_percentage() - 100.0).abs() < 0.01);
        }
    }

    #[test]
    fn duplicates_collapse() {
        let fixed = FixedPalette(vec![Srgb::new(9, 9, 9), Srgb::new(9, 9, 9), Srgb::new(1, 1, 1)]);
        let palette = extract_from_image(&quadrants(), 3, &fixed).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0].color, Srgb::new(9, 9, 9));
    }

    #[test]
    fn rejects_bad_count_and_bytes() {
        let fixed = FixedPalette(vec![Srgb::new(0, 0, 0)]);
        assert!(matches!(
            extract_from_image(&quadrants(), 0, &fixed),
            Err(Error::InvalidColorCount(0))
        ));
        assert!(matches!(
            extract_palette(b"definitely not an image", 3, &fixed),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn transparent_pixels_sample_as_black() {
        // left half hides red behind zero alpha, right half is opaque blue
        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(200, 200, |x, _| {
            if x < 100 {
                Rgba([255, 0, 0, 0])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }));
        let fixed = FixedPalette(vec![
            Srgb::new(255, 0, 0),
            Srgb::new(0, 0, 0),
            Srgb::new(0, 0, 255),
        ]);
        let palette = extract_from_image(&img, 3, &fixed).unwrap();
        assert_eq!(palette[0].percentage, 0.0);
        assert!((palette[1].percentage - 50.0).abs() <= 1.5);
        assert!((palette.total_percentage() - 100.0).abs() < 0.01);
    }

    #[test]
    fn quantizer_failure_is_extraction_error() {
        let transparent =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0])));
        let err = extract_from_image(&transparent, 3, &KMeansQuantizer::default()).unwrap_err();
        assert!(matches!(err, Error::Extraction(QuantizeError::EmptyImage)));
    }
}
