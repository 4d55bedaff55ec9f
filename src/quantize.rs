//! Colour quantization: reduce an image to `k` representative colours.
//!
//! Palette extraction only needs the representatives; it does its own
//! coverage counting afterwards. The [`Quantizer`] trait is the seam for
//! swapping the algorithm (or a fixed palette) in.

use std::{borrow::Cow, collections::HashSet};

use image::{RgbaImage, imageops::FilterType};
use kmeans_colors::{Kmeans, get_kmeans};
use palette::{IntoColor, Lab, Srgb};
use thiserror::Error;

/// Failure reported by a [`Quantizer`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantizeError {
    /// No usable (non-transparent) pixels
    #[error("image has no opaque pixels")]
    EmptyImage,

    /// Zero representatives requested
    #[error("cannot quantize to {0} colours")]
    InvalidCount(usize),

    /// The quantizer produced nothing for a non-empty image
    #[error("quantizer returned no colours")]
    NoColors,
}

/// Produces up to `k` representative colours for an image.
pub trait Quantizer {
    fn quantize(&self, image: &RgbaImage, k: usize) -> Result<Vec<Srgb<u8>>, QuantizeError>;
}

impl<Q: Quantizer + ?Sized> Quantizer for &Q {
    fn quantize(&self, image: &RgbaImage, k: usize) -> Result<Vec<Srgb<u8>>, QuantizeError> {
        (**self).quantize(image, k)
    }
}

/// K-means clustering in CIELAB.
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansQuantizer {
    /// Iteration cap per run.
    pub max_iter: usize,
    /// Convergence threshold on centroid movement.
    pub converge: f32,
    /// Seed of the first run; run `n` uses `seed + n`.
    pub seed: u64,
    /// Independent runs; the lowest-score result wins.
    pub runs: u32,
    /// Longest side the image is shrunk to before clustering, if any.
    pub max_side: Option<u32>,
}

impl Default for KMeansQuantizer {
    fn default() -> Self {
        Self {
            max_iter: 20,
            converge: 1e-4,
            seed: 0,
            runs: 1,
            max_side: Some(256),
        }
    }
}

impl KMeansQuantizer {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs.max(1);
        self
    }

    pub fn with_max_side(mut self, max_side: Option<u32>) -> Self {
        self.max_side = max_side;
        self
    }

    fn working_image<'a>(&self, image: &'a RgbaImage) -> Cow<'a, RgbaImage> {
        let (w, h) = image.dimensions();
        match self.max_side {
            Some(side) if side > 0 && w.max(h) > side => {
                let ratio = side as f32 / w.max(h) as f32;
                let down_w = ((w as f32) * ratio).round().max(1.0) as u32;
                let down_h = ((h as f32) * ratio).round().max(1.0) as u32;
                Cow::Owned(image::imageops::resize(
                    image,
                    down_w,
                    down_h,
                    FilterType::Nearest,
                ))
            }
            _ => Cow::Borrowed(image),
        }
    }
}

impl Quantizer for KMeansQuantizer {
    fn quantize(&self, image: &RgbaImage, k: usize) -> Result<Vec<Srgb<u8>>, QuantizeError> {
        if k == 0 {
            return Err(QuantizeError::InvalidCount(k));
        }

        let working = self.working_image(image);

        // Transparent pixels carry no colour information
        let mut lab_pixels: Vec<Lab> = Vec::with_capacity(working.as_raw().len() / 4);
        let mut distinct = HashSet::new();
        for chunk in working.as_raw().chunks_exact(4) {
            if chunk[3] == 0 {
                continue;
            }
            if distinct.len() < k {
                distinct.insert([chunk[0], chunk[1], chunk[2]]);
            }
            let srgb = Srgb::<u8>::new(chunk[0], chunk[1], chunk[2]);
            lab_pixels.push(srgb.into_linear::<f32>().into_color());
        }
        if lab_pixels.is_empty() {
            return Err(QuantizeError::EmptyImage);
        }

        // k-means++ cannot seed more centroids than there are distinct colours
        let k = k.min(distinct.len());
        log::debug!("k-means over {} pixels, k = {k}", lab_pixels.len());

        let mut best: Option<Kmeans<Lab>> = None;
        for run in 0..self.runs.max(1) {
            let seed = self.seed.wrapping_add(run as u64);
            let result = get_kmeans(k, self.max_iter, self.converge, false, &lab_pixels, seed);
            if best.as_ref().is_none_or(|current| result.score < current.score) {
                best = Some(result);
            }
        }
        let kmeans = best.ok_or(QuantizeError::NoColors)?;

        let centroids: Vec<Srgb<u8>> = kmeans
            .centroids
            .iter()
            .map(|&lab| {
                let rgb_f32: Srgb<f32> = Srgb::from_linear(lab.into_color());
                rgb_f32.into_format::<u8>()
            })
            .collect();

        if centroids.is_empty() {
            return Err(QuantizeError::NoColors);
        }
        Ok(centroids)
    }
}

/// A caller-supplied palette, used as-is instead of clustering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedPalette(pub Vec<Srgb<u8>>);

impl Quantizer for FixedPalette {
    fn quantize(&self, image: &RgbaImage, k: usize) -> Result<Vec<Srgb<u8>>, QuantizeError> {
        if k == 0 {
            return Err(QuantizeError::InvalidCount(k));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(QuantizeError::EmptyImage);
        }
        if self.0.is_empty() {
            return Err(QuantizeError::NoColors);
        }
        Ok(self.0.iter().copied().take(k).collect())
    }
}
