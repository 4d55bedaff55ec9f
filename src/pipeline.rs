//! Session state and the surface-owning render pipeline.
//!
//! [`SessionState`] is an immutable record: every change returns a new
//! revision and leaves the old one intact, so a failed analysis never
//! disturbs what the host is showing. [`ArtworkPipeline`] owns the only
//! drawing surface; painting takes `&mut self`, so two renders can never
//! race on it.

use rand::Rng;

use crate::{
    error::Result,
    export::{export_image, export_swatch},
    extract::extract_palette,
    mask::apply_mask,
    order::order_palette,
    quantize::Quantizer,
    render::render_artwork,
    surface::RasterSurface,
    types::{ArtworkOptions, ExportFormat, Palette, PaletteEntry, PaletteOrder, RenderMode, ShapeKind},
};

/// Owner of the drawing surface.
#[derive(Clone, Debug)]
pub struct ArtworkPipeline {
    surface: RasterSurface,
}

impl ArtworkPipeline {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            surface: RasterSurface::new(width, height)?,
        })
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    /// Replace the surface with a transparent one of the new size.
    ///
    /// Keeps the current surface if the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if self.surface.dimensions() != (width, height) {
            self.surface = RasterSurface::new(width, height)?;
        }
        Ok(())
    }

    /// Render `palette`, then clip to `shape`.
    pub fn paint(&mut self, palette: &[PaletteEntry], mode: RenderMode, shape: ShapeKind) -> &RasterSurface {
        render_artwork(&mut self.surface, palette, mode);
        apply_mask(&mut self.surface, shape);
        &self.surface
    }

    /// Paint a session's palette with its options, resizing first if needed.
    pub fn paint_session(&mut self, state: &SessionState) -> Result<&RasterSurface> {
        let options = state.options();
        self.resize(options.width, options.height)?;
        Ok(self.paint(state.palette(), options.mode, options.shape))
    }

    /// Encode whatever is currently on the surface.
    pub fn export_image(&self, format: ExportFormat) -> Result<Vec<u8>> {
        export_image(&self.surface, format).inspect_err(|e| log::error!("artwork export failed: {e}"))
    }

    /// Paint then encode in one exclusive borrow.
    pub fn render_and_export(
        &mut self,
        palette: &[PaletteEntry],
        mode: RenderMode,
        shape: ShapeKind,
        format: ExportFormat,
    ) -> Result<Vec<u8>> {
        self.paint(palette, mode, shape);
        self.export_image(format)
    }
}

/// One revision of an interactive session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    revision: u64,
    palette: Palette,
    options: ArtworkOptions,
}

impl SessionState {
    /// Empty session with validated options.
    pub fn new(options: ArtworkOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            revision: 0,
            palette: Palette::default(),
            options,
        })
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn options(&self) -> &ArtworkOptions {
        &self.options
    }

    /// Analyse a new image. The palette replaces the current one entirely.
    ///
    /// On failure the error is logged and returned; `self` is unchanged.
    pub fn analyze<Q, R>(&self, input: &[u8], quantizer: &Q, rng: &mut R) -> Result<Self>
    where
        Q: Quantizer,
        R: Rng + ?Sized,
    {
        log::info!("starting image analysis ({} colours)", self.options.num_colors);
        let palette = extract_palette(input, self.options.num_colors, quantizer)
            .inspect_err(|e| log::error!("image analysis failed: {e}"))?;
        let palette = order_palette(palette, self.options.order, rng);
        log::info!("image analysis completed: {} colours", palette.len());
        Ok(self.next(palette, self.options.clone()))
    }

    /// Switch options. The palette is reordered when the order changes.
    pub fn with_options<R: Rng + ?Sized>(&self, options: ArtworkOptions, rng: &mut R) -> Result<Self> {
        options.validate()?;
        let palette = if options.order != self.options.order {
            order_palette(self.palette.clone(), options.order, rng)
        } else {
            self.palette.clone()
        };
        Ok(self.next(palette, options))
    }

    /// Shuffle the current palette again.
    pub fn remix<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let options = self.options.clone().with_order(PaletteOrder::Shuffled);
        let palette = order_palette(self.palette.clone(), PaletteOrder::Shuffled, rng);
        self.next(palette, options)
    }

    /// CSV swatch of the current palette.
    pub fn swatch(&self) -> String {
        export_swatch(&self.palette)
    }

    fn next(&self, palette: Palette, options: ArtworkOptions) -> Self {
        Self {
            revision: self.revision + 1,
            palette,
            options,
        }
    }
}
