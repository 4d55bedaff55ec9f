//! Encoded image and CSV swatch output.

use std::io::Cursor;

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::{
    error::{Error, Result},
    surface::RasterSurface,
    types::{ExportFormat, PaletteEntry},
};

/// Header row of the swatch table.
pub const SWATCH_HEADER: &str = "Color Index,RGB,HEX,Percentage";

/// Encode the current surface contents.
///
/// PNG keeps the alpha channel. JPEG has none, so the surface is first
/// composited over black and encoded at the encoder's default quality.
pub fn export_image(surface: &RasterSurface, format: ExportFormat) -> Result<Vec<u8>> {
    let image = match format {
        ExportFormat::Png => DynamicImage::ImageRgba8(surface.as_image().clone()),
        ExportFormat::Jpeg => DynamicImage::ImageRgb8(flatten_over_black(surface.as_image())),
    };

    let mut buf = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buf);
        image
            .write_to(&mut cursor, format.image_format())
            .map_err(Error::Encode)?;
    }
    log::debug!("encoded {} artwork: {} bytes", format, buf.len());
    Ok(buf)
}

/// Default download name for an exported artwork.
pub fn artwork_file_name(format: ExportFormat) -> String {
    format!("artwork.{}", format.extension())
}

/// Render the palette as CSV: a header, then one row per entry.
///
/// Rows look like `1,rgb(10,20,30),#0a141e,33.33%`. The RGB column is not
/// quoted, so its inner commas are part of the row as written.
pub fn export_swatch(palette: &[PaletteEntry]) -> String {
    let mut out = String::with_capacity(SWATCH_HEADER.len() + 1 + palette.len() * 40);
    out.push_str(SWATCH_HEADER);
    out.push('\n');
    for (i, entry) in palette.iter().enumerate() {
        out.push_str(&format!(
            "{},{},{},{:.2}%\n",
            i + 1,
            entry.css_rgb(),
            entry.css_hex(),
            entry.percentage
        ));
    }
    out
}

fn flatten_over_black(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        image::Rgb([scale(r), scale(g), scale(b)])
    })
}
