//! JavaScript bindings for the browser host.
//!
//! The host owns file picking, buttons and downloads; it hands encoded
//! image bytes in and receives encoded artwork bytes, palette data and the
//! CSV swatch back.

use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::{
    color::parse_color,
    error::{Error, Result},
    export::export_swatch,
    extract::extract_palette,
    order::order_palette,
    pipeline::ArtworkPipeline,
    quantize::KMeansQuantizer,
    types::{ExportFormat, Palette, PaletteEntry, PaletteOrder, RenderMode, ShapeKind},
};

fn js_error(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn render_mode(pixel_me: bool) -> RenderMode {
    if pixel_me { RenderMode::Pixelated } else { RenderMode::Banded }
}

/// Extract a palette from `input`, render it and return
/// `{ image: Uint8Array (PNG), palette: [{ color, hex, percentage }], swatch }`.
#[wasm_bindgen]
pub fn analyze_image(
    input: Vec<u8>,
    n_colors: usize,
    remix: bool,
    pixel_me: bool,
    shape: String,
    width: u32,
    height: u32,
) -> Result<Object, JsValue> {
    let shape: ShapeKind = shape.parse().map_err(js_error)?;
    let mut pipeline = ArtworkPipeline::new(width, height).map_err(js_error)?;

    let palette = extract_palette(&input, n_colors, &KMeansQuantizer::default())
        .inspect_err(|e| log::error!("image analysis failed: {e}"))
        .map_err(js_error)?;
    let order = if remix { PaletteOrder::Shuffled } else { PaletteOrder::Ascending };
    let palette = order_palette(palette, order, &mut rand::rng());

    let encoded = pipeline
        .render_and_export(&palette, render_mode(pixel_me), shape, ExportFormat::Png)
        .map_err(js_error)?;

    let palette_js = Array::new();
    for entry in palette.iter() {
        let item = Object::new();
        Reflect::set(&item, &JsValue::from_str("color"), &JsValue::from_str(&entry.css_rgb()))?;
        Reflect::set(&item, &JsValue::from_str("hex"), &JsValue::from_str(&entry.css_hex()))?;
        Reflect::set(&item, &JsValue::from_str("percentage"), &JsValue::from_f64(entry.percentage))?;
        palette_js.push(&item);
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("image"), &Uint8Array::from(encoded.as_slice()))?;
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    Reflect::set(&result, &JsValue::from_str("swatch"), &JsValue::from_str(&export_swatch(&palette)))?;
    Ok(result)
}

/// Re-render a palette the host already holds, without analysing again.
///
/// `colors` are `rgb(r,g,b)` or `#rrggbb` strings, in display order, paired
/// with `percentages`.
#[wasm_bindgen]
pub fn render_palette(
    colors: Array,
    percentages: Vec<f64>,
    pixel_me: bool,
    shape: String,
    width: u32,
    height: u32,
    format: String,
) -> Result<Uint8Array, JsValue> {
    let mut texts = Vec::with_capacity(colors.length() as usize);
    for val in colors.iter() {
        let s = val
            .as_string()
            .ok_or_else(|| JsValue::from_str("Palette values must be strings"))?;
        texts.push(s);
    }
    let palette = palette_from_parts(&texts, &percentages).map_err(js_error)?;
    let shape: ShapeKind = shape.parse().map_err(js_error)?;
    let format: ExportFormat = format.parse().map_err(js_error)?;

    let mut pipeline = ArtworkPipeline::new(width, height).map_err(js_error)?;
    let encoded = pipeline
        .render_and_export(&palette, render_mode(pixel_me), shape, format)
        .map_err(js_error)?;
    Ok(Uint8Array::from(encoded.as_slice()))
}

/// `rgb(r,g,b)` to `#rrggbb`; anything else comes back unchanged.
#[wasm_bindgen]
pub fn rgb_to_hex(rgb: String) -> String {
    crate::color::rgb_to_hex(&rgb)
}

/// Pair host colour strings with their percentages.
fn palette_from_parts(colors: &[String], percentages: &[f64]) -> Result<Palette> {
    if colors.len() != percentages.len() {
        return Err(Error::InvalidColor(format!(
            "{} colours but {} percentages",
            colors.len(),
            percentages.len()
        )));
    }
    colors
        .iter()
        .zip(percentages)
        .map(|(text, &pct)| Ok(PaletteEntry::new(parse_color(text)?, pct)))
        .collect::<Result<Vec<_>>>()
        .map(Palette::new)
}
