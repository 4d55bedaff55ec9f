//! Colour distance and the CSS text forms used by swatches and the host.

use palette::Srgb;

use crate::error::{Error, Result};

/// Euclidean distance between two colours in 8-bit RGB space.
#[inline]
pub fn color_distance(a: Srgb<u8>, b: Srgb<u8>) -> f64 {
    let dr = a.red as f64 - b.red as f64;
    let dg = a.green as f64 - b.green as f64;
    let db = a.blue as f64 - b.blue as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Index of the colour in `candidates` closest to `color`.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
pub fn nearest_index(color: Srgb<u8>, candidates: &[Srgb<u8>]) -> Option<usize> {
    let mut best = None;
    let mut best_dist = f64::INFINITY;
    for (idx, candidate) in candidates.iter().enumerate() {
        let dist = color_distance(color, *candidate);
        if dist < best_dist {
            best_dist = dist;
            best = Some(idx);
        }
    }
    best
}

/// `rgb(r,g,b)` form, no spaces.
pub fn css_rgb(color: Srgb<u8>) -> String {
    format!("rgb({},{},{})", color.red, color.green, color.blue)
}

/// Lowercase `#rrggbb` form.
pub fn css_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Convert an `rgb(r,g,b)` string to `#rrggbb`.
///
/// Input that does not match `rgb(<digits>,<ws><digits>,<ws><digits>)` is
/// returned unchanged. Channels above 255 are not clamped and simply print
/// with more hex digits.
pub fn rgb_to_hex(rgb: &str) -> String {
    match parse_css_rgb(rgb) {
        Some([r, g, b]) => format!("#{r:02x}{g:02x}{b:02x}"),
        None => rgb.to_string(),
    }
}

/// Parse `#rrggbb` or `rrggbb`.
pub fn parse_hex(hex: &str) -> Result<Srgb<u8>> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(Error::InvalidColor(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| Error::InvalidColor(hex.to_string()))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Parse either CSS form accepted by the host: `rgb(r,g,b)` or `#rrggbb`.
pub fn parse_color(text: &str) -> Result<Srgb<u8>> {
    let text = text.trim();
    if text.starts_with("rgb(") {
        return match parse_css_rgb(text) {
            Some([r, g, b]) if r <= 255 && g <= 255 && b <= 255 => {
                Ok(Srgb::new(r as u8, g as u8, b as u8))
            }
            _ => Err(Error::InvalidColor(text.to_string())),
        };
    }
    parse_hex(text)
}

fn parse_css_rgb(text: &str) -> Option<[u64; 3]> {
    let inner = text.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',');
    let r = parse_channel(parts.next()?)?;
    let g = parse_channel(parts.next()?.trim_start())?;
    let b = parse_channel(parts.next()?.trim_start())?;
    if parts.next().is_some() {
        return None;
    }
    Some([r, g, b])
}

fn parse_channel(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
