//! Palette ordering before rendering.

use rand::{Rng, seq::SliceRandom};

use crate::types::{Palette, PaletteOrder};

/// Reorder `palette` without touching its colours or percentages.
///
/// [`PaletteOrder::Ascending`] is a stable sort on coverage.
/// [`PaletteOrder::Shuffled`] draws a uniform permutation from `rng`; pass
/// a seeded generator for a reproducible remix.
pub fn order_palette<R: Rng + ?Sized>(palette: Palette, order: PaletteOrder, rng: &mut R) -> Palette {
    let mut entries = palette.into_entries();
    match order {
        PaletteOrder::Ascending => {
            entries.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));
        }
        PaletteOrder::Shuffled => entries.shuffle(rng),
    }
    Palette::new(entries)
}
