//! Capture detection between falling items and the catcher
//!
//! Capture geometry is deliberately generous: a vertical band near the
//! bottom of the field (not a single scanline) and a horizontal overlap
//! test padded by a forgiveness margin, so near-misses still land.

use glam::Vec2;

use crate::tuning::Tuning;

/// Effective catcher half-width, widened while boosted
#[inline]
pub fn catcher_half_width(tuning: &Tuning, boosted: bool) -> f32 {
    if boosted {
        tuning.catcher_half_width_boosted
    } else {
        tuning.catcher_half_width
    }
}

/// Whether a vertical position lies inside the capture band.
/// Both edges are inclusive.
#[inline]
pub fn in_capture_band(tuning: &Tuning, y: f32) -> bool {
    y >= tuning.capture_band_top && y <= tuning.capture_band_bottom
}

/// Whether an item's horizontal extent overlaps the catcher's reach:
/// item position padded by its half-width against catcher position
/// padded by half-width plus forgiveness. Touching edges count.
#[inline]
pub fn overlaps_catcher(tuning: &Tuning, item_x: f32, catcher_x: f32, catcher_half: f32) -> bool {
    let reach = catcher_half + tuning.catch_forgiveness + tuning.item_half_width;
    (item_x - catcher_x).abs() <= reach
}

/// Full capture test for one item against the catcher
pub fn captures(tuning: &Tuning, item_pos: Vec2, catcher_x: f32, catcher_half: f32) -> bool {
    in_capture_band(tuning, item_pos.y)
        && overlaps_catcher(tuning, item_pos.x, catcher_x, catcher_half)
}
