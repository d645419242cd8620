//! Rate → band-width scaling.

use crate::constants::TARGET_SCALED_TRUNK_WIDTH;
use crate::reconcile::Reconciliation;

/// Minimum drawn width of any band.
pub const MIN_BAND_WIDTH: f64 = 1.0;

/// A single multiplier mapping rates to band widths.
///
/// The widest trunk (generation, grid import, or consumers, each including
/// its synthetic share) is scaled to [`TARGET_SCALED_TRUNK_WIDTH`]. Totals
/// below 1 are treated as 1 so an all-zero diagram does not blow up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    multiplier: f64,
}

impl Scale {
    #[must_use]
    pub fn from_reconciliation(reconciliation: &Reconciliation) -> Self {
        Self::for_widest(
            reconciliation
                .generation_total()
                .max(reconciliation.grid_in_total())
                .max(reconciliation.consumer_total()),
        )
    }

    /// Scale for a given widest-trunk rate.
    #[must_use]
    pub fn for_widest(widest: f64) -> Self {
        let widest = if widest.is_finite() { widest.max(1.0) } else { f64::MAX };
        Self {
            multiplier: TARGET_SCALED_TRUNK_WIDTH / widest,
        }
    }

    #[must_use]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Band width for `rate`, never thinner than [`MIN_BAND_WIDTH`].
    #[must_use]
    pub fn rate_to_width(&self, rate: f64) -> f64 {
        (rate * self.multiplier).max(MIN_BAND_WIDTH)
    }
}
