//! Energy-conservation reconciliation.
//!
//! Sensors rarely cover every flow in a home, and readings arrive out of step
//! with each other. Reconciliation balances the books so the diagram always
//! shows a coherent picture:
//!
//! ```text
//! x = consumers − grid_import − (generation − grid_export)
//! ```
//!
//! - `x > 0`: demand exceeds tracked supply, so an unmodeled *source* exists.
//!   With no grid route tracked at all it is assumed to be the grid (phantom
//!   grid import); otherwise it is assumed to be generation.
//! - `x ≤ 0`: the surplus goes to the untracked consumer.
//!
//! This split (surplus demand becomes a phantom source, surplus supply becomes
//! an untracked sink) is a heuristic for homes that under-instrument their
//! consumption. It is a policy choice, not physics.

use crate::route::Route;

/// Id given to the phantom source route.
pub const PHANTOM_ROUTE_ID: &str = "untracked";
/// Display text of the phantom source route.
pub const PHANTOM_ROUTE_TEXT: &str = "Unknown";
/// Display text of the untracked consumer route.
pub const UNTRACKED_ROUTE_TEXT: &str = "Untracked";

/// Tracked inputs to reconciliation.
///
/// `grid_in` / `grid_out` are `None` when the corresponding route is not
/// tracked at all, which is different from a tracked rate of zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackedTotals {
    pub grid_in: Option<f64>,
    pub grid_out: Option<f64>,
    pub generation: f64,
    pub consumers: f64,
}

/// The synthetic source invented to cover unexplained demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phantom {
    GridIn(f64),
    Generation(f64),
}

impl Phantom {
    #[must_use]
    pub fn rate(self) -> f64 {
        match self {
            Self::GridIn(rate) | Self::Generation(rate) => rate,
        }
    }
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    pub tracked: TrackedTotals,
    /// Signed import: in − out, in, −out, or 0 depending on which routes exist.
    pub net_grid_import: f64,
    pub grid_import: f64,
    pub grid_export: f64,
    /// Unexplained demand (positive) or supply (negative or zero).
    pub imbalance: f64,
    pub phantom: Option<Phantom>,
    /// Rate of the untracked consumer; never negative.
    pub untracked: f64,
}

impl Reconciliation {
    /// Balance `tracked` from scratch.
    #[must_use]
    pub fn reconcile(tracked: TrackedTotals) -> Self {
        let net_grid_import = match (tracked.grid_in, tracked.grid_out) {
            (Some(grid_in), Some(grid_out)) => grid_in - grid_out,
            (Some(grid_in), None) => grid_in,
            (None, Some(grid_out)) => -grid_out,
            (None, None) => 0.0,
        };
        let grid_import = tracked.grid_in.unwrap_or(net_grid_import).max(0.0);
        let grid_export = tracked.grid_out.unwrap_or((-net_grid_import).max(0.0));

        let imbalance =
            tracked.consumers - grid_import - (tracked.generation - grid_export);

        let (phantom, untracked) = if imbalance > 0.0 {
            let grid_untracked = tracked.grid_in.is_none() && tracked.grid_out.is_none();
            let phantom = if grid_untracked {
                Phantom::GridIn(imbalance)
            } else {
                Phantom::Generation(imbalance)
            };
            (Some(phantom), 0.0)
        } else {
            // `-imbalance` is ≥ 0 here; `max` also maps a NaN imbalance to 0.
            (None, (-imbalance).max(0.0))
        };

        let result = Self {
            tracked,
            net_grid_import,
            grid_import,
            grid_export,
            imbalance,
            phantom,
            untracked,
        };
        sankey_core::debug!(
            imbalance,
            grid_import,
            grid_export,
            net_grid_import,
            generation_total = result.generation_total(),
            grid_in_total = result.grid_in_total(),
            consumer_total = result.consumer_total(),
            phantom_grid_in = result.phantom_grid_in(),
            phantom_generation = result.phantom_generation(),
            untracked,
            "reconciled"
        );
        result
    }

    #[must_use]
    pub fn phantom_grid_in(&self) -> f64 {
        match self.phantom {
            Some(Phantom::GridIn(rate)) => rate,
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn phantom_generation(&self) -> f64 {
        match self.phantom {
            Some(Phantom::Generation(rate)) => rate,
            _ => 0.0,
        }
    }

    /// Tracked generation plus phantom generation.
    #[must_use]
    pub fn generation_total(&self) -> f64 {
        self.tracked.generation + self.phantom_generation()
    }

    /// Grid import plus phantom grid import.
    #[must_use]
    pub fn grid_in_total(&self) -> f64 {
        self.grid_import + self.phantom_grid_in()
    }

    /// Tracked consumers plus the untracked consumer.
    #[must_use]
    pub fn consumer_total(&self) -> f64 {
        self.tracked.consumers + self.untracked
    }

    /// Supply minus demand after reconciliation; zero up to rounding.
    #[must_use]
    pub fn conservation_error(&self) -> f64 {
        (self.generation_total() + self.grid_in_total())
            - (self.consumer_total() + self.grid_export)
    }

    /// The phantom source as a route, if one was invented.
    #[must_use]
    pub fn phantom_route(&self) -> Option<Route> {
        self.phantom.map(|phantom| Route {
            id: Some(PHANTOM_ROUTE_ID.to_string()),
            text: Some(PHANTOM_ROUTE_TEXT.to_string()),
            rate: phantom.rate(),
            icon: None,
        })
    }

    /// The untracked consumer as a route (always present, possibly zero).
    #[must_use]
    pub fn untracked_route(&self) -> Route {
        Route::synthetic(UNTRACKED_ROUTE_TEXT, self.untracked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(
        grid_in: Option<f64>,
        grid_out: Option<f64>,
        generation: f64,
        consumers: f64,
    ) -> Reconciliation {
        Reconciliation::reconcile(TrackedTotals {
            grid_in,
            grid_out,
            generation,
            consumers,
        })
    }

    #[test]
    fn balanced_has_no_synthetics() {
        let r = totals(Some(5.0), None, 5.0, 10.0);
        assert_eq!(r.imbalance, 0.0);
        assert_eq!(r.phantom, None);
        assert_eq!(r.untracked, 0.0);
        assert_eq!(r.conservation_error(), 0.0);
    }

    #[test]
    fn unexplained_demand_without_grid_is_phantom_grid_in() {
        let r = totals(None, None, 0.0, 10.0);
        assert_eq!(r.phantom, Some(Phantom::GridIn(10.0)));
        assert_eq!(r.phantom_grid_in(), 10.0);
        assert_eq!(r.phantom_generation(), 0.0);
        assert_eq!(r.untracked, 0.0);
        assert_eq!(r.grid_in_total(), 10.0);
    }

    #[test]
    fn unexplained_demand_with_grid_is_phantom_generation() {
        let r = totals(Some(0.0), None, 0.0, 10.0);
        assert_eq!(r.phantom, Some(Phantom::Generation(10.0)));
        assert_eq!(r.generation_total(), 10.0);

        let r = totals(None, Some(0.0), 2.0, 10.0);
        assert_eq!(r.phantom, Some(Phantom::Generation(8.0)));
    }

    #[test]
    fn unexplained_supply_is_untracked() {
        let r = totals(Some(10.0), None, 0.0, 0.0);
        assert_eq!(r.imbalance, -10.0);
        assert_eq!(r.untracked, 10.0);
        assert_eq!(r.phantom, None);
        assert_eq!(r.consumer_total(), 10.0);
    }

    #[test]
    fn export_balances() {
        let r = totals(None, Some(3.0), 10.0, 7.0);
        assert_eq!(r.net_grid_import, -3.0);
        assert_eq!(r.grid_export, 3.0);
        assert_eq!(r.grid_import, 0.0);
        assert_eq!(r.imbalance, 0.0);
        assert_eq!(r.phantom, None);
        assert_eq!(r.untracked, 0.0);
    }

    #[test]
    fn negative_grid_in_without_grid_out_is_export() {
        let r = totals(Some(-4.0), None, 10.0, 6.0);
        assert_eq!(r.grid_import, 0.0);
        assert_eq!(r.grid_export, 4.0);
        assert_eq!(r.untracked, 0.0);
    }

    #[test]
    fn both_grid_routes_use_their_own_rates() {
        let r = totals(Some(2.0), Some(5.0), 10.0, 4.0);
        assert_eq!(r.net_grid_import, -3.0);
        assert_eq!(r.grid_import, 2.0);
        assert_eq!(r.grid_export, 5.0);
        assert_eq!(r.untracked, 3.0);
        assert!(r.conservation_error().abs() < 1e-12);
    }

    #[test]
    fn synthetic_routes() {
        let r = totals(None, None, 0.0, 10.0);
        let phantom = r.phantom_route().unwrap();
        assert_eq!(phantom.id(), Some(PHANTOM_ROUTE_ID));
        assert_eq!(phantom.text.as_deref(), Some(PHANTOM_ROUTE_TEXT));
        assert_eq!(phantom.rate, 10.0);

        let untracked = r.untracked_route();
        assert_eq!(untracked.id, None);
        assert_eq!(untracked.rate, 0.0);
    }
}
