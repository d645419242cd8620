//! The diagram state: routes in, layout out.

use sankey_style::Palette;

use crate::constants::DEFAULT_UNIT;
use crate::extras::{ConsumerExtras, NoExtras};
use crate::layout::{self, DiagramLayout};
use crate::reconcile::{Reconciliation, TrackedTotals};
use crate::route::{Route, RouteMap};
use crate::scale::Scale;

/// Which route a rate update landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateTarget {
    Generation,
    Consumer,
    GridOut,
    GridIn,
    /// Unknown id and no grid-import route to fall back to.
    Ignored,
}

/// Owns every route of one diagram and keeps the reconciliation current.
///
/// One grid import and one grid export at most: a home has a single grid
/// connection. Routes are inserted or replaced by id and never removed.
/// Every mutation re-runs reconciliation from scratch, so
/// [`compute_layout`](Self::compute_layout) always sees balanced totals.
///
/// ```
/// use sankey_layout::{Route, SankeyDiagram};
///
/// let mut diagram = SankeyDiagram::new();
/// diagram.set_grid_in(Route::new("sensor.grid", 5.0));
/// diagram.add_or_update_generation(Route::new("sensor.solar", 5.0));
/// diagram.add_or_update_consumer(Route::new("sensor.tv", 10.0));
/// assert_eq!(diagram.scale().multiplier(), 15.0);
/// ```
#[derive(Debug, Clone)]
pub struct SankeyDiagram {
    unit: String,
    grid_in: Option<Route>,
    grid_out: Option<Route>,
    generation: RouteMap,
    consumers: RouteMap,
    reconciliation: Reconciliation,
}

impl Default for SankeyDiagram {
    fn default() -> Self {
        Self::new()
    }
}

impl SankeyDiagram {
    #[must_use]
    pub fn new() -> Self {
        Self {
            unit: DEFAULT_UNIT.to_string(),
            grid_in: None,
            grid_out: None,
            generation: RouteMap::new(),
            consumers: RouteMap::new(),
            reconciliation: Reconciliation::reconcile(TrackedTotals::default()),
        }
    }

    /// Display unit, passed through to labels untouched.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.unit = unit.into();
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    #[must_use]
    pub fn grid_in(&self) -> Option<&Route> {
        self.grid_in.as_ref()
    }

    #[must_use]
    pub fn grid_out(&self) -> Option<&Route> {
        self.grid_out.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> &RouteMap {
        &self.generation
    }

    #[must_use]
    pub fn consumers(&self) -> &RouteMap {
        &self.consumers
    }

    #[must_use]
    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }

    #[must_use]
    pub fn scale(&self) -> Scale {
        Scale::from_reconciliation(&self.reconciliation)
    }

    pub fn set_grid_in(&mut self, route: Route) {
        self.grid_in = Some(route);
        self.recalculate();
    }

    pub fn set_grid_out(&mut self, route: Route) {
        self.grid_out = Some(route);
        self.recalculate();
    }

    pub fn add_or_update_generation(&mut self, route: Route) {
        self.generation.insert_or_replace(route);
        self.recalculate();
    }

    /// Negative consumer rates are clamped to zero.
    pub fn add_or_update_consumer(&mut self, route: Route) {
        self.consumers.insert_or_replace(route.clamped_non_negative());
        self.recalculate();
    }

    /// Set the rate of whichever route owns `id`.
    ///
    /// Looks in generation, then consumers, then grid export. Any other id
    /// updates the grid import.
    pub fn update_rate_by_id(&mut self, id: &str, rate: f64) -> RateTarget {
        let target = if let Some(route) = self.generation.get_mut(id) {
            route.rate = rate;
            RateTarget::Generation
        } else if let Some(route) = self.consumers.get_mut(id) {
            route.rate = rate;
            *route = std::mem::take(route).clamped_non_negative();
            RateTarget::Consumer
        } else if let Some(route) = self.grid_out.as_mut().filter(|r| r.id() == Some(id)) {
            route.rate = rate;
            RateTarget::GridOut
        } else if let Some(route) = self.grid_in.as_mut() {
            if route.id() != Some(id) {
                sankey_core::warn!(
                    code = sankey_core::logging::Diagnostic::UnknownRouteId.code(),
                    id,
                    "unknown route id; updating grid import"
                );
            }
            route.rate = rate;
            RateTarget::GridIn
        } else {
            sankey_core::warn!(
                code = sankey_core::logging::Diagnostic::UnknownRouteId.code(),
                id,
                "unknown route id and no grid import; update ignored"
            );
            return RateTarget::Ignored;
        };
        self.recalculate();
        target
    }

    /// Layout with the default palette and no consumer decorations.
    #[must_use]
    pub fn compute_layout(&self) -> DiagramLayout {
        self.compute_layout_with(&Palette::default(), &NoExtras)
    }

    #[must_use]
    pub fn compute_layout_with(&self, palette: &Palette, extras: &dyn ConsumerExtras) -> DiagramLayout {
        layout::compute(self, palette, extras)
    }

    fn recalculate(&mut self) {
        self.reconciliation = Reconciliation::reconcile(TrackedTotals {
            grid_in: self.grid_in.as_ref().map(|r| r.rate),
            grid_out: self.grid_out.as_ref().map(|r| r.rate),
            generation: self.generation.total(),
            consumers: self.consumers.total(),
        });
    }
}
