#![forbid(unsafe_code)]

//! Layout engine for the energy-flow diagram.
//!
//! Routes go in through [`SankeyDiagram`]; each mutation reconciles the
//! totals ([`reconcile`]) so supply and demand balance. [`SankeyDiagram::compute_layout`]
//! then scales rates to widths ([`scale`]) and produces a [`DiagramLayout`]
//! of junctions, shapes, and label placements ([`layout`]).

pub mod constants;
pub mod diagram;
pub mod extras;
pub mod layout;
pub mod reconcile;
pub mod route;
pub mod scale;

pub use diagram::{RateTarget, SankeyDiagram};
pub use extras::{ConsumerExtra, ConsumerExtras, ExtraPlacement, NoExtras, RuleOverlay, RuleState};
pub use layout::{
    BandClass, DiagramLayout, Fill, FlowLayout, Junctions, LabelKind, LabelPlacement,
    LayoutSummary, Shape, ShapeKind, grid_blend_ratio,
};
pub use reconcile::{Phantom, Reconciliation, TrackedTotals};
pub use route::{Route, RouteMap};
pub use scale::Scale;
