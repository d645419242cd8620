//! Property-based invariant tests for the computed layout.
//!
//! 1. No NaN or infinite coordinates anywhere in the layout.
//! 2. One label per consumer, the untracked consumer, grid import, and each
//!    generation source with an icon.
//! 3. The reported height covers every consumer label and junction.
//! 4. The consumer fan-out never starts above the top margin.
//! 5. Consumer bands are ordered top to bottom in insertion order.

use proptest::prelude::*;
use sankey_layout::constants::{ICON_SOLAR_POWER, TEXT_PADDING};
use sankey_layout::{DiagramLayout, FlowLayout, LabelKind, Route, SankeyDiagram, ShapeKind};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Input {
    grid_in: f64,
    grid_out: Option<f64>,
    generation: Vec<(f64, bool)>,
    consumers: Vec<f64>,
}

fn input_strategy() -> impl Strategy<Value = Input> {
    (
        -500.0f64..5_000.0,
        proptest::option::of(0.0f64..5_000.0),
        proptest::collection::vec((0.0f64..5_000.0, any::<bool>()), 0..5),
        proptest::collection::vec(0.0f64..5_000.0, 0..8),
    )
        .prop_map(|(grid_in, grid_out, generation, consumers)| Input {
            grid_in,
            grid_out,
            generation,
            consumers,
        })
}

fn build(input: &Input) -> SankeyDiagram {
    let mut diagram = SankeyDiagram::new();
    diagram.set_grid_in(Route::new("grid_in", input.grid_in));
    if let Some(rate) = input.grid_out {
        diagram.set_grid_out(Route::new("grid_out", rate));
    }
    for (i, &(rate, icon)) in input.generation.iter().enumerate() {
        let route = Route::new(format!("gen{i}"), rate);
        let route = if icon { route.with_icon(ICON_SOLAR_POWER) } else { route };
        diagram.add_or_update_generation(route);
    }
    for (i, &rate) in input.consumers.iter().enumerate() {
        diagram.add_or_update_consumer(Route::new(format!("load{i}"), rate));
    }
    diagram
}

fn flow(diagram: &SankeyDiagram) -> FlowLayout {
    match diagram.compute_layout() {
        DiagramLayout::Flow(flow) => *flow,
        DiagramLayout::InsufficientData(_) => unreachable!("grid import is always set"),
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Finite geometry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn coordinates_are_finite(input in input_strategy()) {
        let layout = flow(&build(&input));
        for shape in &layout.shapes {
            match &shape.kind {
                ShapeKind::Band(band) => {
                    prop_assert!(band.points().iter().all(|p| p.is_finite()), "{:?}", shape);
                }
                ShapeKind::Rect(rect) => {
                    prop_assert!(rect.x.is_finite() && rect.y.is_finite());
                    prop_assert!(rect.width > 0.0 && rect.height > 0.0);
                }
                ShapeKind::Polygon(points) => {
                    prop_assert!(points.iter().all(|p| p.is_finite()));
                }
            }
        }
        for (name, point) in layout.junctions.labeled() {
            prop_assert!(point.is_finite(), "junction {} = {:?}", name, point);
        }
        prop_assert!(layout.width.is_finite() && layout.height.is_finite());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Label coverage
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn labels_cover_routes(input in input_strategy()) {
        let layout = flow(&build(&input));
        let count = |kind| layout.labels.iter().filter(|l| l.kind == kind).count();
        prop_assert_eq!(count(LabelKind::Consumer), input.consumers.len());
        prop_assert_eq!(count(LabelKind::Untracked), 1);
        prop_assert_eq!(count(LabelKind::GridIn), 1);
        let with_icon = input.generation.iter().filter(|(_, icon)| *icon).count();
        prop_assert_eq!(count(LabelKind::Generation), with_icon);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Height covers content
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn height_covers_consumers_and_junctions(input in input_strategy()) {
        let layout = flow(&build(&input));
        for label in layout.labels.iter().filter(|l| matches!(l.kind, LabelKind::Consumer | LabelKind::Untracked)) {
            prop_assert!(label.bounds.bottom() <= layout.height + 1e-9);
        }
        let j = layout.junctions;
        for point in [j.branch_top, j.branch_bottom, j.grid_in_bottom, j.blend_bottom, j.fan_out_bottom] {
            prop_assert!(point.y <= layout.height + 1e-9);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Top margin
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fan_out_respects_top_margin(input in input_strategy()) {
        let diagram = build(&input);
        let layout = flow(&diagram);
        let scale = layout.summary.scale;
        for label in layout.labels.iter().filter(|l| matches!(l.kind, LabelKind::Consumer | LabelKind::Untracked)) {
            let band_top = label.anchor.y - scale.rate_to_width(label.rate) / 2.0;
            prop_assert!(band_top >= TEXT_PADDING - 1e-9);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Consumer order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn consumers_stack_in_insertion_order(input in input_strategy()) {
        let layout = flow(&build(&input));
        let consumers: Vec<_> = layout
            .labels
            .iter()
            .filter(|l| matches!(l.kind, LabelKind::Consumer | LabelKind::Untracked))
            .collect();
        for pair in consumers.windows(2) {
            prop_assert!(pair[0].anchor.y < pair[1].anchor.y);
        }
        prop_assert_eq!(consumers.last().map(|l| l.kind), Some(LabelKind::Untracked));
        for (i, label) in consumers.iter().take(input.consumers.len()).enumerate() {
            let expected = format!("load{i}");
            prop_assert_eq!(label.route_id.as_deref(), Some(expected.as_str()));
        }
    }
}
