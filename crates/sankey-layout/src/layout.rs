//! Junction coordinates, shapes, and label placements.
//!
//! The topology is fixed:
//!
//! ```text
//!         gen A   gen B            (fan-out at the top)
//!            \     /
//!           trunk (x0,y0)
//!          /        \
//!   export           consumer branch (x1,y1)-(x2,y2)
//!   ◄──── grid                │ blend with grid import ──► pre-fan-out ──► consumers
//!   grid in ────────► (x2,y2)-(x3,y3)
//! ```
//!
//! Generation sources fan out horizontally and merge into a trunk. The trunk
//! splits into a grid-export branch (when exporting) and a consumer branch.
//! The consumer branch sits on top of the grid-import band; both run through
//! a color gradient towards the blend color, then a short solid run, then fan
//! out vertically into one band per consumer plus the untracked consumer.
//!
//! Everything here is plain data; `sankey-render` turns it into SVG.

use smallvec::SmallVec;

use sankey_core::geometry::{BandCorners, FlowBand, Point, Rect, flow_by_corners};
use sankey_style::{Palette, Rgb, mix};

use crate::constants::*;
use crate::diagram::SankeyDiagram;
use crate::extras::{ConsumerExtras, ExtraPlacement};
use crate::reconcile::Reconciliation;
use crate::route::Route;
use crate::scale::Scale;

/// Named junctions of the diagram topology.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Junctions {
    /// Left edge of the generation trunk, below the terminators (`x0,y0`).
    pub trunk: Point,
    /// Top of the consumer branch where it meets the blend zone (`x1,y1`).
    pub branch_top: Point,
    /// Bottom of the consumer branch, top of the grid import (`x2,y2`).
    pub branch_bottom: Point,
    /// Bottom of the grid import at the blend zone (`x3,y3`).
    pub grid_in_bottom: Point,
    /// Top rail at the end of the gradient (`x4,y4`).
    pub blend_top: Point,
    /// Bottom rail at the end of the gradient (`x5,y5`).
    pub blend_bottom: Point,
    /// Top of the consumer fan-out (`x6,y6`).
    pub fan_out_top: Point,
    /// Bottom of the consumer fan-out (`x7,y7`).
    pub fan_out_bottom: Point,
    /// Where the export branch turns horizontal (`x10,y10`).
    pub grid_export: Point,
}

impl Junctions {
    /// `(label, point)` pairs in the `xN,yN` naming used for debug overlays.
    #[must_use]
    pub fn labeled(&self) -> [(&'static str, Point); 9] {
        [
            ("x0,y0", self.trunk),
            ("x1,y1", self.branch_top),
            ("x2,y2", self.branch_bottom),
            ("x3,y3", self.grid_in_bottom),
            ("x4,y4", self.blend_top),
            ("x5,y5", self.blend_bottom),
            ("x6,y6", self.fan_out_top),
            ("x7,y7", self.fan_out_bottom),
            ("x10,y10", self.grid_export),
        ]
    }
}

/// What a shape represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandClass {
    Generation,
    GridIn,
    GridExport,
    Blend,
    Consumer,
}

impl BandClass {
    /// Stable lowercase tag, used as the SVG class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generation => "solar",
            Self::GridIn => "grid",
            Self::GridExport => "grid-export",
            Self::Blend => "blend",
            Self::Consumer => "consumer",
        }
    }
}

/// How a shape is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Rgb),
    /// Left-to-right linear gradient.
    Gradient { from: Rgb, to: Rgb },
    /// Translucent black darkening whatever lies below (arrow tints).
    Tint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Band(FlowBand),
    Rect(Rect),
    Polygon(SmallVec<[Point; 4]>),
}

/// One drawable, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub fill: Fill,
    pub class: BandClass,
}

impl Shape {
    fn points(&self) -> SmallVec<[Point; 8]> {
        match &self.kind {
            ShapeKind::Band(band) => band.points().into_iter().collect(),
            ShapeKind::Rect(rect) => SmallVec::from_slice(&[
                Point::new(rect.x, rect.y),
                Point::new(rect.right(), rect.bottom()),
            ]),
            ShapeKind::Polygon(points) => points.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Generation,
    GridIn,
    Consumer,
    Untracked,
}

/// A label box for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub kind: LabelKind,
    pub route_id: Option<String>,
    pub text: Option<String>,
    pub icon: Option<String>,
    pub rate: f64,
    /// Generation and grid labels: box centre. Consumer labels: left middle.
    pub anchor: Point,
    pub bounds: Rect,
}

/// Layout of a diagram that has a grid import.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLayout {
    pub summary: LayoutSummary,
    pub junctions: Junctions,
    pub shapes: Vec<Shape>,
    pub labels: Vec<LabelPlacement>,
    pub extras: Vec<ExtraPlacement>,
    /// Grid share of the blend, in `[0, 1]`.
    pub blend_ratio: f64,
    pub blend_color: Rgb,
    /// Bottom of the lowest band or consumer gap.
    pub height: f64,
    /// Right edge of the rightmost shape or label.
    pub width: f64,
}

/// Totals and scale, available whether or not a layout could be computed.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSummary {
    pub reconciliation: Reconciliation,
    pub scale: Scale,
    pub unit: String,
    pub phantom_route: Option<Route>,
    pub untracked_route: Route,
}

/// Output of [`SankeyDiagram::compute_layout`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramLayout {
    /// No grid-import route: there is nothing sensible to lay out.
    InsufficientData(LayoutSummary),
    Flow(Box<FlowLayout>),
}

impl DiagramLayout {
    #[must_use]
    pub fn summary(&self) -> &LayoutSummary {
        match self {
            Self::InsufficientData(summary) => summary,
            Self::Flow(flow) => &flow.summary,
        }
    }

    #[must_use]
    pub fn flow(&self) -> Option<&FlowLayout> {
        match self {
            Self::InsufficientData(_) => None,
            Self::Flow(flow) => Some(flow),
        }
    }

    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData(_))
    }
}

/// Grid share of the blend: `grid / (grid + generation)` clamped to `[0, 1]`.
///
/// Zero without a grid import route or when the denominator is zero.
#[must_use]
pub fn grid_blend_ratio(grid_in: Option<&Route>, generation_total: f64) -> f64 {
    let Some(grid_in) = grid_in else {
        return 0.0;
    };
    let denominator = grid_in.rate + generation_total;
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = grid_in.rate / denominator;
    if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
}

/// Band widths derived from the reconciled totals.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Widths {
    generation_in: f64,
    to_consumers: f64,
    to_grid: f64,
    grid_in: f64,
}

impl Widths {
    fn new(scale: &Scale, r: &Reconciliation, grid_in: &Route, grid_out: Option<&Route>) -> Self {
        let generation_total = r.generation_total();
        let to_consumers = if r.grid_export > 0.0 {
            scale.rate_to_width(generation_total - r.grid_export)
        } else {
            scale.rate_to_width(generation_total)
        };
        let to_grid = if r.grid_export <= 0.0 {
            0.0
        } else if grid_out.is_some() {
            scale.rate_to_width(r.grid_export)
        } else if grid_in.rate > 0.0 {
            0.0
        } else {
            scale.rate_to_width(-grid_in.rate)
        };
        let grid_in = if grid_in.rate > 0.0 {
            scale.rate_to_width(grid_in.rate)
        } else {
            0.0
        };
        Self {
            generation_in: scale.rate_to_width(generation_total),
            to_consumers,
            to_grid,
            grid_in,
        }
    }
}

pub(crate) fn compute(
    diagram: &SankeyDiagram,
    palette: &Palette,
    extras: &dyn ConsumerExtras,
) -> DiagramLayout {
    let span = sankey_core::debug_span!(
        "sankey.layout",
        generation = diagram.generation().len(),
        consumers = diagram.consumers().len()
    );
    let _guard = span.enter();

    let reconciliation = *diagram.reconciliation();
    let scale = Scale::from_reconciliation(&reconciliation);
    let summary = LayoutSummary {
        reconciliation,
        scale,
        unit: diagram.unit().to_string(),
        phantom_route: reconciliation.phantom_route(),
        untracked_route: reconciliation.untracked_route(),
    };

    let Some(grid_in) = diagram.grid_in() else {
        sankey_core::debug!("no grid import route; insufficient data");
        return DiagramLayout::InsufficientData(summary);
    };

    let mut pass = LayoutPass {
        scale,
        palette,
        shapes: Vec::new(),
        labels: Vec::new(),
        extras: Vec::new(),
    };
    let widths = Widths::new(&scale, &reconciliation, grid_in, diagram.grid_out());
    let blend_ratio = grid_blend_ratio(Some(grid_in), reconciliation.generation_total());
    // The ratio is clamped above, so `mix` cannot reject it.
    let blend_color = mix(palette.grid_in, palette.generation, blend_ratio)
        .unwrap_or(palette.generation);

    // Generation trunk and its two branches.
    let x0 = PV_ORIGIN_X - widths.generation_in / 2.0;
    let y0 = PV_ORIGIN_Y + TERMINATOR_BLOCK_LENGTH;
    let radius_to_consumers = TRUNK_TURN_RADIUS + widths.to_consumers;
    let radius_to_grid = TRUNK_TURN_RADIUS + widths.to_grid;
    let y1 = (y0 + radius_to_consumers - widths.to_consumers / 2.0)
        .max(y0 + radius_to_grid - widths.to_grid / 2.0);
    let x1 = x0 + widths.to_grid + widths.to_consumers / 2.0 + radius_to_consumers;
    let (x2, y2) = (x1, y1 + widths.to_consumers);
    let x10 = x0 + widths.to_grid - (y2 - y0);
    let y10 = y2 - widths.to_grid;

    let mut sources: Vec<&Route> = diagram.generation().iter().collect();
    if reconciliation.phantom_generation() > 0.0 {
        sources.extend(summary.phantom_route.as_ref());
    }
    pass.generation_fan_out(&sources, widths.generation_in);
    pass.generation_trunk(x0, y0, widths, Point::new(x1, y1), Point::new(x2, y2));
    pass.grid_export(x0, y0, x10, y10, widths.to_grid);
    pass.grid_in(grid_in, x2, y2, widths.grid_in);

    // Blend zone.
    let (x3, y3) = (x2, y2 + widths.grid_in);
    let (x4, y4) = (x1 + BLEND_LENGTH, y1);
    let (x5, y5) = (x2 + BLEND_LENGTH, y2 + widths.grid_in);
    pass.rect(
        Rect::new(
            x1 - PAD_ANTIALIAS,
            y1,
            BLEND_LENGTH + 2.0 * PAD_ANTIALIAS,
            widths.to_consumers,
        ),
        Fill::Gradient {
            from: palette.generation,
            to: blend_color,
        },
        BandClass::Blend,
    );
    pass.rect(
        Rect::new(x2, y2, BLEND_LENGTH + 1.0, widths.grid_in),
        Fill::Gradient {
            from: palette.grid_in,
            to: blend_color,
        },
        BandClass::Blend,
    );
    let (x6, y6) = (x4 + BLEND_LENGTH_PRE_FAN_OUT, y4);
    let (x7, y7) = (x6, y5);
    pass.rect(
        Rect::new(x4, y4, BLEND_LENGTH_PRE_FAN_OUT + 1.0, y5 - y4),
        Fill::Solid(blend_color),
        BandClass::Blend,
    );

    let mut consumers: Vec<&Route> = diagram.consumers().iter().collect();
    consumers.push(&summary.untracked_route);
    let y8 = pass.consumer_fan_out(&consumers, Point::new(x6, y6), y7, blend_color, extras);

    let height = y5.max(y8);
    let width = pass.right_edge();
    let LayoutPass {
        shapes,
        labels,
        extras,
        ..
    } = pass;

    let junctions = Junctions {
        trunk: Point::new(x0, y0),
        branch_top: Point::new(x1, y1),
        branch_bottom: Point::new(x2, y2),
        grid_in_bottom: Point::new(x3, y3),
        blend_top: Point::new(x4, y4),
        blend_bottom: Point::new(x5, y5),
        fan_out_top: Point::new(x6, y6),
        fan_out_bottom: Point::new(x7, y7),
        grid_export: Point::new(x10, y10),
    };
    sankey_core::trace!(
        shapes = shapes.len(),
        labels = labels.len(),
        width,
        height,
        blend_ratio,
        "layout computed"
    );

    DiagramLayout::Flow(Box::new(FlowLayout {
        summary,
        junctions,
        shapes,
        labels,
        extras,
        blend_ratio,
        blend_color,
        height,
        width,
    }))
}

struct LayoutPass<'a> {
    scale: Scale,
    palette: &'a Palette,
    shapes: Vec<Shape>,
    labels: Vec<LabelPlacement>,
    extras: Vec<ExtraPlacement>,
}

impl LayoutPass<'_> {
    /// Push a band; degenerate corners draw nothing.
    fn band(&mut self, corners: BandCorners, fill: Fill, class: BandClass) {
        if let Some(band) = flow_by_corners(corners) {
            self.shapes.push(Shape {
                kind: ShapeKind::Band(band),
                fill,
                class,
            });
        }
    }

    fn rect(&mut self, rect: Rect, fill: Fill, class: BandClass) {
        if rect.is_empty() {
            return;
        }
        self.shapes.push(Shape {
            kind: ShapeKind::Rect(rect),
            fill,
            class,
        });
    }

    fn polygon(&mut self, points: [Point; 3], fill: Fill, class: BandClass) {
        self.shapes.push(Shape {
            kind: ShapeKind::Polygon(SmallVec::from_slice(&points)),
            fill,
            class,
        });
    }

    fn generation_fan_out(&mut self, sources: &[&Route], total_width: f64) {
        let widths: SmallVec<[f64; 8]> = sources
            .iter()
            .map(|r| self.scale.rate_to_width(r.rate))
            .collect();
        let gaps = sources.len().saturating_sub(1) as f64;
        let fan_out_width = widths.iter().sum::<f64>() + gaps * GENERATION_FAN_OUT_HORIZONTAL_GAP;
        let mut x_top = PV_ORIGIN_X - fan_out_width / 2.0;
        let mut x_bottom = PV_ORIGIN_X - total_width / 2.0;
        let y_top = PV_ORIGIN_Y;
        let y_bottom = PV_ORIGIN_Y + TERMINATOR_BLOCK_LENGTH;
        let color = self.palette.generation;

        for (route, &width) in sources.iter().zip(&widths) {
            self.band(
                BandCorners::new(
                    Point::new(x_top + width, y_top),
                    Point::new(x_top, y_top),
                    Point::new(x_bottom + width, y_bottom),
                    Point::new(x_bottom, y_bottom),
                ),
                Fill::Solid(color),
                BandClass::Generation,
            );
            self.polygon(
                [
                    Point::new(x_top + width, y_top),
                    Point::new(x_top, y_top),
                    Point::new(x_top + width / 2.0, y_top + ARROW_HEAD_LENGTH),
                ],
                Fill::Tint,
                BandClass::Generation,
            );
            if route.icon.is_some() {
                let anchor = Point::new(x_top + width / 2.0, PV_ORIGIN_Y / 2.0);
                let box_width = ICON_SIZE_PX * 3.0;
                self.labels.push(LabelPlacement {
                    kind: LabelKind::Generation,
                    route_id: route.id.clone(),
                    text: route.text.clone(),
                    icon: route.icon.clone(),
                    rate: route.rate,
                    anchor,
                    bounds: Rect::new(anchor.x - box_width / 2.0, 0.0, box_width, PV_ORIGIN_Y),
                });
            }
            x_top += width + GENERATION_FAN_OUT_HORIZONTAL_GAP;
            x_bottom += width;
        }
    }

    /// Consumer branch of the trunk. Its start is measured from the export
    /// edge so both ends carry the same clamped `to_consumers` width.
    fn generation_trunk(&mut self, x0: f64, y0: f64, widths: Widths, top: Point, bottom: Point) {
        let y_start = y0 - PAD_ANTIALIAS;
        self.band(
            BandCorners::new(
                Point::new(x0 + widths.to_grid + widths.to_consumers, y_start),
                Point::new(x0 + widths.to_grid, y_start),
                top,
                bottom,
            ),
            Fill::Solid(self.palette.generation),
            BandClass::Generation,
        );
    }

    fn grid_export(&mut self, x0: f64, y0: f64, x10: f64, y10: f64, width: f64) {
        if width == 0.0 {
            return;
        }
        let fill = Fill::Solid(self.palette.generation);
        self.band(
            BandCorners::new(
                Point::new(x0 + width, y0),
                Point::new(x0, y0),
                Point::new(x10, y10 + width),
                Point::new(x10, y10),
            ),
            fill,
            BandClass::GridExport,
        );
        let arrow_x = GRID_ORIGIN_X + ARROW_HEAD_LENGTH;
        self.rect(
            Rect::new(arrow_x, y10, x10 - arrow_x, width),
            fill,
            BandClass::GridExport,
        );
        self.polygon(
            [
                Point::new(arrow_x, y10),
                Point::new(arrow_x, y10 + width),
                Point::new(GRID_ORIGIN_X, y10 + width / 2.0),
            ],
            fill,
            BandClass::GridExport,
        );
    }

    fn grid_in(&mut self, route: &Route, x2: f64, y2: f64, width: f64) {
        self.rect(
            Rect::new(GRID_ORIGIN_X, y2, x2 - GRID_ORIGIN_X, width),
            Fill::Solid(self.palette.grid_in),
            BandClass::GridIn,
        );
        self.polygon(
            [
                Point::new(GRID_ORIGIN_X, y2),
                Point::new(GRID_ORIGIN_X, y2 + width),
                Point::new(GRID_ORIGIN_X + ARROW_HEAD_LENGTH, y2 + width / 2.0),
            ],
            Fill::Tint,
            BandClass::GridIn,
        );

        let anchor = Point::new(GRID_ORIGIN_X - ICON_SIZE_PX * 2.0, y2 + width / 2.0);
        let box_height = ICON_SIZE_PX + TEXT_PADDING + FONT_SIZE_PX;
        self.labels.push(LabelPlacement {
            kind: LabelKind::GridIn,
            route_id: route.id.clone(),
            text: route.text.clone(),
            icon: Some(
                route
                    .icon
                    .clone()
                    .unwrap_or_else(|| ICON_TRANSMISSION_TOWER.to_string()),
            ),
            rate: route.rate,
            anchor,
            bounds: Rect::new(
                anchor.x - ICON_SIZE_PX / 2.0,
                anchor.y - box_height / 2.0,
                ICON_SIZE_PX * 2.0,
                box_height,
            ),
        });
    }

    /// Lay out consumer bands; the last entry is the untracked consumer.
    /// Returns the bottom of the fan-out including trailing gaps.
    fn consumer_fan_out(
        &mut self,
        consumers: &[&Route],
        top: Point,
        bottom_y: f64,
        color: Rgb,
        extras: &dyn ConsumerExtras,
    ) -> f64 {
        let widths: SmallVec<[f64; 8]> = consumers
            .iter()
            .map(|r| self.scale.rate_to_width(r.rate))
            .collect();
        let gaps = consumers.len().saturating_sub(1) as f64;
        let total_height = widths.iter().sum::<f64>() + gaps * CONSUMERS_FAN_OUT_VERTICAL_GAP;

        let x_left = top.x;
        let x_right = top.x + CONSUMERS_FAN_OUT_HORIZONTAL_SPAN;
        let mut y_left = top.y;
        let mut y_right = ((top.y + bottom_y) / 2.0 - total_height / 2.0).max(TEXT_PADDING);
        let untracked_index = consumers.len().saturating_sub(1);

        for (index, (route, &width)) in consumers.iter().zip(&widths).enumerate() {
            self.band(
                BandCorners::new(
                    Point::new(x_left, y_left),
                    Point::new(x_left, y_left + width),
                    Point::new(x_right + PAD_ANTIALIAS, y_right),
                    Point::new(x_right + PAD_ANTIALIAS, y_right + width),
                ),
                Fill::Solid(color),
                BandClass::Consumer,
            );

            let extra_length = match extras.extras_for(route) {
                Some(extra) => {
                    self.extras.push(ExtraPlacement::new(
                        route,
                        extra,
                        Point::new(x_right, y_right),
                        width,
                        PAD_ANTIALIAS,
                    ));
                    extra.length
                }
                None => 0.0,
            };

            let arrow_x = x_right + extra_length;
            let y_mid = y_right + width / 2.0;
            self.polygon(
                [
                    Point::new(arrow_x, y_mid - width / 2.0),
                    Point::new(arrow_x, y_mid + width / 2.0),
                    Point::new(arrow_x + ARROW_HEAD_LENGTH, y_mid),
                ],
                Fill::Solid(color),
                BandClass::Consumer,
            );

            let label_x = x_right + ARROW_HEAD_LENGTH + TEXT_PADDING + extra_length;
            let label_height = width + CONSUMERS_FAN_OUT_VERTICAL_GAP / 2.0;
            self.labels.push(LabelPlacement {
                kind: if index == untracked_index {
                    LabelKind::Untracked
                } else {
                    LabelKind::Consumer
                },
                route_id: route.id.clone(),
                text: route.text.clone(),
                icon: route.icon.clone(),
                rate: route.rate,
                anchor: Point::new(label_x, y_mid),
                bounds: Rect::new(
                    label_x,
                    y_mid - label_height / 2.0,
                    CONSUMERS_LABEL_WIDTH,
                    label_height,
                ),
            });

            y_left += width;
            y_right += width + CONSUMERS_FAN_OUT_VERTICAL_GAP;
        }
        y_right + CONSUMERS_FAN_OUT_VERTICAL_GAP
    }

    fn right_edge(&self) -> f64 {
        let shape_points = self.shapes.iter().flat_map(Shape::points);
        let label_points = self
            .labels
            .iter()
            .map(|l| Point::new(l.bounds.right(), l.bounds.bottom()));
        let extra_points = self
            .extras
            .iter()
            .map(|e| Point::new(e.rect.right(), e.rect.bottom()));
        Rect::bounding(shape_points.chain(label_points).chain(extra_points))
            .map_or(0.0, |bounds| bounds.right())
    }
}
