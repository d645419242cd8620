//! SVG output for a computed [`DiagramLayout`].
//!
//! The renderer only paints: every coordinate comes from the layout, and
//! the only decisions made here are text (through a [`LabelFormatter`]) and
//! markup details such as gradient ids.

use std::borrow::Cow;
use std::fmt::{self, Write};

use sankey_core::geometry::{FlowBand, Point, Rect};
use sankey_layout::constants::{FONT_SIZE_PX, ICON_SIZE_PX, RULE_ICON_SIZE, TEXT_PADDING};
use sankey_layout::{
    DiagramLayout, ExtraPlacement, Fill, FlowLayout, LabelKind, LabelPlacement, RuleState,
    ShapeKind,
};
use sankey_style::{Palette, Rgb};

use crate::label::{LabelFormatter, RoundedLabel, ellipsize};

/// Text shown instead of a diagram when grid import is not configured.
pub const GRID_IN_MISSING_TEXT: &str = "Grid in unspecified!";
/// Height of the placeholder document.
pub const PLACEHOLDER_HEIGHT: f64 = 80.0;

const TINT_OPACITY: f64 = 0.2;
const DEBUG_POINT_RADIUS: f64 = 3.0;
const DEBUG_FONT_SIZE: f64 = 10.0;
/// Average glyph advance as a fraction of the font size, used to turn a
/// label box width into a column budget.
const GLYPH_ASPECT: f64 = 0.6;

/// SVG rendering configuration.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    /// Font size in px for labels.
    pub font_size: f64,
    /// CSS font-family for the document.
    pub font_family: String,
    /// Extra room added to the layout width.
    pub width_padding: f64,
    /// Mark every junction with a dot and its name.
    pub debug_points: bool,
    /// Colors for the rule icon badge and debug dots.
    pub palette: Palette,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            font_size: FONT_SIZE_PX,
            font_family: "sans-serif".into(),
            width_padding: TEXT_PADDING,
            debug_points: false,
            palette: Palette::default(),
        }
    }
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_debug_points(mut self, on: bool) -> Self {
        self.debug_points = on;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Render with the default `"{value} {unit}"` labels.
    #[must_use]
    pub fn render(&self, layout: &DiagramLayout) -> String {
        self.render_with(layout, &RoundedLabel)
    }

    #[must_use]
    pub fn render_with(&self, layout: &DiagramLayout, formatter: &dyn LabelFormatter) -> String {
        let mut out = String::with_capacity(4096);
        // Writing into a String cannot fail.
        let _ = self.render_to(&mut out, layout, formatter);
        out
    }

    /// Stream the document into any [`fmt::Write`] sink.
    pub fn render_to<W: Write>(
        &self,
        out: &mut W,
        layout: &DiagramLayout,
        formatter: &dyn LabelFormatter,
    ) -> fmt::Result {
        match layout {
            DiagramLayout::InsufficientData(_) => self.write_placeholder(out),
            DiagramLayout::Flow(flow) => self.write_flow(out, flow, formatter),
        }
    }

    fn write_placeholder<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="{}" font-family="{}">"#,
            Num(PLACEHOLDER_HEIGHT),
            Escaped(&self.font_family),
        )?;
        writeln!(
            out,
            r#"<text x="90" y="20" font-size="{}">{GRID_IN_MISSING_TEXT}</text>"#,
            Num(self.font_size),
        )?;
        out.write_str("</svg>\n")
    }

    fn write_flow<W: Write>(
        &self,
        out: &mut W,
        flow: &FlowLayout,
        formatter: &dyn LabelFormatter,
    ) -> fmt::Result {
        let span = sankey_core::debug_span!(
            "sankey.render",
            shapes = flow.shapes.len(),
            labels = flow.labels.len()
        );
        let _guard = span.enter();

        let width = flow.width + self.width_padding;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{}" font-size="{}">"#,
            Escaped(&self.font_family),
            Num(self.font_size),
            w = Num(width),
            h = Num(flow.height),
        )?;

        self.write_gradients(out, flow)?;

        let mut gradient = 0usize;
        for shape in &flow.shapes {
            let fill = match shape.fill {
                Fill::Solid(color) => FillAttr::Solid(color),
                Fill::Gradient { .. } => {
                    gradient += 1;
                    FillAttr::Gradient(gradient)
                }
                Fill::Tint => FillAttr::Tint,
            };
            let class = shape.class.as_str();
            match &shape.kind {
                ShapeKind::Band(band) => {
                    writeln!(
                        out,
                        r#"<path class="flow {class}" d="{}" {fill}/>"#,
                        BandPath(band)
                    )?;
                }
                ShapeKind::Rect(rect) => {
                    writeln!(
                        out,
                        r#"<rect class="{class}" x="{}" y="{}" width="{}" height="{}" {fill}/>"#,
                        Num(rect.x),
                        Num(rect.y),
                        Num(rect.width),
                        Num(rect.height),
                    )?;
                }
                ShapeKind::Polygon(points) => {
                    out.write_str(r#"<polygon class=""#)?;
                    out.write_str(class)?;
                    if matches!(shape.fill, Fill::Tint) {
                        out.write_str(" tint")?;
                    }
                    out.write_str(r#"" points=""#)?;
                    for (i, p) in points.iter().enumerate() {
                        if i > 0 {
                            out.write_char(' ')?;
                        }
                        write!(out, "{},{}", Num(p.x), Num(p.y))?;
                    }
                    writeln!(out, r#"" {fill}/>"#)?;
                }
            }
        }

        for extra in &flow.extras {
            self.write_extra(out, extra, flow.blend_color)?;
        }

        for label in &flow.labels {
            self.write_label(out, label, &flow.summary.unit, formatter)?;
        }

        if self.debug_points {
            for (name, point) in flow.junctions.labeled() {
                self.write_debug_point(out, name, point)?;
            }
        }

        out.write_str("</svg>\n")
    }

    fn write_gradients<W: Write>(&self, out: &mut W, flow: &FlowLayout) -> fmt::Result {
        let mut gradients = flow.shapes.iter().filter_map(|s| match s.fill {
            Fill::Gradient { from, to } => Some((from, to)),
            _ => None,
        });
        let Some(first) = gradients.next() else {
            return Ok(());
        };
        out.write_str("<defs>\n")?;
        for (i, (from, to)) in std::iter::once(first).chain(gradients).enumerate() {
            writeln!(
                out,
                r#"<linearGradient id="grad-{}" x1="0%" y1="0%" x2="100%" y2="0%"><stop offset="0%" stop-color="{}"/><stop offset="100%" stop-color="{}"/></linearGradient>"#,
                i + 1,
                from.to_hex(),
                to.to_hex(),
            )?;
        }
        out.write_str("</defs>\n")
    }

    fn write_extra<W: Write>(&self, out: &mut W, extra: &ExtraPlacement, fill: Rgb) -> fmt::Result {
        out.write_str("<g class=\"extra\"")?;
        if let Some(id) = &extra.route_id {
            write!(out, r#" data-route-id="{}""#, Escaped(id))?;
        }
        out.write_str(">\n")?;
        write_rect(out, &extra.rect, &format!(r#"fill="{}""#, fill.to_hex()))?;
        if let (Some(rule), Some(center)) = (extra.rule, extra.icon_center) {
            self.write_rule_icon(out, rule, center)?;
        }
        out.write_str("</g>\n")
    }

    /// Badge with a switch glyph, drawn in a 100x100 viewBox.
    fn write_rule_icon<W: Write>(&self, out: &mut W, rule: RuleState, center: Point) -> fmt::Result {
        let half = RULE_ICON_SIZE / 2.0;
        writeln!(
            out,
            r#"<svg class="rule {state}" x="{}" y="{}" width="{s}" height="{s}" viewBox="0 0 100 100">"#,
            Num(center.x - half),
            Num(center.y - half),
            state = if rule.closed { "closed" } else { "open" },
            s = Num(RULE_ICON_SIZE),
        )?;
        writeln!(
            out,
            r#"<rect width="100" height="100" ry="30" fill="{}"/>"#,
            self.palette.rule_icon.to_hex()
        )?;
        let glyph = if rule.closed {
            "M15 50 H85"
        } else {
            "M15 50 H38 L66 28 M70 50 H85"
        };
        writeln!(
            out,
            r##"<path d="{glyph}" stroke="#ffffff" stroke-width="10" stroke-linecap="round" fill="none"/>"##
        )?;
        out.write_str("</svg>\n")
    }

    fn write_label<W: Write>(
        &self,
        out: &mut W,
        label: &LabelPlacement,
        unit: &str,
        formatter: &dyn LabelFormatter,
    ) -> fmt::Result {
        let lines = formatter.lines(label, unit);
        let kind = label_class(label.kind);
        let centered = matches!(label.kind, LabelKind::Generation | LabelKind::GridIn);

        write!(out, r#"<g class="label {kind}""#)?;
        if let Some(id) = &label.route_id {
            write!(out, r#" data-route-id="{}""#, Escaped(id))?;
        }
        if let Some(icon) = &label.icon {
            write!(out, r#" data-icon="{}""#, Escaped(icon))?;
        }
        out.write_str(">\n")?;

        let b = &label.bounds;
        let icon_block = if label.icon.is_some() {
            ICON_SIZE_PX + TEXT_PADDING
        } else {
            0.0
        };
        let content = icon_block + lines.len() as f64 * self.font_size;
        let top = b.y + ((b.height - content) / 2.0).max(0.0);

        if let Some(icon) = &label.icon {
            let x = if centered {
                label.anchor.x - ICON_SIZE_PX / 2.0
            } else {
                b.x
            };
            writeln!(
                out,
                r##"<use class="icon" href="#{}" x="{}" y="{}" width="{s}" height="{s}"/>"##,
                Escaped(icon),
                Num(x),
                Num(top),
                s = Num(ICON_SIZE_PX),
            )?;
        }

        let (x, anchor) = if centered {
            (label.anchor.x, "middle")
        } else {
            (b.x, "start")
        };
        // Source labels keep their full value; consumer text is fitted to
        // the label column.
        let columns = (b.width / (self.font_size * GLYPH_ASPECT)).floor().max(0.0) as usize;
        for (i, line) in lines.iter().enumerate() {
            let baseline = top + icon_block + (i as f64 + 0.8) * self.font_size;
            let text = if centered {
                Cow::Borrowed(line.as_str())
            } else {
                ellipsize(line, columns)
            };
            writeln!(
                out,
                r#"<text x="{}" y="{}" text-anchor="{anchor}">{}</text>"#,
                Num(x),
                Num(baseline),
                Escaped(&text),
            )?;
        }
        out.write_str("</g>\n")
    }

    fn write_debug_point<W: Write>(&self, out: &mut W, name: &str, p: Point) -> fmt::Result {
        writeln!(
            out,
            r#"<circle class="debug" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            Num(p.x),
            Num(p.y),
            Num(DEBUG_POINT_RADIUS),
            self.palette.debug_point.to_hex(),
        )?;
        writeln!(
            out,
            r#"<text class="debug" x="{}" y="{}" font-size="{}">{name}</text>"#,
            Num(p.x - 13.0),
            Num(p.y - 6.0),
            Num(DEBUG_FONT_SIZE),
        )
    }
}

fn label_class(kind: LabelKind) -> &'static str {
    match kind {
        LabelKind::Generation => "generation",
        LabelKind::GridIn => "grid",
        LabelKind::Consumer => "consumer",
        LabelKind::Untracked => "untracked",
    }
}

fn write_rect<W: Write>(out: &mut W, rect: &Rect, attrs: &str) -> fmt::Result {
    writeln!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" {attrs}/>"#,
        Num(rect.x),
        Num(rect.y),
        Num(rect.width),
        Num(rect.height),
    )
}

enum FillAttr {
    Solid(Rgb),
    Gradient(usize),
    Tint,
}

impl fmt::Display for FillAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(color) => write!(f, r#"fill="{}""#, color.to_hex()),
            Self::Gradient(n) => write!(f, r#"fill="url(#grad-{n})""#),
            Self::Tint => write!(f, r##"fill="#000000" fill-opacity="{}""##, Num(TINT_OPACITY)),
        }
    }
}

/// `M sl C slc elc el L er C erc src sr Z`
struct BandPath<'a>(&'a FlowBand);

impl fmt::Display for BandPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let band = self.0;
        let c = band.corners;
        let pt = |p: Point| Pair(p);
        write!(
            f,
            "M {} C {} {} {} L {} C {} {} {} Z",
            pt(c.start_left),
            pt(band.start_left_ctrl),
            pt(band.end_left_ctrl),
            pt(c.end_left),
            pt(c.end_right),
            pt(band.end_right_ctrl),
            pt(band.start_right_ctrl),
            pt(c.start_right),
        )
    }
}

struct Pair(Point);

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", Num(self.0.x), Num(self.0.y))
    }
}

/// Coordinate printed with at most three decimals and no trailing zeros.
pub(crate) struct Num(pub(crate) f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 1000.0).round() / 1000.0;
        if rounded == 0.0 || !rounded.is_finite() {
            return f.write_str("0");
        }
        let text = format!("{rounded:.3}");
        f.write_str(text.trim_end_matches('0').trim_end_matches('.'))
    }
}

/// Text escaped for element content and attribute values.
pub(crate) struct Escaped<'a>(pub(crate) &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.0.len());
        svg_escape_into(&mut out, self.0);
        f.write_str(&out)
    }
}

fn svg_escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
