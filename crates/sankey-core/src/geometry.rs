#![forbid(unsafe_code)]

//! Geometric primitives for flow bands.
//!
//! Coordinates are `f64` diagram units with the origin at the top-left and
//! `y` growing downwards, matching SVG user space.

/// Cross-sections shorter than this are not drawn.
pub const MIN_CROSS_SECTION: f64 = 1.0;

/// Rounding slack so a band of exactly the minimum width is still drawn.
const WIDTH_EPSILON: f64 = 1e-9;

/// A point in diagram space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`.
    #[inline]
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned rectangle in diagram space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Bounding box of a set of points, `None` when empty.
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// Where two lines cross.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineIntersection {
    /// The (possibly extrapolated) crossing point.
    pub point: Point,
    /// The crossing lies within the first segment.
    pub within_first: bool,
    /// The crossing lies within the second segment.
    pub within_second: bool,
}

/// Intersect the line through `a1 -> a2` with the line through `b1 -> b2`.
///
/// The lines are treated as infinite; the `within_*` flags report whether the
/// crossing also falls on the finite segments. Returns `None` for parallel or
/// coincident lines.
pub fn line_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<LineIntersection> {
    let denom = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denom;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denom;
    let point = Point::new(a1.x + ua * (a2.x - a1.x), a1.y + ua * (a2.y - a1.y));
    if !point.is_finite() {
        return None;
    }
    Some(LineIntersection {
        point,
        within_first: (0.0..=1.0).contains(&ua),
        within_second: (0.0..=1.0).contains(&ub),
    })
}

/// The two cross-sections a band joins.
///
/// `start_left`/`start_right` span the start of the band and
/// `end_left`/`end_right` the end; left joins left and right joins right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandCorners {
    pub start_left: Point,
    pub start_right: Point,
    pub end_left: Point,
    pub end_right: Point,
}

impl BandCorners {
    pub const fn new(start_left: Point, start_right: Point, end_left: Point, end_right: Point) -> Self {
        Self {
            start_left,
            start_right,
            end_left,
            end_right,
        }
    }

    fn is_finite(&self) -> bool {
        self.start_left.is_finite()
            && self.start_right.is_finite()
            && self.end_left.is_finite()
            && self.end_right.is_finite()
    }
}

/// A band outline: two cubic beziers joined by the end and start cross-sections.
///
/// The outline runs `start_left -> end_left` (curve), `end_left -> end_right`
/// (line), `end_right -> start_right` (curve), then closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowBand {
    pub corners: BandCorners,
    /// Control point leaving `start_left`.
    pub start_left_ctrl: Point,
    /// Control point arriving at `end_left`.
    pub end_left_ctrl: Point,
    /// Control point leaving `end_right`.
    pub end_right_ctrl: Point,
    /// Control point arriving at `start_right`.
    pub start_right_ctrl: Point,
}

impl FlowBand {
    /// All eight points of the outline, corners first.
    pub fn points(&self) -> [Point; 8] {
        let c = &self.corners;
        [
            c.start_left,
            c.start_right,
            c.end_left,
            c.end_right,
            self.start_left_ctrl,
            self.end_left_ctrl,
            self.end_right_ctrl,
            self.start_right_ctrl,
        ]
    }
}

/// Build a band joining two cross-sections without constant-radius curves.
///
/// The "mirror" line runs through the midpoints of `start_left/end_left` and
/// `start_right/end_right`. Each corner's control point is where the line
/// through that corner, perpendicular to its cross-section, meets the mirror
/// line. Under sharp fan-out angles this keeps neighbouring bands from
/// overlapping.
///
/// Returns `None` (and reports a warning) when either cross-section is
/// shorter than [`MIN_CROSS_SECTION`], when any input is non-finite, or when a
/// perpendicular is parallel to the mirror line.
pub fn flow_by_corners(corners: BandCorners) -> Option<FlowBand> {
    let BandCorners {
        start_left: sl,
        start_right: sr,
        end_left: el,
        end_right: er,
    } = corners;

    if !corners.is_finite()
        || sl.distance(sr) < MIN_CROSS_SECTION - WIDTH_EPSILON
        || el.distance(er) < MIN_CROSS_SECTION - WIDTH_EPSILON
    {
        crate::warn!(
            code = crate::logging::Diagnostic::DegenerateBand.code(),
            start = sl.distance(sr),
            end = el.distance(er),
            "skipping band with degenerate cross-section"
        );
        return None;
    }

    let mirror_a = sl.midpoint(el);
    let mirror_b = sr.midpoint(er);

    // Perpendicular offsets: rotate each cross-section by a quarter turn.
    let start_normal = (sl.y - sr.y, sr.x - sl.x);
    let end_normal = (er.y - el.y, el.x - er.x);

    let controls = [
        (sl, start_normal),
        (el, end_normal),
        (er, end_normal),
        (sr, start_normal),
    ]
    .map(|(corner, (nx, ny))| {
        line_intersect(corner, corner.offset(nx, ny), mirror_a, mirror_b).map(|hit| hit.point)
    });

    match controls {
        [Some(start_left_ctrl), Some(end_left_ctrl), Some(end_right_ctrl), Some(start_right_ctrl)] => {
            Some(FlowBand {
                corners,
                start_left_ctrl,
                end_left_ctrl,
                end_right_ctrl,
                start_right_ctrl,
            })
        }
        _ => {
            crate::warn!(
                code = crate::logging::Diagnostic::ParallelLines.code(),
                "flow band construction failed: perpendicular parallel to mirror line"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn intersect_crossing_segments() {
        let hit = line_intersect(p(0.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(10.0, 0.0)).unwrap();
        assert_eq!(hit.point, p(5.0, 5.0));
        assert!(hit.within_first);
        assert!(hit.within_second);
    }

    #[test]
    fn intersect_extrapolates_beyond_segments() {
        let hit = line_intersect(p(0.0, 0.0), p(1.0, 0.0), p(5.0, -1.0), p(5.0, 1.0)).unwrap();
        assert_eq!(hit.point, p(5.0, 0.0));
        assert!(!hit.within_first);
        assert!(hit.within_second);
    }

    #[test]
    fn intersect_parallel_is_none() {
        assert!(line_intersect(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)).is_none());
        // Coincident lines are parallel too.
        assert!(line_intersect(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)).is_none());
    }

    #[test]
    fn intersect_zero_length_line_is_none() {
        assert!(line_intersect(p(1.0, 1.0), p(1.0, 1.0), p(0.0, 0.0), p(5.0, 5.0)).is_none());
    }

    #[test]
    fn straight_vertical_band() {
        // Horizontal cross-sections 10 wide, 50 apart, no lateral shift.
        let band = flow_by_corners(BandCorners::new(
            p(10.0, 0.0),
            p(0.0, 0.0),
            p(10.0, 50.0),
            p(0.0, 50.0),
        ))
        .unwrap();
        // Perpendiculars are vertical; the mirror line is y = 25.
        assert_eq!(band.start_left_ctrl, p(10.0, 25.0));
        assert_eq!(band.end_left_ctrl, p(10.0, 25.0));
        assert_eq!(band.end_right_ctrl, p(0.0, 25.0));
        assert_eq!(band.start_right_ctrl, p(0.0, 25.0));
    }

    #[test]
    fn shifted_band_controls_stay_on_perpendiculars() {
        let corners = BandCorners::new(p(20.0, 0.0), p(10.0, 0.0), p(60.0, 50.0), p(50.0, 50.0));
        let band = flow_by_corners(corners).unwrap();
        assert_eq!(band.start_left_ctrl.x, 20.0);
        assert_eq!(band.start_right_ctrl.x, 10.0);
        assert_eq!(band.end_left_ctrl.x, 60.0);
        assert_eq!(band.end_right_ctrl.x, 50.0);
        for point in band.points() {
            assert!(point.is_finite());
        }
    }

    #[test]
    fn corner_turn_band_is_finite() {
        // Horizontal start cross-section turning into a vertical end one.
        let corners = BandCorners::new(p(110.0, 0.0), p(100.0, 0.0), p(200.0, 80.0), p(200.0, 90.0));
        let band = flow_by_corners(corners).unwrap();
        for point in band.points() {
            assert!(point.is_finite(), "{point:?}");
        }
    }

    #[test]
    fn zero_length_cross_section_is_empty() {
        let corners = BandCorners::new(p(5.0, 5.0), p(5.0, 5.0), p(50.0, 50.0), p(60.0, 50.0));
        assert!(flow_by_corners(corners).is_none());
        let corners = BandCorners::new(p(0.0, 0.0), p(10.0, 0.0), p(50.0, 50.0), p(50.0, 50.5));
        assert!(flow_by_corners(corners).is_none());
    }

    #[test]
    fn non_finite_input_is_empty() {
        let corners = BandCorners::new(
            p(f64::NAN, 0.0),
            p(10.0, 0.0),
            p(50.0, 50.0),
            p(60.0, 50.0),
        );
        assert!(flow_by_corners(corners).is_none());
    }

    #[test]
    fn coincident_cross_sections_are_empty() {
        // Start and end identical: the mirror line collapses onto the
        // cross-section itself and every perpendicular meets it at the corner,
        // or the mirror is parallel. Either way no NaN escapes.
        let corners = BandCorners::new(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 0.0), p(10.0, 0.0));
        if let Some(band) = flow_by_corners(corners) {
            for point in band.points() {
                assert!(point.is_finite());
            }
        }
    }

    #[test]
    fn rect_edges() {
        let a = Rect::new(1.0, 2.0, 5.0, 4.0);
        assert_eq!(a.right(), 6.0);
        assert_eq!(a.bottom(), 6.0);
    }

    #[test]
    fn rect_is_empty() {
        assert!(Rect::new(0.0, 0.0, 0.0, 4.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn bounding_of_points() {
        assert_eq!(Rect::bounding(std::iter::empty()), None);
        let r = Rect::bounding([p(3.0, -1.0), p(-2.0, 4.0), p(1.0, 1.0)]).unwrap();
        assert_eq!(r, Rect::new(-2.0, -1.0, 5.0, 5.0));
    }

    #[test]
    fn point_helpers() {
        assert_eq!(p(0.0, 0.0).midpoint(p(4.0, 2.0)), p(2.0, 1.0));
        assert_eq!(p(0.0, 0.0).distance(p(3.0, 4.0)), 5.0);
        assert_eq!(p(1.0, 1.0).offset(2.0, -1.0), p(3.0, 0.0));
        assert_eq!(Point::from((1.5, 2.5)), p(1.5, 2.5));
    }
}
