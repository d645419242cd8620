//! Property-based invariant tests for band geometry.
//!
//! 1. Band construction never panics and never yields non-finite points.
//! 2. A cross-section shorter than the minimum always yields no band.
//! 3. Line intersection is symmetric in its two lines.
//! 4. An intersection point lies on both lines.
//! 5. Control points sit on the perpendicular through their corner.

use proptest::prelude::*;
use sankey_core::geometry::{
    BandCorners, MIN_CROSS_SECTION, Point, flow_by_corners, line_intersect,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn point_strategy() -> impl Strategy<Value = Point> {
    (-2_000.0f64..2_000.0, -2_000.0f64..2_000.0).prop_map(|(x, y)| Point::new(x, y))
}

fn corners_strategy() -> impl Strategy<Value = BandCorners> {
    (
        point_strategy(),
        point_strategy(),
        point_strategy(),
        point_strategy(),
    )
        .prop_map(|(a, b, c, d)| BandCorners::new(a, b, c, d))
}

/// Distance from `p` to the infinite line through `a` and `b`.
fn distance_to_line(p: Point, a: Point, b: Point) -> f64 {
    let len = a.distance(b);
    ((b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y)).abs() / len
}

/// Both lines have real length and cross at a reasonable angle; near-parallel
/// pairs cross far away and amplify rounding.
fn well_conditioned(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let (la, lb) = (a1.distance(a2), b1.distance(b2));
    let cross = (a2.x - a1.x) * (b2.y - b1.y) - (a2.y - a1.y) * (b2.x - b1.x);
    la > 1.0 && lb > 1.0 && cross.abs() > 0.1 * la * lb
}

// ═════════════════════════════════════════════════════════════════════════
// 1. No panics, no NaN
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn band_points_are_finite(corners in corners_strategy()) {
        if let Some(band) = flow_by_corners(corners) {
            for point in band.points() {
                prop_assert!(point.is_finite(), "non-finite point {:?} for {:?}", point, corners);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Degenerate cross-sections draw nothing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn collapsed_start_is_empty(
        start in point_strategy(),
        dx in 0.0f64..0.7,
        end_left in point_strategy(),
        end_right in point_strategy(),
    ) {
        let corners = BandCorners::new(start, start.offset(dx, 0.0), end_left, end_right);
        prop_assert!(dx < MIN_CROSS_SECTION);
        prop_assert!(flow_by_corners(corners).is_none());
    }

    #[test]
    fn collapsed_end_is_empty(
        start_left in point_strategy(),
        start_right in point_strategy(),
        end in point_strategy(),
    ) {
        let corners = BandCorners::new(start_left, start_right, end, end);
        prop_assert!(flow_by_corners(corners).is_none());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Intersection symmetry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn intersection_is_symmetric(
        a1 in point_strategy(),
        a2 in point_strategy(),
        b1 in point_strategy(),
        b2 in point_strategy(),
    ) {
        let ab = line_intersect(a1, a2, b1, b2);
        let ba = line_intersect(b1, b2, a1, a2);
        prop_assert_eq!(ab.is_some(), ba.is_some());
        if let (Some(ab), Some(ba)) = (ab, ba) {
            prop_assert_eq!(ab.within_first, ba.within_second);
            prop_assert_eq!(ab.within_second, ba.within_first);
            if well_conditioned(a1, a2, b1, b2) {
                let scale = 1.0 + ab.point.x.abs().max(ab.point.y.abs());
                prop_assert!(ab.point.distance(ba.point) <= 1e-9 * scale);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Intersection lies on both lines
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn intersection_on_both_lines(
        a1 in point_strategy(),
        a2 in point_strategy(),
        b1 in point_strategy(),
        b2 in point_strategy(),
    ) {
        prop_assume!(well_conditioned(a1, a2, b1, b2));
        let hit = line_intersect(a1, a2, b1, b2).expect("non-parallel lines intersect");
        prop_assert!(distance_to_line(hit.point, a1, a2) < 1e-6);
        prop_assert!(distance_to_line(hit.point, b1, b2) < 1e-6);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Controls on corner perpendiculars
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn vertical_fan_controls_share_corner_x(
        x_start in 0.0f64..500.0,
        width in 2.0f64..150.0,
        x_end in 0.0f64..500.0,
        drop in 10.0f64..200.0,
    ) {
        // Horizontal cross-sections: every perpendicular is vertical.
        let corners = BandCorners::new(
            Point::new(x_start + width, 0.0),
            Point::new(x_start, 0.0),
            Point::new(x_end + width, drop),
            Point::new(x_end, drop),
        );
        let band = flow_by_corners(corners).expect("well-formed band");
        prop_assert!((band.start_left_ctrl.x - (x_start + width)).abs() < 1e-9);
        prop_assert!((band.start_right_ctrl.x - x_start).abs() < 1e-9);
        prop_assert!((band.end_left_ctrl.x - (x_end + width)).abs() < 1e-9);
        prop_assert!((band.end_right_ctrl.x - x_end).abs() < 1e-9);
    }
}
