//! 2D geometry primitives for pad-space layout
//!
//! Provides the point/rectangle types used by the skin model, the
//! segment-intersection test behind the octagonal analog gate, and the
//! center-fit placement used when positioning mask images on the pad.

use serde::Serialize;

/// A 2D point with single-precision coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

}

/// Axis-aligned rectangle in integer pad pixels
///
/// The right and bottom edges are exclusive: a rectangle at `x = 10` with
/// `width = 4` contains columns 10 through 13.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the pixel `(px, py)` lies inside this rectangle
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Test whether two directed segments cross, returning the crossing point
///
/// The first segment runs `a1 -> a2`, the second `b1 -> b2`. The parameter
/// along the first segment must fall in `[0, 1)` and the parameter along
/// the second in `[0, 1]`. Parallel or degenerate segments (zero
/// determinant) never intersect.
///
/// # Example
/// ```
/// use touchpad_skin::geometry::{segments_intersect, Point};
///
/// let hit = segments_intersect(
///     Point::new(0.0, 0.0),
///     Point::new(2.0, 2.0),
///     Point::new(0.0, 2.0),
///     Point::new(2.0, 0.0),
/// );
/// assert_eq!(hit, Some(Point::new(1.0, 1.0)));
/// ```
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let va = Point::new(a2.x - a1.x, a2.y - a1.y);
    let vb = Point::new(b2.x - b1.x, b2.y - b1.y);

    let det = va.x * vb.y - va.y * vb.x;
    if det == 0.0 {
        return None;
    }

    let ox = b1.x - a1.x;
    let oy = b1.y - a1.y;

    // a1 + t*va == b1 + s*vb
    let t = (ox * vb.y - oy * vb.x) / det;
    let s = (ox * va.y - oy * va.x) / det;

    if (0.0..1.0).contains(&t) && (0.0..=1.0).contains(&s) {
        Some(Point::new(a1.x + t * va.x, a1.y + t * va.y))
    } else {
        None
    }
}

/// Clamp a desired center so that `[center - half, center + half]` stays
/// within `[min, max]` along one axis
///
/// The upper bound is applied last, so an extent wider than the bounds
/// ends flush with `max` and starts before `min`.
pub fn fit_axis(center: i32, half: i32, min: i32, max: i32) -> i32 {
    let mut c = center;
    if c < min + half {
        c = min + half;
    }
    if c + half > max {
        c = max - half;
    }
    c
}

/// Center a `width x height` box at `(cx, cy)` without crossing `bounds`
///
/// Returns the placed rectangle. Only the position changes; the size is
/// always preserved.
pub fn fit_center(cx: i32, cy: i32, width: i32, height: i32, bounds: Rect) -> Rect {
    let half_w = width / 2;
    let half_h = height / 2;

    let cx = fit_axis(cx, half_w, bounds.x, bounds.x + bounds.width);
    let cy = fit_axis(cy, half_h, bounds.y, bounds.y + bounds.height);

    Rect::new(cx - half_w, cy - half_h, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_crossing_segments() {
        let hit = segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(1.0, -1.0),
            Point::new(1.0, 1.0),
        );
        assert_eq!(hit, Some(Point::new(1.0, 0.0)));
    }

    #[test]
    fn test_parallel_segments_never_cross() {
        let hit = segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(4.0, 1.0),
        );
        assert_eq!(hit, None);

        // Degenerate (zero-length) segment
        let hit = segments_intersect(
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn test_segments_that_stop_short() {
        let hit = segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(1.0, -1.0),
            Point::new(1.0, 1.0),
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn test_parameter_ranges() {
        // First segment ends exactly on the second: t == 1 is excluded
        let hit = segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, -1.0),
            Point::new(1.0, 1.0),
        );
        assert_eq!(hit, None);

        // Second segment ends exactly on the first: s == 1 is included
        let hit = segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(1.0, -1.0),
            Point::new(1.0, 0.0),
        );
        assert_eq!(hit, Some(Point::new(1.0, 0.0)));
    }

    #[test]
    fn test_fit_center_inside_bounds_is_untouched() {
        let pad = Rect::new(0, 0, 966, 360);
        let placed = fit_center(483, 180, 100, 50, pad);
        assert_eq!(placed, Rect::new(433, 155, 100, 50));
    }

    #[test]
    fn test_fit_center_clamps_to_edges() {
        let pad = Rect::new(0, 0, 966, 360);

        let placed = fit_center(0, 0, 100, 50, pad);
        assert_eq!(placed, Rect::new(0, 0, 100, 50));

        let placed = fit_center(966, 360, 100, 50, pad);
        assert_eq!(placed, Rect::new(866, 310, 100, 50));
    }

    #[test]
    fn test_fit_center_in_sub_rectangle() {
        let area = Rect::new(100, 100, 200, 100);
        let placed = fit_center(0, 0, 40, 40, area);
        assert_eq!(placed, Rect::new(100, 100, 40, 40));
    }

    #[test]
    fn test_oversized_mask_ends_on_far_edge() {
        let pad = Rect::new(0, 0, 966, 360);
        let placed = fit_center(483, 180, 968, 364, pad);
        assert_eq!(placed, Rect::new(-2, -4, 968, 364));
        assert_eq!(placed.x + placed.width, 966);
        assert_eq!(placed.y + placed.height, 360);
    }

    fn bbox_contains(a: Point, b: Point, p: Point) -> bool {
        const EPS: f32 = 0.1;
        p.x >= a.x.min(b.x) - EPS
            && p.x <= a.x.max(b.x) + EPS
            && p.y >= a.y.min(b.y) - EPS
            && p.y <= a.y.max(b.y) + EPS
    }

    proptest! {
        #[test]
        fn prop_intersection_lies_in_both_bounding_boxes(
            ax1 in -100.0f32..100.0, ay1 in -100.0f32..100.0,
            ax2 in -100.0f32..100.0, ay2 in -100.0f32..100.0,
            bx1 in -100.0f32..100.0, by1 in -100.0f32..100.0,
            bx2 in -100.0f32..100.0, by2 in -100.0f32..100.0,
        ) {
            let (a1, a2) = (Point::new(ax1, ay1), Point::new(ax2, ay2));
            let (b1, b2) = (Point::new(bx1, by1), Point::new(bx2, by2));
            // Keep away from near-parallel pairs where f32 rounding dominates
            let det = (ax2 - ax1) * (by2 - by1) - (ay2 - ay1) * (bx2 - bx1);
            prop_assume!(det.abs() > 100.0);
            if let Some(p) = segments_intersect(a1, a2, b1, b2) {
                prop_assert!(bbox_contains(a1, a2, p));
                prop_assert!(bbox_contains(b1, b2, p));
            }
        }

        #[test]
        fn prop_fit_center_is_idempotent(
            cx in -500i32..1500, cy in -500i32..800,
            w in 1i32..300, h in 1i32..300,
        ) {
            let pad = Rect::new(0, 0, 966, 360);
            let first = fit_center(cx, cy, w, h, pad);
            let second = fit_center(first.x + w / 2, first.y + h / 2, w, h, pad);
            prop_assert_eq!(first, second);
        }
    }
}
