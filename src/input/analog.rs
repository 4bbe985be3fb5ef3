//! Analog stick processing (octagonal gate, deadzone, full-scale output)

use crate::geometry::{segments_intersect, Point};
use crate::skin::AnalogZone;

/// Full-scale stick value; N64 stick data is a signed byte in [-80, 80]
pub const AXIS_FULL_SCALE: i32 = 80;

/// Octagon edges for the quadrant of `(dx, dy)`, or `None` on an axis
fn quadrant_edges(dx: f32, dy: f32, half_width: f32) -> Option<[(Point, Point); 2]> {
    let c = half_width;
    let a = (c * c / 2.0).sqrt();

    let edges = if dx > 0.0 && dy > 0.0 {
        [
            (Point::new(0.0, c), Point::new(a, a)),
            (Point::new(a, a), Point::new(c, 0.0)),
        ]
    } else if dx < 0.0 && dy > 0.0 {
        [
            (Point::new(0.0, c), Point::new(-a, a)),
            (Point::new(-a, a), Point::new(-c, 0.0)),
        ]
    } else if dx < 0.0 && dy < 0.0 {
        [
            (Point::new(-c, 0.0), Point::new(-a, -a)),
            (Point::new(-a, -a), Point::new(0.0, -c)),
        ]
    } else if dx > 0.0 && dy < 0.0 {
        [
            (Point::new(0.0, -c), Point::new(a, -a)),
            (Point::new(a, -a), Point::new(c, 0.0)),
        ]
    } else {
        return None;
    };

    Some(edges)
}

/// Clip an offset from the stick center to the octagonal gate
///
/// The gate is the octagon inscribed in the circle of radius `half_width`.
/// Offsets inside the gate, and offsets lying exactly on an axis, are
/// returned unchanged.
///
/// # Arguments
/// * `dx`, `dy` - Offset from the zone center (y grows upward)
/// * `half_width` - Radius of the circle the octagon is inscribed in
pub fn clamp_to_octagon(dx: f32, dy: f32, half_width: f32) -> (f32, f32) {
    let Some(edges) = quadrant_edges(dx, dy, half_width) else {
        return (dx, dy);
    };

    let offset = Point::new(dx, dy);
    edges
        .iter()
        .find_map(|&(from, to)| segments_intersect(Point::ORIGIN, offset, from, to))
        .map_or((dx, dy), |p| (p.x, p.y))
}

/// Convert an offset into stick axes
///
/// The throw fraction ramps from 0 at the deadzone to 1 at the maximum
/// radius. A zero distance yields a centered stick.
///
/// # Returns
/// `(axis_x, axis_y)`, each in `[-AXIS_FULL_SCALE, AXIS_FULL_SCALE]`
pub fn stick_axes(dx: f32, dy: f32, distance: f32, zone: &AnalogZone) -> (i32, i32) {
    if distance <= 0.0 {
        return (0, 0);
    }

    let span = zone.maximum - zone.deadzone;
    let throw = if span > 0.0 {
        ((distance - zone.deadzone) / span).clamp(0.0, 1.0)
    } else if distance >= zone.maximum {
        1.0
    } else {
        0.0
    };

    let scale = |v: f32| {
        let value = (v / distance * throw * AXIS_FULL_SCALE as f32).round() as i32;
        value.clamp(-AXIS_FULL_SCALE, AXIS_FULL_SCALE)
    };

    (scale(dx), scale(dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use proptest::prelude::*;

    fn zone(deadzone: f32, maximum: f32) -> AnalogZone {
        AnalogZone {
            bounds: Rect::new(0, 0, 200, 200),
            center: Point::new(100.0, 100.0),
            half_width: 100.0,
            deadzone,
            maximum,
            padding: 0.0,
        }
    }

    #[test]
    fn test_throw_scaling() {
        let zone = zone(0.0, 100.0);
        assert_eq!(stick_axes(50.0, 0.0, 50.0, &zone), (40, 0));
        assert_eq!(stick_axes(0.0, -100.0, 100.0, &zone), (0, -80));
    }

    #[test]
    fn test_deadzone_shifts_the_ramp() {
        let zone = zone(2.0, 100.0);
        // (50 - 2) / 98 * 80 = 39.18
        assert_eq!(stick_axes(50.0, 0.0, 50.0, &zone), (39, 0));
        assert_eq!(stick_axes(1.0, 0.0, 1.0, &zone), (0, 0));
    }

    #[test]
    fn test_saturates_beyond_maximum() {
        let zone = zone(2.0, 100.0);
        assert_eq!(stick_axes(-300.0, 0.0, 300.0, &zone), (-80, 0));
    }

    #[test]
    fn test_zero_distance_is_centered() {
        let zone = zone(0.0, 100.0);
        assert_eq!(stick_axes(0.0, 0.0, 0.0, &zone), (0, 0));
    }

    #[test]
    fn test_diagonal_is_clipped_to_octagon_edge() {
        let (x, y) = clamp_to_octagon(100.0, 100.0, 100.0);
        let a = (100.0f32 * 100.0 / 2.0).sqrt();
        assert!((x - a).abs() < 1e-3);
        assert!((y - a).abs() < 1e-3);
    }

    #[test]
    fn test_inside_gate_is_unchanged() {
        assert_eq!(clamp_to_octagon(10.0, -20.0, 100.0), (10.0, -20.0));
    }

    #[test]
    fn test_on_axis_is_unchanged() {
        assert_eq!(clamp_to_octagon(150.0, 0.0, 100.0), (150.0, 0.0));
        assert_eq!(clamp_to_octagon(0.0, -150.0, 100.0), (0.0, -150.0));
    }

    #[test]
    fn test_every_quadrant_clips() {
        for (sx, sy) in [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)] {
            let (x, y) = clamp_to_octagon(sx * 90.0, sy * 60.0, 100.0);
            assert!(x.hypot(y) < 90.0f32.hypot(60.0), "quadrant ({}, {})", sx, sy);
            assert_eq!(x.signum(), sx);
            assert_eq!(y.signum(), sy);
        }
    }

    proptest! {
        #[test]
        fn prop_octagon_never_grows_the_offset(
            dx in -400.0f32..400.0,
            dy in -400.0f32..400.0,
            half_width in 1.0f32..200.0,
        ) {
            let (x, y) = clamp_to_octagon(dx, dy, half_width);
            prop_assert!(x.hypot(y) <= dx.hypot(dy) + 1e-3);
        }

        #[test]
        fn prop_axes_stay_in_range(
            dx in -400.0f32..400.0,
            dy in -400.0f32..400.0,
            deadzone in 0.0f32..20.0,
            maximum in 21.0f32..200.0,
        ) {
            let zone = zone(deadzone, maximum);
            let (x, y) = stick_axes(dx, dy, dx.hypot(dy), &zone);
            prop_assert!((-AXIS_FULL_SCALE..=AXIS_FULL_SCALE).contains(&x));
            prop_assert!((-AXIS_FULL_SCALE..=AXIS_FULL_SCALE).contains(&y));
        }
    }
}
