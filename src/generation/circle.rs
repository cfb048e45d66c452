//! Circle-event detection for three consecutive arcs

use glam::DVec2;

use super::beachline::{ArcId, Beachline};
use super::events::CircleEvent;
use super::EPSILON;

/// Circumcircle through three points as `(center, radius, det)`
///
/// `None` when two points coincide or the points are collinear. The sign of
/// the returned determinant `2 * cross(b - a, c - a)` tells the turn
/// direction: positive for a counter-clockwise triple.
pub(crate) fn circumcircle(a: DVec2, b: DVec2, c: DVec2) -> Option<(DVec2, f64, f64)> {
    if a.distance_squared(b) < EPSILON * EPSILON
        || b.distance_squared(c) < EPSILON * EPSILON
        || a.distance_squared(c) < EPSILON * EPSILON
    {
        return None;
    }

    // Same value as 2 * (x1 (y2 - y3) + x2 (y3 - y1) + x3 (y1 - y2))
    let ab = b - a;
    let ac = c - a;
    let det = 2.0 * ab.perp_dot(ac);
    if det.abs() < EPSILON {
        return None;
    }

    let ab_sq = ab.length_squared();
    let ac_sq = ac.length_squared();
    let offset = DVec2::new(
        ac.y * ab_sq - ab.y * ac_sq,
        ab.x * ac_sq - ac.x * ab_sq,
    ) / det;

    Some((a + offset, offset.length(), det))
}

/// Check whether arcs `left`, `middle`, `right` will collapse to a point
///
/// Returns the event that squeezes out `middle`, stamped with its current
/// generation. Breakpoints of a clockwise or collinear triple move apart, so
/// only counter-clockwise triples converge. Events that would fire before
/// `sweep_y` are dropped.
pub(crate) fn evaluate(
    beachline: &Beachline,
    left: ArcId,
    middle: ArcId,
    right: ArcId,
    sweep_y: f64,
) -> Option<CircleEvent> {
    let (l, m, r) = (
        beachline.arc(left),
        beachline.arc(middle),
        beachline.arc(right),
    );
    if l.site == r.site || l.site == m.site || m.site == r.site {
        return None;
    }

    let (center, radius, det) = circumcircle(l.focus, m.focus, r.focus)?;
    if det <= 0.0 {
        return None;
    }

    // The sweep touches the circle from below at its top point
    let y = center.y + radius;
    let tolerance = EPSILON * sweep_y.abs().max(radius).max(1.0);
    if y < sweep_y - tolerance {
        return None;
    }

    Some(CircleEvent {
        arc: middle,
        generation: m.generation,
        vertex: center,
        y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circumcircle_of_triangle() {
        let (center, radius, det) = circumcircle(
            DVec2::new(5.0, 10.0),
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
        )
        .unwrap();
        assert!((center - DVec2::new(5.0, 3.75)).length() < 1e-12);
        assert!((radius - 6.25).abs() < 1e-12);
        assert!(det > 0.0);
    }

    #[test]
    fn test_circumcircle_degenerate() {
        let a = DVec2::new(0.0, 0.0);
        assert!(circumcircle(a, DVec2::new(5.0, 0.0), DVec2::new(10.0, 0.0)).is_none());
        assert!(circumcircle(a, a, DVec2::new(1.0, 1.0)).is_none());
        assert!(circumcircle(a, DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0)).is_none());
    }

    #[test]
    fn test_circumcenter_equidistant() {
        let points = [
            DVec2::new(-7.5, 2.25),
            DVec2::new(3.0, -4.0),
            DVec2::new(11.0, 8.5),
        ];
        let (center, radius, _) = circumcircle(points[0], points[1], points[2]).unwrap();
        for p in points {
            assert!((center.distance(p) - radius).abs() < 1e-9);
        }
    }

    fn line_of(points: &[(f64, f64)]) -> (Beachline, Vec<ArcId>) {
        let mut line = Beachline::new(9);
        let mut ids = vec![line.insert_first(0, DVec2::new(points[0].0, points[0].1))];
        for (i, &(x, y)) in points.iter().enumerate().skip(1) {
            let last = *ids.last().unwrap();
            ids.push(line.insert_after(last, i, DVec2::new(x, y)));
        }
        (line, ids)
    }

    #[test]
    fn test_evaluate_converging_triple() {
        let (line, ids) = line_of(&[(5.0, 10.0), (0.0, 0.0), (10.0, 0.0)]);
        let event = evaluate(&line, ids[0], ids[1], ids[2], 10.0).unwrap();
        assert_eq!(event.arc, ids[1]);
        assert_eq!(event.generation, 0);
        assert!((event.y - 10.0).abs() < 1e-12);
        assert!((event.vertex - DVec2::new(5.0, 3.75)).length() < 1e-12);
    }

    #[test]
    fn test_evaluate_diverging_triple() {
        let (line, ids) = line_of(&[(0.0, 0.0), (5.0, 10.0), (10.0, 0.0)]);
        assert!(evaluate(&line, ids[0], ids[1], ids[2], 10.0).is_none());
    }

    #[test]
    fn test_evaluate_collinear_and_repeated_sites() {
        let (line, ids) = line_of(&[(0.0, 0.0), (0.0, 5.0), (0.0, 10.0)]);
        assert!(evaluate(&line, ids[0], ids[1], ids[2], 10.0).is_none());

        // Left and right copies of one split arc never converge
        let mut line = Beachline::new(9);
        let a = line.insert_first(0, DVec2::new(0.0, 0.0));
        let b = line.insert_after(a, 1, DVec2::new(1.0, 3.0));
        let a2 = line.insert_after(b, 0, DVec2::new(0.0, 0.0));
        assert!(evaluate(&line, a, b, a2, 3.0).is_none());
    }

    #[test]
    fn test_evaluate_rejects_past_events() {
        let (line, ids) = line_of(&[(5.0, 10.0), (0.0, 0.0), (10.0, 0.0)]);
        assert!(evaluate(&line, ids[0], ids[1], ids[2], 10.5).is_none());
    }
}
