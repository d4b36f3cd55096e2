//! Planar predicates and constructions shared by the ring, tree and sweep.
//!
//! Orientation goes through `robust::orient2d` (adaptive exact
//! arithmetic), so every "which side / collinear" decision is exact.
//! Constructed points (intersections) are plain floating point.

use robust::Coord;

use crate::types::Point2D;

/// Turn direction of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    Collinear,
    Counterclockwise,
}

#[inline]
fn coord(p: &Point2D) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Exact orientation of (a, b, c).
pub fn orientation(a: &Point2D, b: &Point2D, c: &Point2D) -> Orientation {
    let det = robust::orient2d(coord(a), coord(b), coord(c));
    if det > 0.0 {
        Orientation::Counterclockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Signed shoelace area: positive for counterclockwise rings.
pub fn signed_area(vertices: &[Point2D]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += vertices[i].x * vertices[j].y;
        area -= vertices[j].x * vertices[i].y;
    }
    area / 2.0
}

/// Unsigned polygon area. A repeated closing vertex adds nothing.
pub fn polygon_area(vertices: &[Point2D]) -> f64 {
    signed_area(vertices).abs()
}

/// True if `p` lies on the closed segment [a, b].
pub fn point_on_segment(p: &Point2D, a: &Point2D, b: &Point2D) -> bool {
    if orientation(a, b, p) != Orientation::Collinear {
        return false;
    }
    a.x.min(b.x) <= p.x && p.x <= a.x.max(b.x) && a.y.min(b.y) <= p.y && p.y <= a.y.max(b.y)
}

/// Ray-casting point-in-polygon test. Boundary points are unspecified;
/// callers that care test [`point_on_ring_boundary`] first.
pub fn point_in_polygon(p: &Point2D, vertices: &[Point2D]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (vertices[i].x, vertices[i].y);
        let (xj, yj) = (vertices[j].x, vertices[j].y);
        if (yi > p.y) != (yj > p.y) {
            let intersect_x = (xj - xi) * (p.y - yi) / (yj - yi) + xi;
            if p.x < intersect_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// True if `p` lies on any edge of the closed ring.
pub fn point_on_ring_boundary(p: &Point2D, vertices: &[Point2D]) -> bool {
    let n = vertices.len();
    (0..n).any(|i| point_on_segment(p, &vertices[i], &vertices[(i + 1) % n]))
}

/// Intersection of the infinite lines through (p0, p1) and (q0, q1),
/// expressed as the parameter `t` along p0 → p1. `None` when parallel.
pub fn line_intersection_param(p0: &Point2D, p1: &Point2D, q0: &Point2D, q1: &Point2D) -> Option<f64> {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let sx = q1.x - q0.x;
    let sy = q1.y - q0.y;
    let denom = dx * sy - dy * sx;
    if denom == 0.0 {
        return None;
    }
    Some(((q0.x - p0.x) * sy - (q0.y - p0.y) * sx) / denom)
}

/// Point at parameter `t` along a → b.
#[inline]
pub fn lerp(a: &Point2D, b: &Point2D, t: f64) -> Point2D {
    Point2D::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

/// Crossing point of two segments that properly intersect (each
/// segment strictly straddles the other). Touching, collinear and
/// disjoint pairs return `None`.
pub fn proper_intersection(a: &Point2D, b: &Point2D, c: &Point2D, d: &Point2D) -> Option<Point2D> {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);
    if o1 == Orientation::Collinear
        || o2 == Orientation::Collinear
        || o3 == Orientation::Collinear
        || o4 == Orientation::Collinear
        || o1 == o2
        || o3 == o4
    {
        return None;
    }
    let t = line_intersection_param(a, b, c, d)?;
    Some(lerp(a, b, t.clamp(0.0, 1.0)))
}

/// True if the closed segments [a, b] and [c, d] share any point.
pub fn segments_intersect(a: &Point2D, b: &Point2D, c: &Point2D, d: &Point2D) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);
    if o1 != o2 && o3 != o4 {
        return true;
    }
    point_on_segment(c, a, b)
        || point_on_segment(d, a, b)
        || point_on_segment(a, c, d)
        || point_on_segment(b, c, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn orientation_signs() {
        assert_eq!(orientation(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0)), Orientation::Counterclockwise);
        assert_eq!(orientation(&p(0.0, 0.0), &p(0.0, 1.0), &p(1.0, 0.0)), Orientation::Clockwise);
        assert_eq!(orientation(&p(0.0, 0.0), &p(1.0, 1.0), &p(3.0, 3.0)), Orientation::Collinear);
    }

    #[test]
    fn orientation_is_exact_near_collinear() {
        let a = p(0.5, 0.5);
        let b = p(12.0, 12.0);
        let c = p(24.0, 24.0);
        assert_eq!(orientation(&a, &b, &c), Orientation::Collinear);
        let c_off = p(24.0, 24.000000000000004);
        assert_eq!(orientation(&a, &b, &c_off), Orientation::Counterclockwise);
    }

    #[test]
    fn area_unit_square() {
        let ccw = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!((signed_area(&ccw) - 1.0).abs() < 1e-12);
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert!((signed_area(&cw) + 1.0).abs() < 1e-12);
        assert!((polygon_area(&cw) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn point_inside_polygon() {
        let sq = vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        assert!(point_in_polygon(&p(5.0, 5.0), &sq));
        assert!(!point_in_polygon(&p(15.0, 5.0), &sq));
        assert!(point_on_ring_boundary(&p(10.0, 3.0), &sq));
        assert!(point_on_ring_boundary(&p(0.0, 0.0), &sq));
        assert!(!point_on_ring_boundary(&p(5.0, 5.0), &sq));
    }

    #[test]
    fn crossing_segments() {
        let x = proper_intersection(&p(0.0, 0.0), &p(10.0, 10.0), &p(0.0, 10.0), &p(10.0, 0.0));
        let x = x.expect("segments cross");
        assert!((x.x - 5.0).abs() < 1e-12 && (x.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn touching_is_not_proper() {
        // T-junction: c lies on ab.
        assert!(proper_intersection(&p(0.0, 0.0), &p(10.0, 0.0), &p(5.0, 0.0), &p(5.0, 5.0)).is_none());
        assert!(segments_intersect(&p(0.0, 0.0), &p(10.0, 0.0), &p(5.0, 0.0), &p(5.0, 5.0)));
    }

    #[test]
    fn disjoint_segments() {
        assert!(!segments_intersect(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)));
        assert!(!segments_intersect(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0), &p(3.0, 0.0)));
        assert!(segments_intersect(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 0.0), &p(3.0, 0.0)));
    }

    #[test]
    fn line_param_hits_segment() {
        let t = line_intersection_param(&p(0.0, 0.0), &p(1.0, 0.0), &p(5.0, -5.0), &p(5.0, 5.0));
        assert!((t.expect("not parallel") - 5.0).abs() < 1e-9);
        assert!(line_intersection_param(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)).is_none());
    }
}
