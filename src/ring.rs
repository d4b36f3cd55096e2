//! Boundary rings: one closed contour of a topology region plus the
//! geometric facts derived from it once at construction.
//!
//! Winding decides the kind of region a ring bounds. Counterclockwise
//! rings (positive shoelace area) bound open space, clockwise rings
//! bound solid obstructions. Walking any ring, the solid side is on the
//! right.

use crate::geometry::{
    orientation, point_in_polygon, point_on_ring_boundary, signed_area, Orientation,
};
use crate::types::{Bounds, Facing, Point2D};
use crate::vision::VisionArea;

/// An immutable closed ring. The zero-vertex ring stands for the whole
/// plane and is always open.
#[derive(Debug, Clone)]
pub struct Ring {
    vertices: Vec<Point2D>,
    bounds: Bounds,
    interior_point: Option<Point2D>,
    signed_area: f64,
    is_open: bool,
}

impl Ring {
    /// Build a ring from one contour. A repeated closing vertex and
    /// consecutive duplicates are dropped.
    pub fn new(vertices: impl IntoIterator<Item = Point2D>) -> Self {
        let mut normalized: Vec<Point2D> = Vec::new();
        for v in vertices {
            if normalized.last() != Some(&v) {
                normalized.push(v);
            }
        }
        while normalized.len() > 1 && normalized.first() == normalized.last() {
            normalized.pop();
        }

        let bounds = Bounds::from_points(&normalized);
        let signed_area = signed_area(&normalized);
        let interior_point = interior_point(&normalized, &bounds);
        Self {
            is_open: signed_area > 0.0,
            vertices: normalized,
            bounds,
            interior_point,
            signed_area,
        }
    }

    /// The ring covering the entire plane.
    pub fn unbounded() -> Self {
        Self {
            vertices: Vec::new(),
            bounds: Bounds::infinite(),
            interior_point: None,
            signed_area: f64::INFINITY,
            is_open: true,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Fewer than three vertices or no enclosed area.
    pub fn is_degenerate(&self) -> bool {
        !self.is_unbounded() && (self.vertices.len() < 3 || self.signed_area == 0.0)
    }

    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Area of the bounding box; infinite for the unbounded ring.
    pub fn bounds_area(&self) -> f64 {
        self.bounds.area()
    }

    pub fn signed_area(&self) -> f64 {
        self.signed_area
    }

    /// A point strictly inside the ring, if the ring encloses any area.
    pub fn interior_point(&self) -> Option<Point2D> {
        self.interior_point
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Point-in-ring test, inclusive of the ring itself for both kinds.
    pub fn contains(&self, p: &Point2D) -> bool {
        if self.is_unbounded() {
            return true;
        }
        if !self.bounds.contains_point(p) {
            return false;
        }
        point_on_ring_boundary(p, &self.vertices) || point_in_polygon(p, &self.vertices)
    }

    /// Edge chains of this ring that can block vision from `origin`.
    ///
    /// An edge (p1, p2) is kept when it touches `vision` and the
    /// orientation of (origin, p1, p2) matches `facing`: clockwise when
    /// the solid side must face the origin, counterclockwise when the
    /// open side must. Runs of kept edges are joined into polylines.
    pub fn facing_segments(
        &self,
        origin: &Point2D,
        facing: Facing,
        vision: &VisionArea,
    ) -> Vec<Vec<Point2D>> {
        let n = self.vertices.len();
        if n < 2 {
            return Vec::new();
        }
        let required = match facing {
            Facing::SolidSideFacesOrigin => Orientation::Clockwise,
            Facing::OpenSideFacesOrigin => Orientation::Counterclockwise,
        };

        let mut chains: Vec<Vec<Point2D>> = Vec::new();
        let mut current: Vec<Point2D> = Vec::new();
        // Whether the first chain begins with the closing edge and the
        // last chain ends with the final edge, so the two can be joined.
        let mut first_starts_at_closing_edge = false;
        let mut last_reaches_end = false;

        let mut previous = self.vertices[n - 1];
        for (i, &vertex) in self.vertices.iter().enumerate() {
            let keep = orientation(origin, &previous, &vertex) == required
                && vision.intersects_segment(&previous, &vertex);
            if keep {
                if current.is_empty() {
                    if i == 0 {
                        first_starts_at_closing_edge = true;
                    }
                    current.push(previous);
                }
                current.push(vertex);
                if i == n - 1 {
                    last_reaches_end = true;
                }
            } else if !current.is_empty() {
                chains.push(std::mem::take(&mut current));
            }
            previous = vertex;
        }
        if !current.is_empty() {
            chains.push(current);
        }

        if chains.len() > 1 && first_starts_at_closing_edge && last_reaches_end {
            let first = chains.remove(0);
            if let Some(last) = chains.last_mut() {
                last.extend_from_slice(&first[1..]);
            }
        }
        chains
    }
}

/// Interior point by horizontal scanline: pick a scan height between
/// vertex ordinates near the middle of the box, then take the midpoint
/// of the widest interior interval along that line.
fn interior_point(vertices: &[Point2D], bounds: &Bounds) -> Option<Point2D> {
    let n = vertices.len();
    if n < 3 || bounds.is_empty() {
        return None;
    }

    let centre_y = (bounds.min_y + bounds.max_y) / 2.0;
    let mut hi_y = bounds.max_y;
    let mut lo_y = bounds.min_y;
    for v in vertices {
        if v.y <= centre_y {
            if v.y > lo_y {
                lo_y = v.y;
            }
        } else if v.y < hi_y {
            hi_y = v.y;
        }
    }
    let scan_y = (lo_y + hi_y) / 2.0;

    let mut crossings: Vec<f64> = Vec::new();
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&vertices[j], &vertices[i]);
        if (a.y > scan_y) != (b.y > scan_y) {
            crossings.push(a.x + (scan_y - a.y) * (b.x - a.x) / (b.y - a.y));
        }
        j = i;
    }
    crossings.sort_by(f64::total_cmp);

    crossings
        .chunks_exact(2)
        .filter(|pair| pair[1] > pair[0])
        .max_by(|l, r| (l[1] - l[0]).total_cmp(&(r[1] - r[0])))
        .map(|pair| Point2D::new((pair[0] + pair[1]) / 2.0, scan_y))
}
