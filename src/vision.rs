//! The prepared vision boundary: the polygon describing what an
//! observer could see with no topology at all (usually a disc).

use crate::geometry::{point_in_polygon, point_on_ring_boundary, segments_intersect};
use crate::types::{Bounds, Point2D};

/// An unobstructed vision polygon with cached bounds.
#[derive(Debug, Clone)]
pub struct VisionArea {
    vertices: Vec<Point2D>,
    bounds: Bounds,
}

impl VisionArea {
    pub fn new(vertices: Vec<Point2D>) -> Self {
        let bounds = Bounds::from_points(&vertices);
        Self { vertices, bounds }
    }

    /// Polygonal approximation of a disc, vertices counterclockwise from
    /// angle zero. Fewer than 3 segments are raised to 3.
    pub fn disc(center: Point2D, radius: f64, segments: u32) -> Self {
        let n = segments.max(3);
        let step = 2.0 * std::f64::consts::PI / n as f64;
        let vertices = (0..n)
            .map(|i| {
                let angle = step * i as f64;
                Point2D::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
            })
            .collect();
        Self::new(vertices)
    }

    /// Axis-aligned rectangle covering `bounds`.
    pub fn rectangle(bounds: &Bounds) -> Self {
        Self::new(bounds.corners().to_vec())
    }

    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Inclusive of the boundary.
    pub fn contains(&self, p: &Point2D) -> bool {
        self.bounds.contains_point(p)
            && (point_on_ring_boundary(p, &self.vertices) || point_in_polygon(p, &self.vertices))
    }

    /// True if the closed segment [a, b] touches the vision polygon.
    pub fn intersects_segment(&self, a: &Point2D, b: &Point2D) -> bool {
        if !self.bounds.intersects(&Bounds::from_points([a, b])) {
            return false;
        }
        if self.contains(a) || self.contains(b) {
            return true;
        }
        let n = self.vertices.len();
        (0..n).any(|i| segments_intersect(a, b, &self.vertices[i], &self.vertices[(i + 1) % n]))
    }
}
