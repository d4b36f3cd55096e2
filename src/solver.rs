//! Angular sweep producing the visibility polygon around one origin.
//!
//! Blocking chains are flattened and re-noded, oriented counterclockwise
//! around the origin, and boxed in by a synthetic rectangle so that a
//! ray in any direction hits at least one wall. A ray then sweeps once
//! around the origin, visiting every wall endpoint in angular order and
//! tracking which walls it currently crosses. Whenever the nearest of
//! those walls changes, the corner where the change happens is emitted.

use std::collections::BTreeSet;
use std::iter;

use tracing::{debug, warn};

use crate::endpoints::{Endpoint, EndpointSet, Wall, WallId};
use crate::geometry::{lerp, line_intersection_param, orientation, Orientation};
use crate::noding::{chains_to_segments, node_segments, Segment};
use crate::types::{Bounds, Point2D};

pub const DEFAULT_ENVELOPE_MARGIN: f64 = 1.0;

/// One sweep problem: an origin, the vision extent, and the blocking
/// chains gathered for it.
#[derive(Debug, Clone)]
pub struct VisibilityProblem {
    origin: Point2D,
    vision_bounds: Bounds,
    margin: f64,
    segments: Vec<Segment>,
    bounds: Bounds,
}

#[derive(Debug, Clone, Copy)]
struct NearestWall {
    wall: WallId,
    point: Point2D,
}

impl VisibilityProblem {
    pub fn new(origin: Point2D, vision_bounds: Bounds) -> Self {
        Self {
            origin,
            vision_bounds,
            margin: DEFAULT_ENVELOPE_MARGIN,
            segments: Vec::new(),
            bounds: Bounds::empty(),
        }
    }

    /// Distance between the outermost geometry and the synthetic envelope.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn origin(&self) -> &Point2D {
        &self.origin
    }

    /// Number of raw segments added so far.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Add one polyline. Every point widens the envelope, even those of
    /// zero-length segments.
    pub fn add(&mut self, chain: &[Point2D]) {
        for p in chain {
            self.bounds.expand_to_include(p);
        }
        self.segments.extend(chains_to_segments([chain]));
    }

    /// Run the sweep. Returns the closed visibility polygon, or `None`
    /// when nothing was added or the sweep degenerates.
    pub fn solve(self) -> Option<Vec<Point2D>> {
        if self.segments.is_empty() {
            return None;
        }
        let origin = self.origin;

        let mut envelope = self.bounds;
        envelope.expand_to_include_bounds(&self.vision_bounds);
        envelope.expand_to_include(&origin);
        envelope.expand_by(self.margin);

        let mut set = EndpointSet::new(origin);
        let noded = node_segments(&self.segments);
        let mut dropped = 0usize;
        for (a, b) in noded {
            match orientation(&origin, &a, &b) {
                Orientation::Counterclockwise => {
                    set.add_wall(a, b);
                }
                Orientation::Clockwise => {
                    set.add_wall(b, a);
                }
                Orientation::Collinear => dropped += 1,
            }
        }
        let corners = envelope.corners();
        for i in 0..corners.len() {
            set.add_wall(corners[i], corners[(i + 1) % corners.len()]);
        }

        let graph = set.into_sweep();
        debug!(
            endpoints = graph.endpoints.len(),
            walls = graph.walls.len(),
            collinear_dropped = dropped,
            "sweep prepared"
        );

        let points = sweep(&origin, &graph.endpoints, &graph.walls)?;
        if points.len() < 3 {
            warn!(count = points.len(), "sweep produced too few points");
            return None;
        }
        Some(close(points))
    }
}

fn sweep(origin: &Point2D, endpoints: &[Endpoint], walls: &[Wall]) -> Option<Vec<Point2D>> {
    // Walls crossing the ray at angle zero, approached from below.
    let mut open: BTreeSet<WallId> = BTreeSet::new();
    for endpoint in endpoints {
        apply(&mut open, endpoint);
    }

    let mut points = Vec::new();
    // The first endpoint is visited again at the end to close the turn;
    // only that second visit emits.
    let order = (0..endpoints.len()).chain(iter::once(0));
    for (step, index) in order.enumerate() {
        let endpoint = &endpoints[index];
        let before = nearest_open_wall(origin, endpoint, &open, walls);
        apply(&mut open, endpoint);
        let after = nearest_open_wall(origin, endpoint, &open, walls);

        let (Some(before), Some(after)) = (before, after) else {
            warn!(at = ?endpoint.point(), "sweep ray found no open wall");
            return None;
        };
        if step == 0 || before.wall == after.wall {
            continue;
        }

        if open.contains(&before.wall) {
            // Stepped onto a closer wall that starts here.
            points.push(before.point);
            points.push(*endpoint.point());
        } else {
            // Fell off the end of the previous wall.
            points.push(*endpoint.point());
            if !endpoint.starts_walls().contains(&after.wall) {
                points.push(after.point);
            }
        }
    }
    Some(points)
}

fn apply(open: &mut BTreeSet<WallId>, endpoint: &Endpoint) {
    open.extend(endpoint.starts_walls().iter().copied());
    for wall in endpoint.ends_walls() {
        open.remove(wall);
    }
}

/// Nearest open wall along the ray from `origin` through `endpoint`.
/// Ties keep the lowest wall id.
fn nearest_open_wall(
    origin: &Point2D,
    endpoint: &Endpoint,
    open: &BTreeSet<WallId>,
    walls: &[Wall],
) -> Option<NearestWall> {
    let target = endpoint.point();
    let mut best: Option<(NearestWall, f64)> = None;
    for &id in open {
        let wall = &walls[id];
        let (t, point) = if wall.from == *target || wall.to == *target {
            (1.0, *target)
        } else {
            match line_intersection_param(origin, target, &wall.from, &wall.to) {
                Some(t) if t > 0.0 => (t, lerp(origin, target, t)),
                _ => continue,
            }
        };
        if best.map_or(true, |(_, best_t)| t < best_t) {
            best = Some((NearestWall { wall: id, point }, t));
        }
    }
    best.map(|(nearest, _)| nearest)
}

fn close(mut points: Vec<Point2D>) -> Vec<Point2D> {
    if let Some(&first) = points.first() {
        if points.last() != Some(&first) {
            points.push(first);
        }
    }
    points
}

// -- Tests ---------------------------------------------------------
