//! Sweep endpoints: every vertex of every blocking wall, deduplicated
//! and ordered counterclockwise around the sweep origin.
//!
//! Endpoints and walls live in arenas and refer to each other by index.
//! Points are bucketed by octant around the origin (sign and magnitude
//! comparisons only), each bucket is sorted with the exact orientation
//! predicate, and equal coordinates, which are always adjacent after
//! sorting, are merged into one endpoint.

use std::cmp::Ordering;

use crate::geometry::{orientation, Orientation};
use crate::types::Point2D;

pub type EndpointId = usize;
pub type WallId = usize;

const NUM_OCTANTS: usize = 8;

/// A deduplicated sweep vertex and the walls incident to it.
#[derive(Debug, Clone)]
pub struct Endpoint {
    point: Point2D,
    pseudoangle: f64,
    distance: f64,
    starts_walls: Vec<WallId>,
    ends_walls: Vec<WallId>,
}

impl Endpoint {
    fn new(point: Point2D, origin: &Point2D) -> Self {
        Self {
            point,
            pseudoangle: pseudoangle(point.x - origin.x, point.y - origin.y),
            distance: point.distance(origin),
            starts_walls: Vec::new(),
            ends_walls: Vec::new(),
        }
    }

    pub fn point(&self) -> &Point2D {
        &self.point
    }

    /// Monotonic stand-in for the angle around the origin, in [0, 4).
    pub fn pseudoangle(&self) -> f64 {
        self.pseudoangle
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Walls that leave this point counterclockwise.
    pub fn starts_walls(&self) -> &[WallId] {
        &self.starts_walls
    }

    /// Walls that arrive at this point counterclockwise.
    pub fn ends_walls(&self) -> &[WallId] {
        &self.ends_walls
    }
}

/// A directed wall, counterclockwise around the origin from `start` to `end`.
#[derive(Debug, Clone, Copy)]
pub struct Wall {
    pub start: EndpointId,
    pub end: EndpointId,
    pub from: Point2D,
    pub to: Point2D,
}

/// Collects walls around an origin, then orders their endpoints.
#[derive(Debug)]
pub struct EndpointSet {
    origin: Point2D,
    raw: Vec<Endpoint>,
    buckets: [Vec<EndpointId>; NUM_OCTANTS],
    walls: Vec<Wall>,
}

/// Endpoints in counterclockwise order plus the walls between them.
#[derive(Debug)]
pub struct SweepGraph {
    pub endpoints: Vec<Endpoint>,
    pub walls: Vec<Wall>,
}

impl EndpointSet {
    pub fn new(origin: Point2D) -> Self {
        Self {
            origin,
            raw: Vec::new(),
            buckets: std::array::from_fn(|_| Vec::new()),
            walls: Vec::new(),
        }
    }

    pub fn origin(&self) -> &Point2D {
        &self.origin
    }

    /// Record a wall already oriented counterclockwise around the origin.
    pub fn add_wall(&mut self, from: Point2D, to: Point2D) -> WallId {
        let wall = self.walls.len();
        let start = self.add_point(from);
        let end = self.add_point(to);
        self.raw[start].starts_walls.push(wall);
        self.raw[end].ends_walls.push(wall);
        self.walls.push(Wall { start, end, from, to });
        wall
    }

    fn add_point(&mut self, point: Point2D) -> EndpointId {
        let id = self.raw.len();
        let octant = octant(point.x - self.origin.x, point.y - self.origin.y);
        self.raw.push(Endpoint::new(point, &self.origin));
        self.buckets[octant].push(id);
        id
    }

    /// Sort, merge duplicates and rewrite wall references.
    pub fn into_sweep(self) -> SweepGraph {
        let EndpointSet {
            origin,
            mut raw,
            mut buckets,
            mut walls,
        } = self;

        let mut remap: Vec<EndpointId> = vec![0; raw.len()];
        let mut ordered: Vec<Endpoint> = Vec::with_capacity(raw.len());
        for bucket in buckets.iter_mut() {
            bucket.sort_by(|&a, &b| compare_around(&origin, &raw[a], &raw[b]));
            let bucket_start = ordered.len();
            for &id in bucket.iter() {
                let endpoint = std::mem::replace(&mut raw[id], Endpoint::new(origin, &origin));
                let duplicate = ordered.len() > bucket_start
                    && ordered.last().map(|last| last.point) == Some(endpoint.point);
                match ordered.last_mut() {
                    Some(last) if duplicate => {
                        last.starts_walls.extend(endpoint.starts_walls);
                        last.ends_walls.extend(endpoint.ends_walls);
                    }
                    _ => ordered.push(endpoint),
                }
                remap[id] = ordered.len() - 1;
            }
        }

        for wall in &mut walls {
            wall.start = remap[wall.start];
            wall.end = remap[wall.end];
        }

        SweepGraph {
            endpoints: ordered,
            walls,
        }
    }
}

/// Order within one octant: counterclockwise first, nearer first on a tie.
fn compare_around(origin: &Point2D, a: &Endpoint, b: &Endpoint) -> Ordering {
    match orientation(origin, &a.point, &b.point) {
        Orientation::Counterclockwise => Ordering::Less,
        Orientation::Clockwise => Ordering::Greater,
        Orientation::Collinear => a.distance.total_cmp(&b.distance),
    }
}

/// Octant index counterclockwise from the +x axis. Each octant is
/// half-open, [k·45°, (k+1)·45°).
fn octant(dx: f64, dy: f64) -> usize {
    if dx == 0.0 && dy == 0.0 {
        0
    } else if dx > 0.0 && dy >= 0.0 {
        if dy < dx {
            0
        } else {
            1
        }
    } else if dx <= 0.0 && dy > 0.0 {
        if -dx < dy {
            2
        } else {
            3
        }
    } else if dx < 0.0 && dy <= 0.0 {
        if -dy < -dx {
            4
        } else {
            5
        }
    } else if dx < -dy {
        6
    } else {
        7
    }
}

/// Diamond angle: maps direction (dx, dy) monotonically onto [0, 4).
fn pseudoangle(dx: f64, dy: f64) -> f64 {
    let sum = dx.abs() + dy.abs();
    if sum == 0.0 {
        return 0.0;
    }
    let p = dy / sum;
    if dx < 0.0 {
        2.0 - p
    } else if dy < 0.0 {
        4.0 + p
    } else {
        p
    }
}
