//! Visibility queries against a full topology.
//!
//! A [`Topology`] holds one containment tree per obstruction kind. Each
//! query collects the blocking chains every kind contributes for the
//! observer, then sweeps them into a single visibility polygon. Many
//! observers can be evaluated against the same topology in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{point_in_polygon, point_on_ring_boundary, polygon_area};
use crate::selector::BlockingAccumulator;
use crate::solver::VisibilityProblem;
use crate::tree::ContainmentTree;
use crate::types::{Point2D, TopologyInput, TopologyKind, VisionParams};
use crate::vision::VisionArea;

// -- Topology ------------------------------------------------------

/// The four obstruction layers of a map. Immutable once built; an edit
/// replaces the affected tree wholesale.
#[derive(Debug, Default)]
pub struct Topology {
    wall: ContainmentTree,
    hill: ContainmentTree,
    pit: ContainmentTree,
    cover: ContainmentTree,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_input(input: &TopologyInput) -> Self {
        let build = |kind| ContainmentTree::from_contours(input.contours(kind).iter().cloned());
        Self {
            wall: build(TopologyKind::Wall),
            hill: build(TopologyKind::Hill),
            pit: build(TopologyKind::Pit),
            cover: build(TopologyKind::Cover),
        }
    }

    pub fn tree(&self, kind: TopologyKind) -> &ContainmentTree {
        match kind {
            TopologyKind::Wall => &self.wall,
            TopologyKind::Hill => &self.hill,
            TopologyKind::Pit => &self.pit,
            TopologyKind::Cover => &self.cover,
        }
    }

    /// Replace the tree for one kind.
    pub fn set(&mut self, kind: TopologyKind, tree: ContainmentTree) {
        let slot = match kind {
            TopologyKind::Wall => &mut self.wall,
            TopologyKind::Hill => &mut self.hill,
            TopologyKind::Pit => &mut self.pit,
            TopologyKind::Cover => &mut self.cover,
        };
        *slot = tree;
    }

    /// True when no kind has any obstruction.
    pub fn is_empty(&self) -> bool {
        TopologyKind::ALL.iter().all(|&kind| self.tree(kind).is_empty())
    }
}

// -- Results -------------------------------------------------------

/// Outcome of one visibility query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Visibility {
    /// The observer sees nothing at all.
    Blocked,
    /// Nothing obstructs the observer; the whole vision area is visible.
    Unobstructed,
    /// Closed polygon of everything in line of sight.
    Polygon { points: Vec<Point2D> },
}

impl Visibility {
    /// Whether `point` is in line of sight. Points on the polygon
    /// boundary count as visible.
    pub fn is_visible(&self, point: &Point2D) -> bool {
        match self {
            Visibility::Blocked => false,
            Visibility::Unobstructed => true,
            Visibility::Polygon { points } => {
                point_on_ring_boundary(point, points) || point_in_polygon(point, points)
            }
        }
    }

    /// Visible area. Infinite when unobstructed, since the vision area
    /// is not part of the result.
    pub fn area(&self) -> f64 {
        match self {
            Visibility::Blocked => 0.0,
            Visibility::Unobstructed => f64::INFINITY,
            Visibility::Polygon { points } => polygon_area(points),
        }
    }

    pub fn points(&self) -> Option<&[Point2D]> {
        match self {
            Visibility::Polygon { points } => Some(points),
            _ => None,
        }
    }
}

// -- Queries -------------------------------------------------------

/// Compute what an observer at `origin` can see within `vision`.
///
/// Kinds are applied in the order wall, hill, pit, cover; the first one
/// that blocks outright ends the query.
pub fn compute_visibility(
    origin: Point2D,
    vision: &VisionArea,
    topology: &Topology,
    params: &VisionParams,
) -> Visibility {
    let mut accumulator = BlockingAccumulator::new(origin, vision);
    for kind in TopologyKind::ALL {
        if !accumulator.add(kind, topology.tree(kind)) {
            debug!(?origin, ?kind, "vision fully blocked");
            return Visibility::Blocked;
        }
    }

    let chains = accumulator.into_segments();
    let mut problem =
        VisibilityProblem::new(origin, *vision.bounds()).with_margin(params.envelope_margin);
    for chain in &chains {
        problem.add(chain);
    }
    debug!(
        ?origin,
        chains = chains.len(),
        segments = problem.segment_count(),
        "solving visibility"
    );

    match problem.solve() {
        Some(points) => Visibility::Polygon { points },
        None => Visibility::Unobstructed,
    }
}

/// Evaluate many observers, each with a disc of `radius`, in parallel.
/// Results are in observer order.
pub fn compute_visibility_batch(
    observers: &[Point2D],
    radius: f64,
    topology: &Topology,
    params: &VisionParams,
) -> Vec<Visibility> {
    observers
        .par_iter()
        .map(|&origin| {
            let vision = VisionArea::disc(origin, radius, params.vision_segments);
            compute_visibility(origin, &vision, topology, params)
        })
        .collect()
}

// -- Tests ---------------------------------------------------------
