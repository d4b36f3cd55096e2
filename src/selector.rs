//! Per-kind selection of the boundary chains that block an observer.
//!
//! Each topology kind locates the observer in its containment tree and
//! then blocks vision "beyond" a handful of containers. Blocking beyond
//! a container contributes the container's own ring plus the rings of
//! its direct children, keeping only the edges whose relevant side
//! faces the observer.

use tracing::trace;

use crate::tree::{ContainmentTree, NodeId, NodeKind};
use crate::types::{Facing, Point2D, TopologyKind};
use crate::vision::VisionArea;

/// Gathers blocking chains for one observer across topology kinds.
#[derive(Debug)]
pub struct BlockingAccumulator<'v> {
    origin: Point2D,
    vision: &'v VisionArea,
    segments: Vec<Vec<Point2D>>,
    fully_blocked: bool,
}

impl<'v> BlockingAccumulator<'v> {
    pub fn new(origin: Point2D, vision: &'v VisionArea) -> Self {
        Self {
            origin,
            vision,
            segments: Vec::new(),
            fully_blocked: false,
        }
    }

    pub fn origin(&self) -> &Point2D {
        &self.origin
    }

    /// Add the chains `kind` contributes from `tree`.
    ///
    /// Returns `false` when vision is blocked outright, in which case
    /// nothing is contributed and further kinds need not be applied.
    pub fn add(&mut self, kind: TopologyKind, tree: &ContainmentTree) -> bool {
        let before = self.segments.len();
        let visible = match kind {
            TopologyKind::Wall => self.add_wall(tree),
            TopologyKind::Hill => self.add_hill(tree),
            TopologyKind::Pit => self.add_pit(tree),
            TopologyKind::Cover => self.add_cover(tree),
        };
        if !visible {
            self.fully_blocked = true;
        }
        trace!(
            ?kind,
            visible,
            chains = self.segments.len() - before,
            "applied topology"
        );
        visible
    }

    /// Whether any kind added so far blocked vision outright.
    pub fn is_fully_blocked(&self) -> bool {
        self.fully_blocked
    }

    pub fn segments(&self) -> &[Vec<Point2D>] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Vec<Point2D>> {
        self.segments
    }

    fn add_wall(&mut self, tree: &ContainmentTree) -> bool {
        let location = tree.locate(&self.origin);
        if location.containing_solid().is_some() {
            return false;
        }
        self.block_beyond(tree, location.nearest_open());
        true
    }

    fn add_hill(&mut self, tree: &ContainmentTree) -> bool {
        let location = tree.locate(&self.origin);
        let nearest_open = location.nearest_open();
        let inside = location.containing_solid();

        if let Some(enclosing) = location.enclosing_solid() {
            self.block_beyond(tree, enclosing);
        }
        for &solid in tree.node(nearest_open).children() {
            if Some(solid) != inside {
                self.block_beyond(tree, solid);
            }
        }
        if let Some(solid) = inside {
            for &pocket in tree.node(solid).children() {
                for &nested in tree.node(pocket).children() {
                    self.block_beyond(tree, nested);
                }
            }
        }
        true
    }

    fn add_pit(&mut self, tree: &ContainmentTree) -> bool {
        if let Some(solid) = tree.locate(&self.origin).containing_solid() {
            self.block_beyond(tree, solid);
        }
        true
    }

    fn add_cover(&mut self, tree: &ContainmentTree) -> bool {
        let location = tree.locate(&self.origin);
        self.block_beyond(tree, location.nearest_open());
        if let Some(solid) = location.containing_solid() {
            for &pocket in tree.node(solid).children() {
                self.block_beyond(tree, pocket);
            }
        }
        true
    }

    fn block_beyond(&mut self, tree: &ContainmentTree, id: NodeId) {
        let node = tree.node(id);
        let facing = match node.kind() {
            NodeKind::Open => Facing::OpenSideFacesOrigin,
            NodeKind::Solid => Facing::SolidSideFacesOrigin,
        };
        let rings = std::iter::once(id).chain(node.children().iter().copied());
        for ring_id in rings {
            let chains = tree
                .node(ring_id)
                .ring()
                .facing_segments(&self.origin, facing, self.vision);
            self.segments.extend(chains);
        }
    }
}

// -- Tests ---------------------------------------------------------
