//! Containment trees: a multi-contour region decomposed into
//! alternating open and solid containers nested by containment.
//!
//! Nodes live in an arena addressed by [`NodeId`]. Children are listed
//! top-down by their parent; the parent link is a plain index.

use tracing::debug;

use crate::error::VisionError;
use crate::ring::Ring;
use crate::types::{PathSegment, Point2D};

pub type NodeId = usize;

/// Whether a container is clear space or an obstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Open,
    Solid,
}

impl NodeKind {
    pub fn opposite(self) -> Self {
        match self {
            NodeKind::Open => NodeKind::Solid,
            NodeKind::Solid => NodeKind::Open,
        }
    }
}

/// One container. Children are always of the opposite kind.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    ring: Ring,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Immutable containment hierarchy for one topology layer.
#[derive(Debug, Clone)]
pub struct ContainmentTree {
    nodes: Vec<Node>,
    /// Bounded open nodes with no containing solid, checked before the root.
    detached: Vec<NodeId>,
}

impl Default for ContainmentTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl ContainmentTree {
    /// The implicit open node covering the whole plane.
    pub const ROOT: NodeId = 0;

    /// A tree with nothing but unbounded open space.
    pub fn empty() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Open,
                ring: Ring::unbounded(),
                parent: None,
                children: Vec::new(),
            }],
            detached: Vec::new(),
        }
    }

    /// Build from closed contours. Degenerate contours are skipped.
    pub fn from_contours<I, C>(contours: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = Point2D>,
    {
        let mut open_rings = Vec::new();
        let mut solid_rings = Vec::new();
        let mut skipped = 0usize;
        for contour in contours {
            let ring = Ring::new(contour);
            if ring.is_degenerate() {
                skipped += 1;
            } else if ring.is_open() {
                open_rings.push(ring);
            } else {
                solid_rings.push(ring);
            }
        }

        let mut tree = Self::empty();
        let open_ids: Vec<NodeId> = open_rings
            .into_iter()
            .map(|ring| tree.push(NodeKind::Open, ring))
            .collect();
        let solid_ids: Vec<NodeId> = solid_rings
            .into_iter()
            .map(|ring| tree.push(NodeKind::Solid, ring))
            .collect();

        // Each open ring goes into the smallest solid whose box holds it.
        for &open in &open_ids {
            match tree.smallest_container(open, &solid_ids) {
                Some(solid) => tree.attach(solid, open),
                None => tree.detached.push(open),
            }
        }
        // Each solid ring goes into the smallest open ring holding it, or the root.
        for &solid in &solid_ids {
            let parent = tree
                .smallest_container(solid, &open_ids)
                .unwrap_or(Self::ROOT);
            tree.attach(parent, solid);
        }

        debug!(
            open = open_ids.len(),
            solid = solid_ids.len(),
            detached = tree.detached.len(),
            skipped,
            "built containment tree"
        );
        tree
    }

    /// Build from a path, one contour per move-to / close run.
    pub fn from_path(path: &[PathSegment]) -> Result<Self, VisionError> {
        Ok(Self::from_contours(split_path(path)?))
    }

    fn push(&mut self, kind: NodeKind, ring: Ring) -> NodeId {
        self.nodes.push(Node {
            kind,
            ring,
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Candidate with the smallest bounding box that holds `id`'s box.
    /// Ties keep the earliest candidate.
    fn smallest_container(&self, id: NodeId, candidates: &[NodeId]) -> Option<NodeId> {
        let bounds = self.nodes[id].ring.bounds();
        let mut best: Option<(NodeId, f64)> = None;
        for &candidate in candidates {
            let ring = &self.nodes[candidate].ring;
            if !ring.bounds().contains_bounds(bounds) {
                continue;
            }
            let area = ring.bounds_area();
            if best.map_or(true, |(_, best_area)| area < best_area) {
                best = Some((candidate, area));
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    /// Number of containers, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Deepest container holding `point`.
    pub fn locate(&self, point: &Point2D) -> Location<'_> {
        let start = self
            .detached
            .iter()
            .copied()
            .find(|&id| self.node_contains(id, point))
            .unwrap_or(Self::ROOT);
        Location {
            tree: self,
            container: self.descend(start, point),
        }
    }

    fn node_contains(&self, id: NodeId, point: &Point2D) -> bool {
        let ring = &self.nodes[id].ring;
        ring.bounds().contains_point(point) && ring.contains(point)
    }

    fn descend(&self, start: NodeId, point: &Point2D) -> NodeId {
        let mut current = start;
        'levels: loop {
            for &child in &self.nodes[current].children {
                if self.node_contains(child, point) {
                    current = child;
                    continue 'levels;
                }
            }
            return current;
        }
    }
}

/// Result of a point-location query.
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    tree: &'a ContainmentTree,
    container: NodeId,
}

impl<'a> Location<'a> {
    pub fn tree(&self) -> &'a ContainmentTree {
        self.tree
    }

    /// The deepest container holding the point.
    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn kind(&self) -> NodeKind {
        self.tree.node(self.container).kind()
    }

    /// The solid holding the point, `None` in open space.
    pub fn containing_solid(&self) -> Option<NodeId> {
        (self.kind() == NodeKind::Solid).then_some(self.container)
    }

    /// The container itself when open, else the open node holding the solid.
    pub fn nearest_open(&self) -> NodeId {
        match self.kind() {
            NodeKind::Open => self.container,
            NodeKind::Solid => self
                .tree
                .node(self.container)
                .parent()
                .unwrap_or(ContainmentTree::ROOT),
        }
    }

    /// The solid whose pocket [`Self::nearest_open`] is, if any.
    pub fn enclosing_solid(&self) -> Option<NodeId> {
        self.tree.node(self.nearest_open()).parent()
    }
}

/// Split a move-to / line-to / close stream into contours.
///
/// A move-to while a contour is still open implicitly closes it.
pub fn split_path(path: &[PathSegment]) -> Result<Vec<Vec<Point2D>>, VisionError> {
    let mut contours = Vec::new();
    let mut current: Option<Vec<Point2D>> = None;
    for (index, segment) in path.iter().enumerate() {
        match *segment {
            PathSegment::MoveTo { x, y } => {
                if let Some(contour) = current.take() {
                    contours.push(contour);
                }
                current = Some(vec![Point2D::new(x, y)]);
            }
            PathSegment::LineTo { x, y } => match current.as_mut() {
                Some(contour) => contour.push(Point2D::new(x, y)),
                None => {
                    return Err(VisionError::MalformedPath {
                        index,
                        reason: "line_to before move_to",
                    })
                }
            },
            PathSegment::Close => {
                if let Some(contour) = current.take() {
                    contours.push(contour);
                }
            }
        }
    }
    if let Some(contour) = current {
        contours.push(contour);
    }
    Ok(contours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    fn solid(x0: f64, y0: f64, size: f64) -> Vec<Point2D> {
        vec![p(x0, y0), p(x0, y0 + size), p(x0 + size, y0 + size), p(x0 + size, y0)]
    }

    fn open(x0: f64, y0: f64, size: f64) -> Vec<Point2D> {
        vec![p(x0, y0), p(x0 + size, y0), p(x0 + size, y0 + size), p(x0, y0 + size)]
    }

    /// Solid A [0,100] holding pocket H [10,90] holding solid B [40,60],
    /// plus a separate solid C [200,210].
    fn nested() -> ContainmentTree {
        ContainmentTree::from_contours(vec![
            solid(40.0, 40.0, 20.0),
            open(10.0, 10.0, 80.0),
            solid(200.0, 200.0, 10.0),
            solid(0.0, 0.0, 100.0),
        ])
    }

    #[test]
    fn empty_tree_is_open_everywhere() {
        let tree = ContainmentTree::empty();
        assert!(tree.is_empty());
        let loc = tree.locate(&p(3.0, 4.0));
        assert_eq!(loc.container(), ContainmentTree::ROOT);
        assert_eq!(loc.kind(), NodeKind::Open);
        assert!(loc.containing_solid().is_none());
        assert!(loc.enclosing_solid().is_none());
    }

    #[test]
    fn hierarchy_alternates_kinds() {
        let tree = nested();
        assert_eq!(tree.len(), 5);
        let root = tree.root();
        assert_eq!(root.children().len(), 2);
        for &child in root.children() {
            assert_eq!(tree.node(child).kind(), NodeKind::Solid);
            for &grandchild in tree.node(child).children() {
                let node = tree.node(grandchild);
                assert_eq!(node.kind(), tree.node(child).kind().opposite());
                assert_eq!(node.parent(), Some(child));
                for &leaf in node.children() {
                    assert_eq!(tree.node(leaf).kind(), NodeKind::Solid);
                }
            }
        }
    }

    #[test]
    fn locate_each_level() {
        let tree = nested();

        // Open space outside everything.
        let loc = tree.locate(&p(150.0, 150.0));
        assert_eq!(loc.container(), ContainmentTree::ROOT);
        assert!(loc.containing_solid().is_none());

        // Inside A, outside the pocket.
        let loc = tree.locate(&p(5.0, 50.0));
        let a = loc.containing_solid().expect("inside A");
        assert_eq!(tree.node(a).ring().bounds().max_x, 100.0);
        assert_eq!(loc.nearest_open(), ContainmentTree::ROOT);

        // In the pocket.
        let loc = tree.locate(&p(20.0, 50.0));
        assert_eq!(loc.kind(), NodeKind::Open);
        assert_eq!(loc.enclosing_solid(), Some(a));

        // Inside B, nested in the pocket.
        let loc = tree.locate(&p(50.0, 50.0));
        let b = loc.containing_solid().expect("inside B");
        assert_eq!(tree.node(b).ring().bounds().min_x, 40.0);
        let pocket = loc.nearest_open();
        assert_eq!(tree.node(pocket).kind(), NodeKind::Open);
        assert_eq!(loc.enclosing_solid(), Some(a));
    }

    #[test]
    fn hole_boundary_resolves_to_hole() {
        let tree = nested();
        let loc = tree.locate(&p(10.0, 50.0));
        assert_eq!(loc.kind(), NodeKind::Open);
        assert_ne!(loc.container(), ContainmentTree::ROOT);
    }

    #[test]
    fn solid_boundary_resolves_to_solid() {
        let tree = nested();
        let loc = tree.locate(&p(0.0, 50.0));
        assert_eq!(loc.kind(), NodeKind::Solid);
    }

    #[test]
    fn orphan_open_ring_is_still_located() {
        let tree = ContainmentTree::from_contours(vec![open(0.0, 0.0, 10.0), solid(4.0, 4.0, 2.0)]);
        let loc = tree.locate(&p(1.0, 1.0));
        assert_ne!(loc.container(), ContainmentTree::ROOT);
        assert_eq!(loc.kind(), NodeKind::Open);
        let loc = tree.locate(&p(5.0, 5.0));
        assert_eq!(loc.kind(), NodeKind::Solid);
        assert!(tree.locate(&p(50.0, 50.0)).containing_solid().is_none());
    }

    #[test]
    fn degenerate_contours_skipped() {
        let tree = ContainmentTree::from_contours(vec![vec![p(0.0, 0.0), p(1.0, 1.0)]]);
        assert!(tree.is_empty());
    }

    #[test]
    fn path_splits_into_contours() {
        let path = [
            PathSegment::MoveTo { x: 0.0, y: 0.0 },
            PathSegment::LineTo { x: 0.0, y: 10.0 },
            PathSegment::LineTo { x: 10.0, y: 10.0 },
            PathSegment::LineTo { x: 10.0, y: 0.0 },
            PathSegment::Close,
            PathSegment::MoveTo { x: 2.0, y: 2.0 },
            PathSegment::LineTo { x: 8.0, y: 2.0 },
            PathSegment::LineTo { x: 8.0, y: 8.0 },
            PathSegment::LineTo { x: 2.0, y: 8.0 },
        ];
        let contours = split_path(&path).expect("well formed");
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[1].len(), 4);

        let tree = ContainmentTree::from_path(&path).expect("well formed");
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.locate(&p(5.0, 5.0)).kind(), NodeKind::Open);
        assert_eq!(tree.locate(&p(1.0, 5.0)).kind(), NodeKind::Solid);
    }

    #[test]
    fn line_before_move_is_rejected() {
        let path = [PathSegment::LineTo { x: 1.0, y: 1.0 }];
        match split_path(&path) {
            Err(VisionError::MalformedPath { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected MalformedPath, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn located_solid_contains_the_point(
            x0 in -100i32..100,
            y0 in -100i32..100,
            w in 2i32..50,
            h in 2i32..50,
            fx in 0.01f64..0.99,
            fy in 0.01f64..0.99,
        ) {
            let (x0, y0, w, h) = (x0 as f64, y0 as f64, w as f64, h as f64);
            let ring = vec![p(x0, y0), p(x0, y0 + h), p(x0 + w, y0 + h), p(x0 + w, y0)];
            let tree = ContainmentTree::from_contours(vec![ring]);

            let inside = p(x0 + fx * w, y0 + fy * h);
            let loc = tree.locate(&inside);
            prop_assert!(loc.containing_solid().is_some());
            prop_assert!(tree.node(loc.container()).ring().contains(&inside));

            let outside = p(x0 + w + 1.0 + fx, y0 - 1.0 - fy);
            prop_assert!(tree.locate(&outside).containing_solid().is_none());
        }
    }
}
