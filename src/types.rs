//! Data types shared by the vision engine and its JSON interchange format.
//!
//! Everything that crosses the crate boundary derives Serialize +
//! Deserialize so requests and results can round-trip through JSON.

use serde::{Deserialize, Serialize};

// -- Geometry ------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Bit-exact key, usable in hash sets where `f64` is not `Eq`.
    pub(crate) fn key(&self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box. An empty box has `min > max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    pub const fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// The whole plane.
    pub const fn infinite() -> Self {
        Self {
            min_x: f64::NEG_INFINITY,
            min_y: f64::NEG_INFINITY,
            max_x: f64::INFINITY,
            max_y: f64::INFINITY,
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2D>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.expand_to_include(p);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Box area; infinite for the whole-plane box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn expand_to_include(&mut self, p: &Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn expand_to_include_bounds(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn expand_by(&mut self, margin: f64) {
        if self.is_empty() {
            return;
        }
        self.min_x -= margin;
        self.min_y -= margin;
        self.max_x += margin;
        self.max_y += margin;
    }

    /// Inclusive of the box edges.
    pub fn contains_point(&self, p: &Point2D) -> bool {
        self.min_x <= p.x && p.x <= self.max_x && self.min_y <= p.y && p.y <= self.max_y
    }

    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        !other.is_empty()
            && self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Corners in counterclockwise order, starting at (min_x, min_y).
    pub fn corners(&self) -> [Point2D; 4] {
        [
            Point2D::new(self.min_x, self.min_y),
            Point2D::new(self.max_x, self.min_y),
            Point2D::new(self.max_x, self.max_y),
            Point2D::new(self.min_x, self.max_y),
        ]
    }
}

// -- Topology ------------------------------------------------------

/// Obstruction semantics of one topology layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    /// Blocks sight completely, even from inside.
    Wall,
    /// Insiders see out into adjacent open pockets; outsiders see onto it but not past it.
    Hill,
    /// Insiders cannot see out; outsiders are unobstructed.
    Pit,
    /// Blocks outsiders, transparent to insiders.
    Cover,
}

impl TopologyKind {
    /// All kinds, in the order a query applies them.
    pub const ALL: [TopologyKind; 4] = [
        TopologyKind::Wall,
        TopologyKind::Hill,
        TopologyKind::Pit,
        TopologyKind::Cover,
    ];
}

/// Which side of a boundary edge must face the observer for the edge to block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    SolidSideFacesOrigin,
    OpenSideFacesOrigin,
}

/// One command of a general path, as produced by a path iterator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Close,
}

// -- Engine I/O ----------------------------------------------------

fn default_envelope_margin() -> f64 {
    1.0
}

fn default_vision_segments() -> u32 {
    60
}

/// Tunables for a visibility query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionParams {
    /// How far the synthetic bounding chain sits outside all geometry.
    #[serde(default = "default_envelope_margin")]
    pub envelope_margin: f64,
    /// Vertex count of the polygon approximating a circular vision range.
    #[serde(default = "default_vision_segments")]
    pub vision_segments: u32,
}

impl Default for VisionParams {
    fn default() -> Self {
        Self {
            envelope_margin: default_envelope_margin(),
            vision_segments: default_vision_segments(),
        }
    }
}

/// Raw contours for each topology kind. Each contour is one closed ring.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TopologyInput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wall: Vec<Vec<Point2D>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hill: Vec<Vec<Point2D>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pit: Vec<Vec<Point2D>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cover: Vec<Vec<Point2D>>,
}

impl TopologyInput {
    pub fn contours(&self, kind: TopologyKind) -> &[Vec<Point2D>] {
        match kind {
            TopologyKind::Wall => &self.wall,
            TopologyKind::Hill => &self.hill,
            TopologyKind::Pit => &self.pit,
            TopologyKind::Cover => &self.cover,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityRequest {
    pub origin: Point2D,
    pub vision_radius: f64,
    #[serde(default)]
    pub topology: TopologyInput,
    #[serde(default)]
    pub params: VisionParams,
}

// -- Tests ---------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trip() {
        let json = r#"{
            "origin": {"x": 50.0, "y": 5.0},
            "vision_radius": 200.0,
            "topology": {
                "wall": [[
                    {"x": 45.0, "y": 45.0},
                    {"x": 45.0, "y": 55.0},
                    {"x": 55.0, "y": 55.0},
                    {"x": 55.0, "y": 45.0}
                ]]
            }
        }"#;

        let req: VisibilityRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(req.origin, Point2D::new(50.0, 5.0));
        assert_eq!(req.topology.wall.len(), 1);
        assert!(req.topology.hill.is_empty());
        assert_eq!(req.params.vision_segments, 60);
        assert!((req.params.envelope_margin - 1.0).abs() < 1e-12);

        let out = serde_json::to_string(&req).expect("serialize");
        assert!(!out.contains("\"hill\""));
        let _: VisibilityRequest = serde_json::from_str(&out).expect("re-deserialize");
    }

    #[test]
    fn params_partial_defaults() {
        let params: VisionParams =
            serde_json::from_str(r#"{"vision_segments": 12}"#).expect("deserialize");
        assert_eq!(params.vision_segments, 12);
        assert!((params.envelope_margin - 1.0).abs() < 1e-12);
    }

    #[test]
    fn path_segment_tagging() {
        let json = r#"[{"op": "move_to", "x": 1.0, "y": 2.0}, {"op": "close"}]"#;
        let path: Vec<PathSegment> = serde_json::from_str(json).expect("deserialize");
        assert_eq!(path[0], PathSegment::MoveTo { x: 1.0, y: 2.0 });
        assert_eq!(path[1], PathSegment::Close);
    }

    #[test]
    fn kind_names() {
        let kind: TopologyKind = serde_json::from_str("\"cover\"").expect("deserialize");
        assert_eq!(kind, TopologyKind::Cover);
    }

    #[test]
    fn bounds_expand_and_contain() {
        let pts = [Point2D::new(0.0, 0.0), Point2D::new(10.0, 4.0)];
        let mut b = Bounds::from_points(&pts);
        assert!((b.area() - 40.0).abs() < 1e-12);
        assert!(b.contains_point(&Point2D::new(10.0, 4.0)));
        assert!(!b.contains_point(&Point2D::new(10.5, 4.0)));

        b.expand_by(1.0);
        assert!((b.width() - 12.0).abs() < 1e-12);
        let inner = Bounds::from_points(&pts);
        assert!(b.contains_bounds(&inner));
        assert!(!inner.contains_bounds(&b));
    }

    #[test]
    fn empty_and_infinite_bounds() {
        let empty = Bounds::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.area(), 0.0);
        assert!(!Bounds::infinite().contains_bounds(&empty));
        assert!(Bounds::infinite().area().is_infinite());
        assert!(Bounds::infinite().contains_point(&Point2D::new(1e300, -1e300)));
    }
}
