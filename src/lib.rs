//! Line-of-sight engine: visibility polygons over nested topology.
//!
//! Topology comes in four kinds (wall, hill, pit, cover), each a set of
//! closed rings arranged into a containment tree. A query picks the
//! boundary chains that block an observer and sweeps them into the
//! polygon of everything the observer can see.
//!
//! The JSON entry point [`visibility_json`] accepts a request string and
//! returns the serialized [`Visibility`].

pub mod endpoints;
pub mod error;
pub mod geometry;
pub mod noding;
pub mod ring;
pub mod selector;
pub mod solver;
pub mod tree;
pub mod types;
pub mod visibility;
pub mod vision;

pub use error::VisionError;
pub use types::{Bounds, Point2D, TopologyInput, TopologyKind, VisibilityRequest, VisionParams};
pub use visibility::{compute_visibility, compute_visibility_batch, Topology, Visibility};
pub use vision::VisionArea;

/// Answer one visibility request.
///
/// Takes a JSON string matching [`VisibilityRequest`] and returns the
/// JSON form of the resulting [`Visibility`].
pub fn visibility_json(request_json: &str) -> Result<String, VisionError> {
    let request: VisibilityRequest =
        serde_json::from_str(request_json).map_err(VisionError::InvalidRequest)?;
    validate(&request)?;

    let topology = Topology::from_input(&request.topology);
    let vision = VisionArea::disc(
        request.origin,
        request.vision_radius,
        request.params.vision_segments,
    );
    let result = compute_visibility(request.origin, &vision, &topology, &request.params);

    serde_json::to_string(&result).map_err(VisionError::Serialize)
}

fn validate(request: &VisibilityRequest) -> Result<(), VisionError> {
    if !request.origin.is_finite() {
        return Err(VisionError::InvalidParams("origin must be finite".into()));
    }
    if !(request.vision_radius.is_finite() && request.vision_radius > 0.0) {
        return Err(VisionError::InvalidParams(format!(
            "vision_radius must be positive, got {}",
            request.vision_radius
        )));
    }
    if request.params.vision_segments < 3 {
        return Err(VisionError::InvalidParams(format!(
            "vision_segments must be at least 3, got {}",
            request.params.vision_segments
        )));
    }
    if !(request.params.envelope_margin.is_finite() && request.params.envelope_margin > 0.0) {
        return Err(VisionError::InvalidParams(format!(
            "envelope_margin must be positive, got {}",
            request.params.envelope_margin
        )));
    }
    Ok(())
}
