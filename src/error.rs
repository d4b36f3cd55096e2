//! Errors raised at the crate's input boundaries.
//!
//! Geometry itself never fails: malformed topology degrades to an
//! unobstructed result instead.

use std::fmt;

#[derive(Debug)]
pub enum VisionError {
    /// The request JSON could not be parsed.
    InvalidRequest(serde_json::Error),
    /// The result could not be written as JSON.
    Serialize(serde_json::Error),
    /// A path segment stream that draws without a current contour.
    MalformedPath { index: usize, reason: &'static str },
    /// Request values outside their valid range.
    InvalidParams(String),
}

impl fmt::Display for VisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisionError::InvalidRequest(e) => write!(f, "invalid visibility request JSON: {e}"),
            VisionError::Serialize(e) => write!(f, "failed to serialize visibility result: {e}"),
            VisionError::MalformedPath { index, reason } => {
                write!(f, "malformed path at segment {index}: {reason}")
            }
            VisionError::InvalidParams(msg) => write!(f, "invalid parameters: {msg}"),
        }
    }
}

impl std::error::Error for VisionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VisionError::InvalidRequest(e) | VisionError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = VisionError::MalformedPath {
            index: 3,
            reason: "line_to before move_to",
        };
        assert_eq!(err.to_string(), "malformed path at segment 3: line_to before move_to");

        let err = VisionError::InvalidParams("vision_radius must be positive".into());
        assert!(err.to_string().contains("vision_radius"));
    }

    #[test]
    fn json_errors_keep_their_source() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = VisionError::InvalidRequest(parse);
        assert!(std::error::Error::source(&err).is_some());
    }
}
