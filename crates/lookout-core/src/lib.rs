//! lookout-core — face detection, encoding, and matching.
//!
//! Uses SCRFD for face detection and ArcFace for face encodings, both
//! running via ONNX Runtime for CPU inference; live encodings are matched
//! against the loaded reference set by nearest Euclidean distance.

mod alignment;
pub mod detector;
pub mod engine;
pub mod recognizer;
pub mod types;

pub use detector::DetectorMode;
pub use engine::{FaceEngine, ImageEncoder};
pub use types::{
    BoundingBox, Encoding, MatchResult, Matcher, NearestMatcher, Reference,
    DEFAULT_MATCH_DISTANCE,
};

/// Default directory probed for the ONNX model files.
pub fn default_model_dir() -> std::path::PathBuf {
    std::path::PathBuf::from("/usr/share/lookout/models")
}
