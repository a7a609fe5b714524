use serde::{Deserialize, Serialize};

/// Default distance at or below which two encodings count as the same face.
///
/// Intrinsic to the embedding model: L2-normalized ArcFace embeddings of the
/// same identity sit well below 1.0 apart in Euclidean distance, while
/// different identities land above it.
pub const DEFAULT_MATCH_DISTANCE: f32 = 1.0;

/// Bounding box for a detected face, with optional facial landmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
    /// Five-point facial landmarks: [left_eye, right_eye, nose, left_mouth, right_mouth].
    pub landmarks: Option<[(f32, f32); 5]>,
}

impl BoundingBox {
    /// Scale the box (and its landmarks) by a uniform factor.
    ///
    /// Used to map a detection from a downscaled frame back to the full
    /// resolution frame it came from.
    pub fn scaled(&self, factor: f32) -> BoundingBox {
        BoundingBox {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
            confidence: self.confidence,
            landmarks: self
                .landmarks
                .map(|lms| lms.map(|(x, y)| (x * factor, y * factor))),
        }
    }
}

/// Face encoding vector (512-dimensional L2-normalized ArcFace embedding).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encoding {
    pub values: Vec<f32>,
    /// Model version that produced this encoding (e.g., "w600k_r50").
    pub model_version: Option<String>,
}

impl Encoding {
    /// Euclidean distance to another encoding. Always non-negative.
    pub fn distance(&self, other: &Encoding) -> f32 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    /// Match decision using the model's default threshold.
    pub fn matches(&self, other: &Encoding) -> bool {
        self.matches_within(other, DEFAULT_MATCH_DISTANCE)
    }

    /// Match decision: the distance must not exceed `threshold`.
    pub fn matches_within(&self, other: &Encoding, threshold: f32) -> bool {
        self.distance(other) <= threshold
    }
}

/// A labeled reference face, loaded from the gallery at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub label: String,
    pub encoding: Encoding,
    /// Image file the encoding came from (diagnostics only).
    pub source: String,
}

/// Result of matching a live encoding against the reference set.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub matched: bool,
    /// Euclidean distance to the nearest reference.
    pub distance: f32,
    /// Label of the matched reference (None when unmatched).
    pub label: Option<String>,
    /// Display confidence derived from the distance; 0.0 when unmatched.
    pub confidence: f32,
}

/// Display confidence for a matched distance: round((1 - d) * 100, 2).
///
/// Deliberately unclamped — a match near the threshold can report a value
/// outside [0, 100], and callers display exactly what they get.
pub fn confidence_percent(distance: f32) -> f32 {
    ((1.0 - distance) * 100.0 * 100.0).round() / 100.0
}

/// Strategy for identifying a live encoding against the loaded references.
pub trait Matcher {
    fn identify(&self, probe: &Encoding, references: &[Reference], threshold: f32) -> MatchResult;
}

/// Nearest-neighbor matcher over Euclidean distance.
///
/// Traverses the whole reference slice; ties on the minimum distance resolve
/// to the earliest entry (strict `<` comparison, stable argmin).
pub struct NearestMatcher;

impl Matcher for NearestMatcher {
    fn identify(&self, probe: &Encoding, references: &[Reference], threshold: f32) -> MatchResult {
        let mut best_dist = f32::INFINITY;
        let mut best_idx: Option<usize> = None;

        for (i, reference) in references.iter().enumerate() {
            let dist = probe.distance(&reference.encoding);
            if dist < best_dist {
                best_dist = dist;
                best_idx = Some(i);
            }
        }

        match best_idx {
            // The accept/reject decision belongs to the encoding model's own
            // rule, not to an independent comparison here.
            Some(idx) if probe.matches_within(&references[idx].encoding, threshold) => MatchResult {
                matched: true,
                distance: best_dist,
                label: Some(references[idx].label.clone()),
                confidence: confidence_percent(best_dist),
            },
            _ => MatchResult {
                matched: false,
                distance: if best_dist.is_finite() { best_dist } else { 0.0 },
                label: None,
                confidence: 0.0,
            },
        }
    }
}
