//! Face engine — composes the SCRFD detector and ArcFace recognizer into
//! the image-level operations the rest of the system consumes.

use crate::detector::{DetectorError, DetectorMode, FaceDetector};
use crate::recognizer::{FaceRecognizer, RecognizerError};
use crate::types::{BoundingBox, Encoding};
use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),
    #[error("recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),
}

/// Whole-image encoding seam.
///
/// The gallery loader only needs "image in, face encodings out"; keeping
/// that behind a trait lets tests drive the loader without model files.
pub trait ImageEncoder {
    /// All face encodings found in `image`, best detection first.
    fn encodings(&mut self, image: &RgbImage) -> Result<Vec<Encoding>, EngineError>;
}

/// Detector + recognizer pair operating on interleaved RGB buffers.
pub struct FaceEngine {
    detector: FaceDetector,
    recognizer: FaceRecognizer,
}

impl FaceEngine {
    /// Load both ONNX models. Fails fast if either file is missing.
    pub fn load(scrfd_path: &str, arcface_path: &str) -> Result<Self, EngineError> {
        let detector = FaceDetector::load(scrfd_path)?;
        let recognizer = FaceRecognizer::load(arcface_path)?;
        Ok(Self {
            detector,
            recognizer,
        })
    }

    /// Detect faces in an RGB frame, sorted by detection confidence.
    pub fn detect(
        &mut self,
        rgb: &[u8],
        width: u32,
        height: u32,
        mode: DetectorMode,
    ) -> Result<Vec<BoundingBox>, EngineError> {
        Ok(self.detector.detect(rgb, width, height, mode)?)
    }

    /// Extract one encoding per detected face, paired positionally with
    /// `faces`.
    pub fn encode_faces(
        &mut self,
        rgb: &[u8],
        width: u32,
        height: u32,
        faces: &[BoundingBox],
    ) -> Result<Vec<Encoding>, EngineError> {
        let mut encodings = Vec::with_capacity(faces.len());
        for face in faces {
            encodings.push(self.recognizer.encode(rgb, width, height, face)?);
        }
        Ok(encodings)
    }
}

impl ImageEncoder for FaceEngine {
    fn encodings(&mut self, image: &RgbImage) -> Result<Vec<Encoding>, EngineError> {
        let (width, height) = image.dimensions();
        // Gallery images pay for the accurate pass once, at startup.
        let faces = self.detect(image.as_raw(), width, height, DetectorMode::Accurate)?;
        self.encode_faces(image.as_raw(), width, height, &faces)
    }
}
