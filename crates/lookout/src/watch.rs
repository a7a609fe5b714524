//! The live watch loop: capture → detect → match → journal → overlay.

use crate::display::{Annotation, Window};
use crate::journal::{Journal, JournalError};
use chrono::Local;
use lookout_core::engine::EngineError;
use lookout_core::{DetectorMode, FaceEngine, Matcher, NearestMatcher, Reference};
use lookout_hw::{Camera, CameraError};
use thiserror::Error;

/// Downsample factor applied to each frame before detection.
const DOWNSCALE: f32 = 0.25;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("camera error: {0}")]
    Camera(#[from] CameraError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),
    #[error("display error: {0}")]
    Display(#[from] opencv::Error),
}

/// Run the watch loop until the quit key is pressed or the camera fails.
///
/// One iteration handles exactly one frame, start to finish; there is no
/// pipelining and no per-iteration error containment — anything unexpected
/// propagates and ends the run.
pub fn run(
    camera: &Camera,
    window: &Window,
    engine: &mut FaceEngine,
    references: &[Reference],
    threshold: f32,
    journal: &mut Journal,
) -> Result<(), WatchError> {
    let matcher = NearestMatcher;
    let upscale = 1.0 / DOWNSCALE;

    let mut stream = camera.stream()?;
    tracing::info!("watching (press q in the preview window to quit)");

    loop {
        let frame = match stream.next_frame() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(error = %err, "camera read failed, stopping");
                break;
            }
        };

        let small = frame.downscale(DOWNSCALE);
        let faces = engine.detect(&small.data, small.width, small.height, DetectorMode::Fast)?;
        let encodings = engine.encode_faces(&small.data, small.width, small.height, &faces)?;

        let mut annotations = Vec::with_capacity(faces.len());
        for (face, encoding) in faces.iter().zip(&encodings) {
            let result = matcher.identify(encoding, references, threshold);

            if let Some(label) = &result.label {
                journal.record(label, result.confidence, Local::now())?;
            }

            let full = face.scaled(upscale);
            annotations.push(Annotation::new(&full, &result));
        }

        window.present(&frame, &annotations)?;

        if window.quit_requested()? {
            tracing::info!("quit requested");
            break;
        }
    }

    Ok(())
}
