//! Preview window — renders recognition overlays and polls the quit key.

use lookout_core::{BoundingBox, MatchResult};
use lookout_hw::Frame;
use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::{highgui, imgproc};

const WINDOW_TITLE: &str = "Lookout (press q to quit)";
const QUIT_KEY: char = 'q';

const BOX_THICKNESS: i32 = 2;
const LABEL_FONT_SCALE: f64 = 0.8;
const LABEL_THICKNESS: i32 = 2;

/// One face overlay: a full-resolution box plus its display text.
pub struct Annotation {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub text: String,
    pub matched: bool,
}

impl Annotation {
    /// Build from a full-resolution box and its match result.
    pub fn new(face: &BoundingBox, result: &MatchResult) -> Self {
        let name = result.label.as_deref().unwrap_or("Unknown");
        Self {
            x: face.x.round() as i32,
            y: face.y.round() as i32,
            width: face.width.round() as i32,
            height: face.height.round() as i32,
            text: format!("{name} ({:.2}%)", result.confidence),
            matched: result.matched,
        }
    }

    fn color(&self) -> Scalar {
        // BGR: green for a recognized face, red for an unknown one.
        if self.matched {
            Scalar::new(0.0, 255.0, 0.0, 0.0)
        } else {
            Scalar::new(0.0, 0.0, 255.0, 0.0)
        }
    }
}

/// The single preview window. Destroyed exactly once, on drop.
pub struct Window;

impl Window {
    pub fn open() -> Result<Self, opencv::Error> {
        highgui::named_window(WINDOW_TITLE, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self)
    }

    /// Draw `annotations` onto a BGR copy of `frame` and present it.
    pub fn present(&self, frame: &Frame, annotations: &[Annotation]) -> Result<(), opencv::Error> {
        let mut canvas = frame_to_bgr_mat(frame)?;

        for a in annotations {
            imgproc::rectangle(
                &mut canvas,
                Rect::new(a.x, a.y, a.width, a.height),
                a.color(),
                BOX_THICKNESS,
                imgproc::LINE_8,
                0,
            )?;
            imgproc::put_text(
                &mut canvas,
                &a.text,
                Point::new(a.x, a.y - 10),
                imgproc::FONT_HERSHEY_DUPLEX,
                LABEL_FONT_SCALE,
                Scalar::new(255.0, 255.0, 255.0, 0.0),
                LABEL_THICKNESS,
                imgproc::LINE_8,
                false,
            )?;
        }

        highgui::imshow(WINDOW_TITLE, &canvas)
    }

    /// Poll briefly for a key press; true when the quit key was hit.
    pub fn quit_requested(&self) -> Result<bool, opencv::Error> {
        let key = highgui::wait_key(1)?;
        if key < 0 {
            return Ok(false);
        }
        let pressed = (key & 0xFF) as u8 as char;
        Ok(pressed.eq_ignore_ascii_case(&QUIT_KEY))
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        let _ = highgui::destroy_all_windows();
    }
}

/// RGB frame → owned BGR canvas.
///
/// The channel-order swap runs on every frame: OpenCV renders BGR while the
/// rest of the pipeline is RGB.
fn frame_to_bgr_mat(frame: &Frame) -> Result<Mat, opencv::Error> {
    let flat = Mat::from_slice(&frame.data)?;
    let rgb = flat.reshape(3, frame.height as i32)?;

    let mut bgr = Mat::default();
    imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)?;
    Ok(bgr)
}
