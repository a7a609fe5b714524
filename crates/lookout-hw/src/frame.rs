//! Frame type and pixel ops — YUYV conversion and downscaling.

/// A captured RGB camera frame.
#[derive(Clone)]
pub struct Frame {
    /// Interleaved RGB pixel data (width * height * 3 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: std::time::Instant,
    pub sequence: u32,
}

impl Frame {
    /// Bilinearly downscale by `factor` (0 < factor <= 1).
    ///
    /// Detection runs on the downscaled copy; the original frame stays
    /// untouched for rendering.
    pub fn downscale(&self, factor: f32) -> Frame {
        let src_w = self.width as usize;
        let src_h = self.height as usize;
        let new_w = ((self.width as f32 * factor).round() as usize).max(1);
        let new_h = ((self.height as f32 * factor).round() as usize).max(1);

        let inv_x = src_w as f32 / new_w as f32;
        let inv_y = src_h as f32 / new_h as f32;
        let mut data = vec![0u8; new_w * new_h * 3];

        for y in 0..new_h {
            let src_y = (y as f32 + 0.5) * inv_y - 0.5;
            let y0 = (src_y.floor() as i32).clamp(0, src_h as i32 - 1) as usize;
            let y1 = (y0 + 1).min(src_h - 1);
            let fy = (src_y - src_y.floor()).clamp(0.0, 1.0);

            for x in 0..new_w {
                let src_x = (x as f32 + 0.5) * inv_x - 0.5;
                let x0 = (src_x.floor() as i32).clamp(0, src_w as i32 - 1) as usize;
                let x1 = (x0 + 1).min(src_w - 1);
                let fx = (src_x - src_x.floor()).clamp(0.0, 1.0);

                for c in 0..3 {
                    let tl = self.data[(y0 * src_w + x0) * 3 + c] as f32;
                    let tr = self.data[(y0 * src_w + x1) * 3 + c] as f32;
                    let bl = self.data[(y1 * src_w + x0) * 3 + c] as f32;
                    let br = self.data[(y1 * src_w + x1) * 3 + c] as f32;

                    let val = tl * (1.0 - fx) * (1.0 - fy)
                        + tr * fx * (1.0 - fy)
                        + bl * (1.0 - fx) * fy
                        + br * fx * fy;

                    data[(y * new_w + x) * 3 + c] = val.round().clamp(0.0, 255.0) as u8;
                }
            }
        }

        Frame {
            data,
            width: new_w as u32,
            height: new_h as u32,
            timestamp: self.timestamp,
            sequence: self.sequence,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid YUYV length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Convert packed YUYV (4:2:2) to interleaved RGB.
///
/// YUYV packs two pixels per 4 bytes: [Y0, U, Y1, V], with the chroma pair
/// shared by both pixels. Conversion follows the BT.601 integer formulas.
pub fn yuyv_to_rgb(yuyv: &[u8], width: u32, height: u32) -> Result<Vec<u8>, FrameError> {
    let pixels = (width * height) as usize;
    let expected = pixels * 2;
    if yuyv.len() < expected {
        return Err(FrameError::InvalidLength {
            expected,
            actual: yuyv.len(),
        });
    }

    let mut rgb = Vec::with_capacity(pixels * 3);
    for quad in yuyv[..expected].chunks_exact(4) {
        let (y0, u, y1, v) = (quad[0], quad[1], quad[2], quad[3]);
        rgb.extend_from_slice(&yuv_to_rgb(y0, u, v));
        rgb.extend_from_slice(&yuv_to_rgb(y1, u, v));
    }

    Ok(rgb)
}

/// BT.601 limited-range YUV → RGB for a single pixel.
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;

    let r = (298 * c + 409 * e + 128) >> 8;
    let g = (298 * c - 100 * d - 208 * e + 128) >> 8;
    let b = (298 * c + 516 * d + 128) >> 8;

    [
        r.clamp(0, 255) as u8,
        g.clamp(0, 255) as u8,
        b.clamp(0, 255) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(data: Vec<u8>, width: u32, height: u32) -> Frame {
        Frame {
            data,
            width,
            height,
            timestamp: std::time::Instant::now(),
            sequence: 0,
        }
    }

    #[test]
    fn test_yuv_black_and_white() {
        assert_eq!(yuv_to_rgb(16, 128, 128), [0, 0, 0]);
        assert_eq!(yuv_to_rgb(235, 128, 128), [255, 255, 255]);
    }

    #[test]
    fn test_yuv_primary_red() {
        // BT.601 red: Y=81, U=90, V=240
        let [r, g, b] = yuv_to_rgb(81, 90, 240);
        assert!(r >= 250, "r = {r}");
        assert!(g <= 5, "g = {g}");
        assert_eq!(b, 0);
    }

    #[test]
    fn test_yuyv_to_rgb_pair() {
        // 2x1 image: [Y0=16, U=128, Y1=235, V=128] → black pixel, white pixel
        let yuyv = vec![16, 128, 235, 128];
        let rgb = yuyv_to_rgb(&yuyv, 2, 1).unwrap();
        assert_eq!(rgb, vec![0, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn test_yuyv_to_rgb_length() {
        let yuyv = vec![128u8; 4 * 2 * 2]; // 4x2 image
        let rgb = yuyv_to_rgb(&yuyv, 4, 2).unwrap();
        assert_eq!(rgb.len(), 4 * 2 * 3);
    }

    #[test]
    fn test_yuyv_invalid_length() {
        let yuyv = vec![100, 128]; // too short for 2x1
        assert!(yuyv_to_rgb(&yuyv, 2, 1).is_err());
    }

    #[test]
    fn test_downscale_quarter_dimensions() {
        let f = frame(vec![128u8; 640 * 480 * 3], 640, 480);
        let small = f.downscale(0.25);
        assert_eq!(small.width, 160);
        assert_eq!(small.height, 120);
        assert_eq!(small.data.len(), 160 * 120 * 3);
    }

    #[test]
    fn test_downscale_uniform_stays_uniform() {
        let f = frame(vec![200u8; 64 * 64 * 3], 64, 64);
        let small = f.downscale(0.25);
        assert!(small.data.iter().all(|&p| p == 200));
    }

    #[test]
    fn test_downscale_keeps_metadata() {
        let mut f = frame(vec![0u8; 16 * 16 * 3], 16, 16);
        f.sequence = 42;
        let small = f.downscale(0.5);
        assert_eq!(small.sequence, 42);
    }

    #[test]
    fn test_downscale_never_collapses_to_zero() {
        let f = frame(vec![0u8; 2 * 2 * 3], 2, 2);
        let small = f.downscale(0.25);
        assert_eq!(small.width, 1);
        assert_eq!(small.height, 1);
    }
}
