use std::path::PathBuf;

/// Name of the directory under the faces root reserved for log output.
/// A subdirectory with this exact name is never treated as a label.
pub const RESERVED_LOG_DIR: &str = "logs";

/// Watcher configuration, loaded from environment variables.
pub struct Config {
    /// Root directory of labeled face folders (one subfolder per person).
    pub faces_dir: PathBuf,
    /// V4L2 device path (default: /dev/video0).
    pub camera_device: String,
    /// Directory containing ONNX model files.
    pub model_dir: PathBuf,
    /// Maximum encoding distance for a positive match.
    pub match_distance: f32,
    /// Minimum seconds between two sighting-log entries for the same label.
    pub cooldown_secs: i64,
}

impl Config {
    /// Load configuration from `LOOKOUT_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let model_dir = std::env::var("LOOKOUT_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| lookout_core::default_model_dir());

        Self {
            faces_dir: std::env::var("LOOKOUT_FACES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("faces")),
            camera_device: std::env::var("LOOKOUT_CAMERA_DEVICE")
                .unwrap_or_else(|_| "/dev/video0".to_string()),
            model_dir,
            match_distance: env_f32("LOOKOUT_MATCH_DISTANCE", lookout_core::DEFAULT_MATCH_DISTANCE),
            cooldown_secs: env_i64("LOOKOUT_COOLDOWN_SECS", 10),
        }
    }

    /// Path to the SCRFD detection model.
    pub fn scrfd_model_path(&self) -> String {
        self.model_dir
            .join("det_10g.onnx")
            .to_string_lossy()
            .into_owned()
    }

    /// Path to the ArcFace encoding model.
    pub fn arcface_model_path(&self) -> String {
        self.model_dir
            .join("w600k_r50.onnx")
            .to_string_lossy()
            .into_owned()
    }

    /// Directory the sighting logs live in.
    pub fn log_dir(&self) -> PathBuf {
        self.faces_dir.join(RESERVED_LOG_DIR)
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
