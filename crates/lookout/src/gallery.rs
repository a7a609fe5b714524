//! Reference gallery — scans labeled folders and encodes one face per image.

use lookout_core::{engine::EngineError, ImageEncoder, Reference};
use std::path::{Path, PathBuf};
use thiserror::Error;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("no usable reference faces under {0} — each person needs a folder of jpg/jpeg/png images")]
    Empty(PathBuf),
    #[error("cannot read faces directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Scan `root` and build a reference for every labeled image with a face.
///
/// Each immediate subdirectory of `root` is one label, except the directory
/// named exactly `reserved` (the log directory) and hidden ones. Images
/// that fail to load or contain no detectable face are skipped with a
/// warning; only an entirely empty result is an error.
pub fn load(
    root: &Path,
    reserved: &str,
    encoder: &mut impl ImageEncoder,
) -> Result<Vec<Reference>, GalleryError> {
    let mut references = Vec::new();

    for (label, dir) in label_dirs(root, reserved)? {
        for path in image_files(&dir)? {
            let image = match image::open(&path) {
                Ok(img) => img.to_rgb8(),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "unreadable image, skipping");
                    continue;
                }
            };

            // Only the first (best) face in each training image counts.
            match encoder.encodings(&image)?.into_iter().next() {
                Some(encoding) => {
                    tracing::info!(label = %label, source = %path.display(), "added reference face");
                    references.push(Reference {
                        label: label.clone(),
                        encoding,
                        source: path.display().to_string(),
                    });
                }
                None => {
                    tracing::warn!(path = %path.display(), "no face found, skipping");
                }
            }
        }
    }

    if references.is_empty() {
        return Err(GalleryError::Empty(root.to_path_buf()));
    }

    let people = {
        let mut labels: Vec<&str> = references.iter().map(|r| r.label.as_str()).collect();
        labels.dedup();
        labels.len()
    };
    tracing::info!(references = references.len(), people, "gallery loaded");

    Ok(references)
}

/// Immediate subdirectories of `root` treated as labels, sorted by name.
fn label_dirs(root: &Path, reserved: &str) -> Result<Vec<(String, PathBuf)>, GalleryError> {
    let entries = std::fs::read_dir(root).map_err(|source| GalleryError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| GalleryError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == reserved || name.starts_with('.') {
            continue;
        }
        dirs.push((name, entry.path()));
    }

    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

/// Image files (jpg/jpeg/png, case-insensitive) directly inside `dir`, sorted.
fn image_files(dir: &Path) -> Result<Vec<PathBuf>, GalleryError> {
    let entries = std::fs::read_dir(dir).map_err(|source| GalleryError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| GalleryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if is_image {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use lookout_core::Encoding;

    /// Scripted encoder: pops one pre-baked answer per call.
    struct StubEncoder {
        answers: Vec<Vec<Encoding>>,
        calls: usize,
    }

    impl StubEncoder {
        fn new(answers: Vec<Vec<Encoding>>) -> Self {
            Self { answers, calls: 0 }
        }
    }

    impl ImageEncoder for StubEncoder {
        fn encodings(&mut self, _image: &RgbImage) -> Result<Vec<Encoding>, EngineError> {
            let answer = self.answers.get(self.calls).cloned().unwrap_or_default();
            self.calls += 1;
            Ok(answer)
        }
    }

    fn encoding() -> Encoding {
        Encoding {
            values: vec![1.0, 0.0],
            model_version: None,
        }
    }

    fn write_png(path: &Path) {
        RgbImage::new(4, 4).save(path).unwrap();
    }

    #[test]
    fn test_label_dirs_excludes_reserved_exactly() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("Alice")).unwrap();
        std::fs::create_dir(root.path().join("logs")).unwrap();
        // Exact-name exclusion: a prefix collision is still a label.
        std::fs::create_dir(root.path().join("logsmith")).unwrap();
        std::fs::create_dir(root.path().join(".hidden")).unwrap();

        let dirs = label_dirs(root.path(), "logs").unwrap();
        let names: Vec<&str> = dirs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Alice", "logsmith"]);
    }

    #[test]
    fn test_image_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("b.PNG"));
        write_png(&dir.path().join("a.jpeg"));
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = image_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.jpeg", "b.PNG"]);
    }

    #[test]
    fn test_load_skips_faceless_image_keeps_other() {
        let root = tempfile::tempdir().unwrap();
        let alice = root.path().join("Alice");
        std::fs::create_dir(&alice).unwrap();
        write_png(&alice.join("01.jpg"));
        write_png(&alice.join("02.jpg"));

        // First image yields no face, second yields one.
        let mut encoder = StubEncoder::new(vec![vec![], vec![encoding()]]);
        let references = load(root.path(), "logs", &mut encoder).unwrap();

        assert_eq!(references.len(), 1);
        assert_eq!(references[0].label, "Alice");
        assert!(references[0].source.ends_with("02.jpg"));
    }

    #[test]
    fn test_load_keeps_first_face_only() {
        let root = tempfile::tempdir().unwrap();
        let bob = root.path().join("Bob");
        std::fs::create_dir(&bob).unwrap();
        write_png(&bob.join("crowd.jpg"));

        let mut encoder = StubEncoder::new(vec![vec![encoding(), encoding(), encoding()]]);
        let references = load(root.path(), "logs", &mut encoder).unwrap();
        assert_eq!(references.len(), 1);
    }

    #[test]
    fn test_load_empty_root_fails() {
        let root = tempfile::tempdir().unwrap();
        let mut encoder = StubEncoder::new(vec![]);
        let err = load(root.path(), "logs", &mut encoder).unwrap_err();
        assert!(matches!(err, GalleryError::Empty(_)));
    }

    #[test]
    fn test_load_all_faceless_fails() {
        let root = tempfile::tempdir().unwrap();
        let alice = root.path().join("Alice");
        std::fs::create_dir(&alice).unwrap();
        write_png(&alice.join("01.jpg"));

        let mut encoder = StubEncoder::new(vec![vec![]]);
        let err = load(root.path(), "logs", &mut encoder).unwrap_err();
        assert!(matches!(err, GalleryError::Empty(_)));
    }
}
