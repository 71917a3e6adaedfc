// pixie/src/core/mod.rs
pub mod processor;

use image::ImageFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions accepted as source images, compared lowercased.
pub const VALID_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// One concrete resize job: a source file, where its derivative goes, and how wide it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeTask {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub target_width: u32,
    pub quality: Option<u8>,
}

impl ResizeTask {
    pub fn new(input_path: PathBuf, output_path: PathBuf, target_width: u32, quality: Option<u8>) -> Self {
        Self {
            input_path,
            output_path,
            target_width,
            quality,
        }
    }
}

/// Result of processing a single file. Failures never escape past this value.
#[derive(Debug)]
pub enum ResizeOutcome {
    Saved(PathBuf),
    Skipped { path: PathBuf, reason: String },
    Failed { path: PathBuf, error: ImageToolError },
}

impl ResizeOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, ResizeOutcome::Saved(_))
    }

    /// Emits the console line for this outcome.
    pub fn log(&self) {
        match self {
            ResizeOutcome::Saved(path) => log::info!("Saved: {}", path.display()),
            ResizeOutcome::Skipped { path, reason } => {
                log::info!("Skipping {}: {}", path.display(), reason)
            }
            ResizeOutcome::Failed { path, error } => {
                log::error!("Error processing {}: {}", path.display(), error)
            }
        }
    }
}

/// Per-batch tallies, one per profile variant, asset entry or favicon run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub label: String,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<(PathBuf, String)>,
}

impl StageReport {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &ResizeOutcome) {
        match outcome {
            ResizeOutcome::Saved(_) => self.saved += 1,
            ResizeOutcome::Skipped { .. } => self.skipped += 1,
            ResizeOutcome::Failed { path, error } => {
                self.failed += 1;
                self.errors.push((path.clone(), error.to_string()));
            }
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stages: Vec<StageReport>,
    pub skipped_stages: Vec<String>,
}

impl RunSummary {
    pub fn saved(&self) -> usize {
        self.stages.iter().map(|s| s.saved).sum()
    }

    pub fn skipped(&self) -> usize {
        self.stages.iter().map(|s| s.skipped).sum()
    }

    pub fn failed(&self) -> usize {
        self.stages.iter().map(|s| s.failed).sum()
    }
}

/// Preflight check that the codecs the pipeline relies on were compiled in.
pub fn probe_capabilities() -> Result<()> {
    let required = [
        (ImageFormat::Jpeg, "JPEG"),
        (ImageFormat::Png, "PNG"),
    ];

    for (format, name) in required {
        if !format.reading_enabled() || !format.writing_enabled() {
            return Err(ImageToolError::MissingCapability(format!(
                "{} encode/decode support is not available",
                name
            )));
        }
    }

    probe_ico_encoder()?;

    log::debug!("Imaging capabilities available: JPEG, PNG, ICO");
    Ok(())
}

/// Encodes a 1×1 icon entry to confirm the ICO container can be written.
fn probe_ico_encoder() -> Result<()> {
    let pixel = ico::IconImage::from_rgba_data(1, 1, vec![0; 4]);
    ico::IconDirEntry::encode(&pixel)
        .map(|_| ())
        .map_err(|e| {
            ImageToolError::MissingCapability(format!("ICO encode support failed: {}", e))
        })
}

/// Returns true when the path has a `.jpg`/`.jpeg` extension, any case.
pub fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_lowercase().as_str(), "jpg" | "jpeg"))
        .unwrap_or(false)
}

#[derive(Error, Debug)]
pub enum ImageToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Missing imaging capability: {0}")]
    MissingCapability(String),

    #[error("No input directories found and no favicon source found")]
    NoInputs,

    #[error("No images found in any existing input directory")]
    NoImages,
}

pub type Result<T> = std::result::Result<T, ImageToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_are_compiled_in() {
        assert!(probe_capabilities().is_ok());
    }

    #[test]
    fn ico_encoder_round_trips_one_pixel() {
        assert!(probe_ico_encoder().is_ok());
    }

    #[test]
    fn jpeg_detection_ignores_case() {
        assert!(is_jpeg_path(Path::new("out/a.JPG")));
        assert!(is_jpeg_path(Path::new("out/a.jpeg")));
        assert!(!is_jpeg_path(Path::new("out/a.png")));
        assert!(!is_jpeg_path(Path::new("out/jpg")));
    }

    #[test]
    fn report_tallies_outcomes() {
        let mut report = StageReport::new("hero/desktop/standard");
        report.record(&ResizeOutcome::Saved(PathBuf::from("a.jpg")));
        report.record(&ResizeOutcome::Skipped {
            path: PathBuf::from("b.jpg"),
            reason: "width is 0".to_string(),
        });
        report.record(&ResizeOutcome::Failed {
            path: PathBuf::from("c.jpg"),
            error: ImageToolError::ProcessingError("broken".to_string()),
        });

        assert_eq!((report.saved, report.skipped, report.failed), (1, 1, 1));
        assert_eq!(report.errors[0].0, PathBuf::from("c.jpg"));
    }
}
