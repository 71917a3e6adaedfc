// pixie/src/core/processor.rs
use super::{ImageToolError, ResizeOutcome, ResizeTask, Result};
use crate::processors::{Compressor, Loader, ResizeMode, Resizer};
use image::DynamicImage;
use std::path::Path;

/// Quality used when a task carries none. Only JPEG output reads it.
pub const DEFAULT_QUALITY: u8 = 85;

/// Runs one resize task end to end: load, orient, scale to width, save.
pub struct ImageProcessor {
    loader: Loader,
    resizer: Resizer,
}

impl ImageProcessor {
    pub fn new() -> Self {
        Self {
            loader: Loader::new(),
            resizer: Resizer::new(),
        }
    }

    /// Never returns an error: every failure is folded into the outcome.
    pub fn process(&self, task: &ResizeTask) -> ResizeOutcome {
        match self.loader.load(&task.input_path) {
            Ok(image) => self.process_image(&image, task),
            Err(error) => ResizeOutcome::Failed {
                path: task.input_path.clone(),
                error,
            },
        }
    }

    /// Resizes an already decoded, already oriented image for `task`.
    pub fn process_image(&self, image: &DynamicImage, task: &ResizeTask) -> ResizeOutcome {
        let target = self.resizer.target_dimensions(
            image.width(),
            image.height(),
            ResizeMode::Width(task.target_width),
        );
        let (width, height) = match target {
            Ok(Some(dimensions)) => dimensions,
            Ok(None) => {
                return ResizeOutcome::Skipped {
                    path: task.input_path.clone(),
                    reason: "width is 0".to_string(),
                }
            }
            Err(error) => {
                return ResizeOutcome::Failed {
                    path: task.input_path.clone(),
                    error,
                }
            }
        };

        match self.resize_and_save(image, width, height, task) {
            Ok(()) => ResizeOutcome::Saved(task.output_path.clone()),
            Err(error) => ResizeOutcome::Failed {
                path: task.input_path.clone(),
                error,
            },
        }
    }

    fn resize_and_save(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        task: &ResizeTask,
    ) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(ImageToolError::InvalidParameter(format!(
                "computed size {}x{} from {}x{} is empty",
                width,
                height,
                image.width(),
                image.height()
            )));
        }

        let resized = self.resizer.resize_exact(image, width, height);
        let compressor = Compressor::new(task.quality.unwrap_or(DEFAULT_QUALITY));
        compressor.save(&resized, &task.output_path)
    }

    /// Convenience wrapper for callers holding plain paths.
    pub fn resize(
        &self,
        input_path: &Path,
        output_path: &Path,
        target_width: u32,
        quality: Option<u8>,
    ) -> ResizeOutcome {
        self.process(&ResizeTask::new(
            input_path.to_path_buf(),
            output_path.to_path_buf(),
            target_width,
            quality,
        ))
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}
