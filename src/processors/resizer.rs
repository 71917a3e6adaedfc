// pixie/src/processors/resizer.rs
use crate::core::{ImageToolError, Result};
use image::{imageops::FilterType, DynamicImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Fixed width, height follows the source aspect ratio.
    Width(u32),
    /// Exact square, source aspect ratio ignored.
    Square(u32),
}

pub struct Resizer {
    filter: FilterType,
}

impl Resizer {
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    /// Target dimensions for `mode`, or `None` when the source has zero width.
    ///
    /// Width mode floors the height: `floor(height * target / width)`. A height
    /// that does not fit in `u32` is an error.
    pub fn target_dimensions(
        &self,
        width: u32,
        height: u32,
        mode: ResizeMode,
    ) -> Result<Option<(u32, u32)>> {
        match mode {
            ResizeMode::Width(target) => {
                if width == 0 {
                    return Ok(None);
                }
                let scaled = u64::from(height) * u64::from(target) / u64::from(width);
                let scaled = u32::try_from(scaled).map_err(|_| {
                    ImageToolError::InvalidParameter(format!(
                        "computed height {} for {}x{} at width {} exceeds the maximum image size",
                        scaled, width, height, target
                    ))
                })?;
                Ok(Some((target, scaled)))
            }
            ResizeMode::Square(size) => Ok(Some((size, size))),
        }
    }

    pub fn resize_exact(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        if width == image.width() && height == image.height() {
            log::debug!("Image dimensions unchanged, skipping resize");
            return image.clone();
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );

        image.resize_exact(width, height, self.filter)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}
