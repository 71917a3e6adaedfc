// pixie/src/processors/loader.rs
use crate::core::{ImageToolError, Result};
use crate::processors::MetadataProcessor;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Decodes source images and normalizes their EXIF orientation.
pub struct Loader {
    metadata: MetadataProcessor,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            metadata: MetadataProcessor::new(),
        }
    }

    /// Decoded pixels, rotated/flipped to their visual orientation.
    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        let image = self.decode(path)?;
        let orientation = self.metadata.read_orientation(path)?;

        if orientation != super::metadata::ORIENTATION_NORMAL {
            log::debug!(
                "Applying EXIF orientation {} to {}",
                orientation,
                path.display()
            );
        }

        Ok(self.metadata.apply_orientation(image, orientation))
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| {
                ImageToolError::ProcessingError(format!("Failed to decode image: {}", e))
            })?;

        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            image.width(),
            image.height(),
            image.color()
        );

        Ok(image)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn loads_plain_image() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("plain.png");
        RgbImage::new(6, 4).save(&path).unwrap();

        let image = Loader::new().load(&path).unwrap();
        assert_eq!((image.width(), image.height()), (6, 4));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(Loader::new().load(&path).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let result = Loader::new().load(&temp.path().join("gone.png"));
        assert!(matches!(result, Err(ImageToolError::Io(_))));
    }
}
