// pixie/src/processors/compressor.rs
use crate::core::{is_jpeg_path, ImageToolError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat};
use oxipng::{optimize_from_memory, Options};
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Writes images with format-level optimization.
///
/// JPEG output takes the configured quality; PNG output is run through
/// oxipng and never sees a quality value.
pub struct Compressor {
    quality: u8,
    reduce_color_type: bool,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            reduce_color_type: true,
        }
    }

    /// Keeps the PNG color type as encoded, so RGBA input stays RGBA.
    pub fn preserve_color_type(mut self) -> Self {
        self.reduce_color_type = false;
        self
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Saves by output extension, creating parent directories first.
    pub fn save(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if is_jpeg_path(path) {
            return self.save_jpeg(image, path);
        }

        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Png) => self.save_png(image, path),
            _ => Err(ImageToolError::ProcessingError(format!(
                "Unsupported output format for: {}",
                path.display()
            ))),
        }
    }

    fn save_jpeg(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        log::debug!("Encoding JPEG {} at quality {}", path.display(), self.quality);

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let encoder = JpegEncoder::new_with_quality(&mut writer, self.quality);

        // JPEG has no alpha channel.
        match image.color() {
            ColorType::L8 | ColorType::Rgb8 => image.write_with_encoder(encoder)?,
            _ => DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?,
        }

        writer.flush()?;
        Ok(())
    }

    fn save_png(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        let data = self.encode_png(image)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Losslessly optimized PNG bytes.
    pub fn encode_png(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png)?;

        let mut options = Options::default();
        if !self.reduce_color_type {
            options.color_type_reduction = false;
            options.grayscale_reduction = false;
            options.palette_reduction = false;
            options.bit_depth_reduction = false;
        }

        log::debug!("Optimizing PNG data ({} bytes)", buffer.get_ref().len());
        optimize_from_memory(buffer.get_ref(), &options)
            .map_err(|e| ImageToolError::ProcessingError(format!("PNG optimization failed: {}", e)))
    }
}
