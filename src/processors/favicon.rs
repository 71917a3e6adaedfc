// pixie/src/processors/favicon.rs
use crate::config::FaviconConfig;
use crate::core::{ResizeOutcome, Result};
use crate::processors::{Compressor, Loader, ResizeMode, Resizer};
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::DynamicImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Square PNG favicons plus one multi-resolution `favicon.ico` from a single source.
pub struct FaviconGenerator {
    loader: Loader,
    resizer: Resizer,
    compressor: Compressor,
}

impl FaviconGenerator {
    pub fn new() -> Self {
        Self {
            loader: Loader::new(),
            resizer: Resizer::new(),
            compressor: Compressor::new(100).preserve_color_type(),
        }
    }

    /// All PNG sizes in list order, then the ICO. One outcome per output file.
    pub fn generate(&self, config: &FaviconConfig) -> Vec<ResizeOutcome> {
        let source = match self.load_source(&config.input) {
            Ok(source) => source,
            Err(error) => {
                return vec![ResizeOutcome::Failed {
                    path: config.input.clone(),
                    error,
                }]
            }
        };

        let mut outcomes: Vec<ResizeOutcome> = config
            .sizes
            .iter()
            .map(|&size| self.generate_png(&source, config, size))
            .collect();
        outcomes.push(self.generate_ico(&source, config));
        outcomes
    }

    /// Source promoted to RGBA; a no-op for images that already carry alpha.
    pub fn load_source(&self, path: &Path) -> Result<DynamicImage> {
        let image = self.loader.load(path)?;
        Ok(DynamicImage::ImageRgba8(image.to_rgba8()))
    }

    pub fn generate_png(&self, source: &DynamicImage, config: &FaviconConfig, size: u32) -> ResizeOutcome {
        let output = config.png_path(size);
        let icon = self.square(source, size);

        match self.compressor.save(&icon, &output) {
            Ok(()) => ResizeOutcome::Saved(output),
            Err(error) => ResizeOutcome::Failed {
                path: output,
                error,
            },
        }
    }

    pub fn generate_ico(&self, source: &DynamicImage, config: &FaviconConfig) -> ResizeOutcome {
        let output = config.ico_path();
        match self.write_ico(source, &config.ico_sizes, &output) {
            Ok(()) => ResizeOutcome::Saved(output),
            Err(error) => ResizeOutcome::Failed {
                path: output,
                error,
            },
        }
    }

    fn write_ico(&self, source: &DynamicImage, sizes: &[u32], output: &Path) -> Result<()> {
        let mut icon_dir = IconDir::new(ResourceType::Icon);

        for &size in sizes {
            let icon = self.square(source, size).to_rgba8();
            let image = IconImage::from_rgba_data(size, size, icon.into_raw());
            icon_dir.add_entry(IconDirEntry::encode(&image)?);
            log::debug!("ICO layer: {size}x{size}");
        }

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(output)?);
        icon_dir.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Stretches to `size`×`size`; never crops.
    fn square(&self, source: &DynamicImage, size: u32) -> DynamicImage {
        let (width, height) = self
            .resizer
            .target_dimensions(source.width(), source.height(), ResizeMode::Square(size))
            .ok()
            .flatten()
            .unwrap_or((size, size));
        self.resizer.resize_exact(source, width, height)
    }
}

impl Default for FaviconGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use image::{ColorType, RgbImage};

    fn config_for(temp: &TempDir) -> FaviconConfig {
        let input = temp.path().join("logo.jpg");
        RgbImage::from_fn(120, 60, |x, _| image::Rgb([x as u8, 40, 200]))
            .save(&input)
            .unwrap();
        FaviconConfig::new(input, temp.path().join("favicons"))
    }

    // The source is an opaque RGB JPEG; outputs must still carry alpha.
    #[test]
    fn pngs_are_square_rgba() {
        let temp = TempDir::new().unwrap();
        let config = config_for(&temp);

        let outcomes = FaviconGenerator::new().generate(&config);

        assert_eq!(outcomes.len(), config.sizes.len() + 1);
        assert!(outcomes.iter().all(ResizeOutcome::is_saved));
        for &size in &config.sizes {
            let png = image::open(config.png_path(size)).unwrap();
            assert_eq!((png.width(), png.height()), (size, size));
            assert_eq!(png.color(), ColorType::Rgba8);
        }
    }

    #[test]
    fn ico_has_one_entry_per_size() {
        let temp = TempDir::new().unwrap();
        let mut config = config_for(&temp);
        config.ico_sizes = vec![16, 24, 32, 64];

        let generator = FaviconGenerator::new();
        let source = generator.load_source(&config.input).unwrap();
        assert!(generator.generate_ico(&source, &config).is_saved());

        let file = File::open(config.ico_path()).unwrap();
        let icon_dir = IconDir::read(file).unwrap();
        let sizes: Vec<_> = icon_dir
            .entries()
            .iter()
            .map(|e| (e.width(), e.height()))
            .collect();
        assert_eq!(sizes, [(16, 16), (24, 24), (32, 32), (64, 64)]);
    }

    #[test]
    fn unreadable_source_is_one_failure() {
        let temp = TempDir::new().unwrap();
        let config = FaviconConfig::new(temp.path().join("missing.png"), temp.path().join("out"));

        let outcomes = FaviconGenerator::new().generate(&config);

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], ResizeOutcome::Failed { .. }));
    }
}
