// pixie/src/processors/batch.rs
use crate::config::{AssetSet, Device, FaviconConfig, ImageProfile, OptimizerConfig};
use crate::core::processor::ImageProcessor;
use crate::core::{probe_capabilities, ImageToolError, ResizeTask, Result, RunSummary, StageReport};
use crate::processors::tasks::{asset_tasks, profile_tasks, variant_tasks};
use crate::processors::FaviconGenerator;
use crate::utils::dir_has_images;
use std::path::PathBuf;

/// Drives a whole run: profiles, then asset sets, then favicons, one file at a time.
pub struct BatchProcessor {
    config: OptimizerConfig,
    processor: ImageProcessor,
    favicons: FaviconGenerator,
}

impl BatchProcessor {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            processor: ImageProcessor::new(),
            favicons: FaviconGenerator::new(),
        }
    }

    /// Global checks that abort the run before any file is touched.
    pub fn preflight(&self) -> Result<()> {
        probe_capabilities()?;

        let favicon_exists = self.config.favicon_source_exists();
        let existing_inputs: Vec<PathBuf> = self
            .config
            .input_dirs()
            .into_iter()
            .filter(|dir| dir.is_dir())
            .collect();

        if existing_inputs.is_empty() && !favicon_exists {
            return Err(ImageToolError::NoInputs);
        }

        if !existing_inputs.iter().any(|dir| dir_has_images(dir)) && !favicon_exists {
            return Err(ImageToolError::NoImages);
        }

        log::debug!(
            "Preflight passed: {} input director(ies), favicon source: {}",
            existing_inputs.len(),
            favicon_exists
        );
        Ok(())
    }

    pub fn run(&self) -> Result<RunSummary> {
        self.preflight()?;

        let mut summary = RunSummary::default();
        for profile in &self.config.profiles {
            self.process_profile(profile, &mut summary);
        }
        for set in &self.config.asset_sets {
            self.process_asset_set(set, &mut summary);
        }
        self.process_favicons(&mut summary);

        Ok(summary)
    }

    fn process_profile(&self, profile: &ImageProfile, summary: &mut RunSummary) {
        if !profile.input_dir.is_dir() {
            log::warn!(
                "Skipping profile '{}': input dir not found -> {}",
                profile.name,
                profile.input_dir.display()
            );
            summary.skipped_stages.push(format!("profile '{}'", profile.name));
            return;
        }

        log::info!("========= Processing profile: {} =========", profile.name);
        for device in Device::ALL {
            for variant in profile.sizes.variants(device) {
                log::info!(
                    "Profile: {} → {} → {} @ {}px",
                    profile.name,
                    device,
                    variant.label,
                    variant.width
                );
                let tasks = variant_tasks(profile, device, &variant);
                let label = format!("{}/{}/{}", profile.name, device, variant.label);
                summary.stages.push(self.run_tasks(label, &tasks));
            }
        }
        log::info!("");
    }

    fn process_asset_set(&self, set: &AssetSet, summary: &mut RunSummary) {
        for entry in &set.entries {
            if !entry.input_dir.is_dir() {
                log::warn!(
                    "Skipping {} for '{}': input dir not found -> {}",
                    set.asset_type,
                    entry.label,
                    entry.input_dir.display()
                );
                summary
                    .skipped_stages
                    .push(format!("{} '{}'", set.asset_type, entry.label));
                continue;
            }

            log::info!(
                "========= Processing {} for: {} =========",
                set.asset_type,
                entry.label
            );
            let tasks = asset_tasks(entry);
            let label = format!("{}/{}", set.asset_type, entry.label);
            summary.stages.push(self.run_tasks(label, &tasks));
            log::info!("");
        }
    }

    fn process_favicons(&self, summary: &mut RunSummary) {
        let Some(favicon) = self.config.favicon.as_ref() else {
            log::warn!("Skipping favicons: no [favicon] section configured");
            summary.skipped_stages.push("favicons".to_string());
            return;
        };

        if !favicon.source_exists() {
            log::warn!(
                "Skipping favicons: source not found -> {}",
                favicon.input.display()
            );
            summary.skipped_stages.push("favicons".to_string());
            return;
        }

        log::info!("========= Processing favicons =========");
        let mut report = StageReport::new("favicons");
        for outcome in self.favicons.generate(favicon) {
            outcome.log();
            report.record(&outcome);
        }
        summary.stages.push(report);
        log::info!("");
    }

    fn run_tasks(&self, label: String, tasks: &[ResizeTask]) -> StageReport {
        let mut report = StageReport::new(label);

        if tasks.is_empty() {
            log::info!("No images found.");
            return report;
        }

        for task in tasks {
            let outcome = self.processor.process(task);
            outcome.log();
            report.record(&outcome);
        }

        report
    }

    /// Resize tasks a run would execute, in execution order. Profiles and
    /// entries whose input directory is missing contribute nothing.
    pub fn planned_tasks(&self) -> Vec<ResizeTask> {
        let profiles = self.config.profiles.iter().flat_map(profile_tasks);
        let assets = self
            .config
            .asset_sets
            .iter()
            .flat_map(|set| set.entries.iter().flat_map(asset_tasks));
        profiles.chain(assets).collect()
    }

    /// Favicon files a run would write, or nothing when the source is absent.
    pub fn planned_favicons(&self) -> Vec<PathBuf> {
        match self.config.favicon.as_ref() {
            Some(favicon) if favicon.source_exists() => favicon_outputs(favicon),
            _ => Vec::new(),
        }
    }
}

fn favicon_outputs(favicon: &FaviconConfig) -> Vec<PathBuf> {
    favicon
        .sizes
        .iter()
        .map(|&size| favicon.png_path(size))
        .chain(std::iter::once(favicon.ico_path()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AssetSetEntry, DeviceSizes, Variant};
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use image::RgbImage;

    fn profile(temp: &TempDir, input: &str) -> ImageProfile {
        ImageProfile {
            name: "hero".to_string(),
            input_dir: temp.path().join(input),
            output_base: temp.path().join("optimized"),
            quality: 80,
            sizes: DeviceSizes::new(
                vec![Variant {
                    label: "standard".to_string(),
                    width: 64,
                }],
                vec![],
                vec![Variant {
                    label: "standard".to_string(),
                    width: 32,
                }],
            ),
        }
    }

    #[test]
    fn nothing_configured_is_fatal() {
        let batch = BatchProcessor::new(OptimizerConfig::default());
        assert!(matches!(batch.run(), Err(ImageToolError::NoInputs)));
    }

    #[test]
    fn empty_inputs_are_fatal() {
        let temp = TempDir::new().unwrap();
        temp.child("in/readme.txt").touch().unwrap();
        let config = OptimizerConfig {
            profiles: vec![profile(&temp, "in")],
            ..Default::default()
        };

        let batch = BatchProcessor::new(config);
        assert!(matches!(batch.run(), Err(ImageToolError::NoImages)));
        assert!(!temp.path().join("optimized").exists());
    }

    #[test]
    fn runs_every_device_variant() {
        let temp = TempDir::new().unwrap();
        temp.child("in").create_dir_all().unwrap();
        RgbImage::new(128, 96).save(temp.path().join("in/a.png")).unwrap();

        let config = OptimizerConfig {
            profiles: vec![profile(&temp, "in")],
            ..Default::default()
        };
        let summary = BatchProcessor::new(config).run().unwrap();

        assert_eq!(summary.saved(), 2);
        let labels: Vec<_> = summary.stages.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["hero/desktop/standard", "hero/mobile/standard"]);
        let mobile = image::open(temp.path().join("optimized/mobile/standard/a.png")).unwrap();
        assert_eq!((mobile.width(), mobile.height()), (32, 24));
        assert_eq!(summary.skipped_stages, ["favicons"]);
    }

    #[test]
    fn missing_asset_dir_is_skipped() {
        let temp = TempDir::new().unwrap();
        temp.child("in").create_dir_all().unwrap();
        RgbImage::new(50, 50).save(temp.path().join("in/a.jpg")).unwrap();

        let entry = |label: &str, input: &str| AssetSetEntry {
            label: label.to_string(),
            input_dir: temp.path().join(input),
            output_dir: temp.path().join("thumbs").join(label),
            width: 10,
            quality: 70,
        };
        let config = OptimizerConfig {
            asset_sets: vec![AssetSet {
                asset_type: "thumbs".to_string(),
                entries: vec![entry("gone", "missing"), entry("gallery", "in")],
            }],
            ..Default::default()
        };

        let summary = BatchProcessor::new(config).run().unwrap();

        assert_eq!(summary.saved(), 1);
        assert!(summary.skipped_stages.contains(&"thumbs 'gone'".to_string()));
        assert!(temp.path().join("thumbs/gallery/a.jpg").is_file());
    }

    #[test]
    fn plan_lists_tasks_without_writing() {
        let temp = TempDir::new().unwrap();
        temp.child("in/a.png").touch().unwrap();
        let config = OptimizerConfig {
            profiles: vec![profile(&temp, "in")],
            ..Default::default()
        };

        let batch = BatchProcessor::new(config);
        let tasks = batch.planned_tasks();

        assert_eq!(tasks.len(), 2);
        assert!(batch.planned_favicons().is_empty());
        assert!(!temp.path().join("optimized").exists());
    }
}
