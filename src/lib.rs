pub mod cli;
pub mod config;
mod core;
mod processors;
mod utils;

pub use crate::cli::{Cli, Commands};
pub use crate::config::{
    AssetSet, AssetSetEntry, ConfigError, Device, DeviceSizes, FaviconConfig, ImageProfile,
    OptimizerConfig, Variant,
};
pub use crate::core::processor::ImageProcessor;
pub use crate::core::{
    probe_capabilities, ImageToolError, ResizeOutcome, ResizeTask, Result, RunSummary,
    StageReport, VALID_EXTENSIONS,
};
pub use crate::processors::tasks::profile_tasks;
pub use crate::processors::{
    build_tasks, BatchProcessor, Compressor, FaviconGenerator, Loader, MetadataProcessor,
    ResizeMode, Resizer,
};
pub use crate::utils::{dir_has_images, is_supported_format, list_images};

// Re-export commonly used types
pub use image::DynamicImage;
