// pixie/src/processors/tasks.rs
use crate::config::{AssetSetEntry, Device, ImageProfile, Variant};
use crate::core::ResizeTask;
use crate::utils::list_images;
use std::path::Path;

/// One task per image in `input_dir`, each writing to `output_dir/<same name>`.
///
/// Missing or empty input directories produce no tasks.
pub fn build_tasks(
    input_dir: &Path,
    output_dir: &Path,
    target_width: u32,
    quality: Option<u8>,
) -> Vec<ResizeTask> {
    list_images(input_dir)
        .into_iter()
        .map(|file_name| {
            ResizeTask::new(
                input_dir.join(&file_name),
                output_dir.join(&file_name),
                target_width,
                quality,
            )
        })
        .collect()
}

pub fn variant_tasks(profile: &ImageProfile, device: Device, variant: &Variant) -> Vec<ResizeTask> {
    build_tasks(
        &profile.input_dir,
        &profile.output_dir(device, variant),
        variant.width,
        Some(profile.quality),
    )
}

pub fn asset_tasks(entry: &AssetSetEntry) -> Vec<ResizeTask> {
    build_tasks(
        &entry.input_dir,
        &entry.output_dir,
        entry.width,
        Some(entry.quality),
    )
}

/// Every task of a profile in execution order: devices in fixed order, variants as declared.
pub fn profile_tasks(profile: &ImageProfile) -> Vec<ResizeTask> {
    Device::ALL
        .iter()
        .flat_map(|&device| {
            profile
                .sizes
                .variants(device)
                .into_iter()
                .flat_map(move |variant| variant_tasks(profile, device, &variant))
        })
        .collect()
}
