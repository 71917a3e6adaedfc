// pixie/src/processors/metadata.rs
use crate::core::Result;
use exif::{Exif, In, Reader, Tag};
use image::DynamicImage;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF orientation value meaning "stored as displayed".
pub const ORIENTATION_NORMAL: u32 = 1;

pub struct MetadataProcessor;

impl MetadataProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn read_metadata(&self, path: &Path) -> Result<Option<Exif>> {
        let file = File::open(path)?;
        let mut bufreader = BufReader::new(&file);

        match Reader::new().read_from_container(&mut bufreader) {
            Ok(exif) => {
                log::debug!("Found EXIF data in {}", path.display());
                Ok(Some(exif))
            }
            Err(exif::Error::NotFound(_)) => {
                log::debug!("No EXIF data found in {}", path.display());
                Ok(None)
            }
            Err(e) => {
                // Unreadable EXIF never blocks the pixels from being used.
                log::debug!("Ignoring unreadable EXIF in {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Orientation tag of the primary image, or 1 when absent.
    pub fn read_orientation(&self, path: &Path) -> Result<u32> {
        let orientation = self
            .read_metadata(path)?
            .and_then(|exif| {
                exif.get_field(Tag::Orientation, In::PRIMARY)
                    .and_then(|field| field.value.get_uint(0))
            })
            .unwrap_or(ORIENTATION_NORMAL);

        Ok(orientation)
    }

    /// Rotates/flips pixel data so it matches the visual orientation.
    pub fn apply_orientation(&self, image: DynamicImage, orientation: u32) -> DynamicImage {
        match orientation {
            2 => image.fliph(),
            3 => image.rotate180(),
            4 => image.flipv(),
            5 => image.rotate90().fliph(),
            6 => image.rotate90(),
            7 => image.rotate270().fliph(),
            8 => image.rotate270(),
            _ => image,
        }
    }
}

impl Default for MetadataProcessor {
    fn default() -> Self {
        Self::new()
    }
}
