// pixie/src/utils/mod.rs
use crate::core::VALID_EXTENSIONS;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use walkdir::WalkDir;

/// Returns true for names with an accepted image extension, compared lowercased.
pub fn is_supported_format(path: &Path) -> bool {
    get_file_extension(path)
        .map(|ext| VALID_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn is_hidden(file_name: &OsStr) -> bool {
    file_name.as_encoded_bytes().starts_with(b".")
}

pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

/// Lists the image files directly inside `dir`, sorted by name.
///
/// Hidden files and unsupported extensions are left out. Symlinks are
/// followed, so a link to an image counts as an image. Names are kept as
/// `OsString`; non-UTF-8 names are listed like any other. A missing directory
/// yields an empty list.
pub fn list_images(dir: &Path) -> Vec<OsString> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.file_name().to_os_string())
        .filter(|name| !name.is_empty() && !is_hidden(name))
        .filter(|name| is_supported_format(Path::new(name)))
        .collect()
}

/// True when the directory exists and holds at least one accepted image.
pub fn dir_has_images(dir: &Path) -> bool {
    !list_images(dir).is_empty()
}
