//! Run configuration.
//!
//! A single TOML file describes three independent sections, each optional:
//!
//! ```toml
//! [profiles.hero]
//! input_dir = "images/hero/original"
//! output_base = "images/hero/optimized"
//! quality = 90
//! [profiles.hero.sizes.desktop]
//! standard = 1280
//! large = 1600
//! [profiles.hero.sizes.mobile]
//! standard = 480
//!
//! [assets.thumbs.gallery]
//! input_dir = "images/gallery/original"
//! output_dir = "images/gallery/thumbs"
//! width = 400
//! quality = 85
//!
//! [favicon]
//! input = "images/favicon/original/logo.png"
//! output_dir = "images/favicon/optimized"
//! sizes = [16, 32, 48, 180]
//! ico_sizes = [16, 32, 48]
//! ```
//!
//! Profiles, asset types, asset labels and variants are kept in the order
//! they are declared in the file; that order is the processing order.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "image-optimizer.toml";

/// Largest edge an ICO directory entry can describe.
pub const MAX_ICO_SIZE: u32 = 256;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Device buckets of a responsive profile, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Desktop,
    Laptop,
    Mobile,
}

impl Device {
    pub const ALL: [Device; 3] = [Device::Desktop, Device::Laptop, Device::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Laptop => "laptop",
            Device::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named target width inside a device bucket, e.g. `standard = 1280`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub label: String,
    pub width: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceSizes {
    desktop: OrderedMap<u32>,
    laptop: OrderedMap<u32>,
    mobile: OrderedMap<u32>,
}

impl DeviceSizes {
    pub fn new(
        desktop: Vec<Variant>,
        laptop: Vec<Variant>,
        mobile: Vec<Variant>,
    ) -> Self {
        let into_map = |variants: Vec<Variant>| {
            OrderedMap(variants.into_iter().map(|v| (v.label, v.width)).collect())
        };
        Self {
            desktop: into_map(desktop),
            laptop: into_map(laptop),
            mobile: into_map(mobile),
        }
    }

    /// Variants configured for one device, in declaration order. Empty when absent.
    pub fn variants(&self, device: Device) -> Vec<Variant> {
        let map = match device {
            Device::Desktop => &self.desktop,
            Device::Laptop => &self.laptop,
            Device::Mobile => &self.mobile,
        };
        map.0
            .iter()
            .map(|(label, width)| Variant {
                label: label.clone(),
                width: *width,
            })
            .collect()
    }
}

/// Responsive profile: one input directory fanned out to every device/variant width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProfile {
    pub name: String,
    pub input_dir: PathBuf,
    pub output_base: PathBuf,
    pub quality: u8,
    pub sizes: DeviceSizes,
}

impl ImageProfile {
    /// `output_base/<device>/<variant>`
    pub fn output_dir(&self, device: Device, variant: &Variant) -> PathBuf {
        self.output_base.join(device.as_str()).join(&variant.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSetEntry {
    pub label: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub width: u32,
    pub quality: u8,
}

/// Entries grouped under one asset type such as `thumbs` or `icons`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSet {
    pub asset_type: String,
    pub entries: Vec<AssetSetEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaviconConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default = "default_favicon_sizes")]
    pub sizes: Vec<u32>,
    #[serde(default = "default_ico_sizes")]
    pub ico_sizes: Vec<u32>,
}

fn default_favicon_sizes() -> Vec<u32> {
    vec![16, 32, 48, 180]
}

fn default_ico_sizes() -> Vec<u32> {
    vec![16, 32, 48]
}

impl FaviconConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            sizes: default_favicon_sizes(),
            ico_sizes: default_ico_sizes(),
        }
    }

    pub fn source_exists(&self) -> bool {
        self.input.is_file()
    }

    pub fn png_path(&self, size: u32) -> PathBuf {
        self.output_dir.join(format!("favicon-{size}x{size}.png"))
    }

    pub fn ico_path(&self) -> PathBuf {
        self.output_dir.join("favicon.ico")
    }
}

/// Everything a run needs. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizerConfig {
    pub profiles: Vec<ImageProfile>,
    pub asset_sets: Vec<AssetSet>,
    pub favicon: Option<FaviconConfig>,
}

impl OptimizerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let config = Self::from(file);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for profile in &self.profiles {
            check_quality(profile.quality, &format!("profile '{}'", profile.name))?;
            for device in Device::ALL {
                for variant in profile.sizes.variants(device) {
                    if variant.width == 0 {
                        return Err(ConfigError::Validation(format!(
                            "profile '{}': {}.{} width must be greater than 0",
                            profile.name, device, variant.label
                        )));
                    }
                }
            }
        }

        for set in &self.asset_sets {
            for entry in &set.entries {
                let context = format!("{} '{}'", set.asset_type, entry.label);
                check_quality(entry.quality, &context)?;
                if entry.width == 0 {
                    return Err(ConfigError::Validation(format!(
                        "{context}: width must be greater than 0"
                    )));
                }
            }
        }

        if let Some(favicon) = &self.favicon {
            if favicon.sizes.iter().chain(&favicon.ico_sizes).any(|&s| s == 0) {
                return Err(ConfigError::Validation(
                    "favicon sizes must be greater than 0".into(),
                ));
            }
            if let Some(size) = favicon.ico_sizes.iter().find(|&&s| s > MAX_ICO_SIZE) {
                return Err(ConfigError::Validation(format!(
                    "favicon ico_sizes entry {size} exceeds {MAX_ICO_SIZE}"
                )));
            }
        }

        Ok(())
    }

    /// Union of profile and asset input directories, sorted and deduplicated.
    pub fn input_dirs(&self) -> Vec<PathBuf> {
        let dirs: BTreeSet<PathBuf> = self
            .profiles
            .iter()
            .map(|p| p.input_dir.clone())
            .chain(
                self.asset_sets
                    .iter()
                    .flat_map(|set| set.entries.iter().map(|e| e.input_dir.clone())),
            )
            .collect();
        dirs.into_iter().collect()
    }

    pub fn favicon_source_exists(&self) -> bool {
        self.favicon
            .as_ref()
            .map(FaviconConfig::source_exists)
            .unwrap_or(false)
    }
}

fn check_quality(quality: u8, context: &str) -> Result<(), ConfigError> {
    if quality > 100 {
        return Err(ConfigError::Validation(format!(
            "{context}: quality must be 0-100"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    profiles: OrderedMap<ProfileSection>,
    #[serde(default)]
    assets: OrderedMap<OrderedMap<AssetSection>>,
    #[serde(default)]
    favicon: Option<FaviconConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileSection {
    input_dir: PathBuf,
    output_base: PathBuf,
    quality: u8,
    #[serde(default)]
    sizes: DeviceSizes,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssetSection {
    input_dir: PathBuf,
    output_dir: PathBuf,
    width: u32,
    quality: u8,
}

impl From<ConfigFile> for OptimizerConfig {
    fn from(file: ConfigFile) -> Self {
        let profiles = file
            .profiles
            .0
            .into_iter()
            .map(|(name, section)| ImageProfile {
                name,
                input_dir: section.input_dir,
                output_base: section.output_base,
                quality: section.quality,
                sizes: section.sizes,
            })
            .collect();

        let asset_sets = file
            .assets
            .0
            .into_iter()
            .map(|(asset_type, entries)| AssetSet {
                asset_type,
                entries: entries
                    .0
                    .into_iter()
                    .map(|(label, section)| AssetSetEntry {
                        label,
                        input_dir: section.input_dir,
                        output_dir: section.output_dir,
                        width: section.width,
                        quality: section.quality,
                    })
                    .collect(),
            })
            .collect();

        Self {
            profiles,
            asset_sets,
            favicon: file.favicon,
        }
    }
}

/// TOML table read as a list of `(key, value)` pairs in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OrderedMap<T>(Vec<(String, T)>);

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

/// Commented starter file written by `pixie init`.
pub const SAMPLE_CONFIG: &str = r#"# Responsive image generator configuration.
#
# Every section is optional. Input directories that do not exist are
# skipped with a warning; output directories are created on demand.

# Responsive profiles: one input directory, one output tree per device/variant.
# Output layout: <output_base>/<device>/<variant>/<file>
[profiles.hero]
input_dir = "images/hero/original"
output_base = "images/hero/optimized"
quality = 90

[profiles.hero.sizes.desktop]
standard = 1280
large = 1600

[profiles.hero.sizes.laptop]
standard = 1024

[profiles.hero.sizes.mobile]
standard = 480

# Asset sets: fixed-width conversions grouped by type (thumbs, icons, ...).
[assets.thumbs.gallery]
input_dir = "images/gallery/original"
output_dir = "images/gallery/thumbs"
width = 400
quality = 85

[assets.icons.features]
input_dir = "images/icons/original"
output_dir = "images/icons/optimized"
width = 64
quality = 90

# Favicons: square PNGs plus a multi-resolution favicon.ico.
[favicon]
input = "images/favicon/original/favicon.png"
output_dir = "images/favicon/optimized"
sizes = [16, 32, 48, 180]
ico_sizes = [16, 32, 48]
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let config = OptimizerConfig::from_toml_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.asset_sets.len(), 2);
        assert!(config.favicon.is_some());
    }

    #[test]
    fn empty_document_is_valid() {
        let config = OptimizerConfig::from_toml_str("").unwrap();
        assert!(config.profiles.is_empty());
        assert!(config.asset_sets.is_empty());
        assert!(config.favicon.is_none());
    }

    #[test]
    fn variants_keep_declaration_order() {
        let config = OptimizerConfig::from_toml_str(
            r#"
            [profiles.hero]
            input_dir = "in"
            output_base = "out"
            quality = 80
            [profiles.hero.sizes.desktop]
            wide = 1920
            standard = 1280
            compact = 960
            "#,
        )
        .unwrap();

        let labels: Vec<_> = config.profiles[0]
            .sizes
            .variants(Device::Desktop)
            .into_iter()
            .map(|v| v.label)
            .collect();
        assert_eq!(labels, ["wide", "standard", "compact"]);
        assert!(config.profiles[0].sizes.variants(Device::Laptop).is_empty());
    }

    #[test]
    fn profiles_and_assets_keep_declaration_order() {
        let config = OptimizerConfig::from_toml_str(
            r#"
            [profiles.zeta]
            input_dir = "z"
            output_base = "zo"
            quality = 80
            [profiles.alpha]
            input_dir = "a"
            output_base = "ao"
            quality = 80

            [assets.thumbs.second]
            input_dir = "s"
            output_dir = "so"
            width = 100
            quality = 70
            [assets.thumbs.first]
            input_dir = "f"
            output_dir = "fo"
            width = 100
            quality = 70
            "#,
        )
        .unwrap();

        let names: Vec<_> = config.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        let labels: Vec<_> = config.asset_sets[0]
            .entries
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(labels, ["second", "first"]);
    }

    #[test]
    fn unknown_device_is_rejected() {
        let result = OptimizerConfig::from_toml_str(
            r#"
            [profiles.hero]
            input_dir = "in"
            output_base = "out"
            quality = 80
            [profiles.hero.sizes.tablet]
            standard = 800
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn zero_width_is_rejected() {
        let result = OptimizerConfig::from_toml_str(
            r#"
            [assets.thumbs.gallery]
            input_dir = "in"
            output_dir = "out"
            width = 0
            quality = 85
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn quality_above_100_is_rejected() {
        let result = OptimizerConfig::from_toml_str(
            r#"
            [profiles.hero]
            input_dir = "in"
            output_base = "out"
            quality = 101
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn oversized_ico_entry_is_rejected() {
        let result = OptimizerConfig::from_toml_str(
            r#"
            [favicon]
            input = "logo.png"
            output_dir = "out"
            ico_sizes = [16, 512]
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn favicon_sizes_default() {
        let config = OptimizerConfig::from_toml_str(
            r#"
            [favicon]
            input = "logo.png"
            output_dir = "out"
            "#,
        )
        .unwrap();
        let favicon = config.favicon.unwrap();
        assert_eq!(favicon.sizes, [16, 32, 48, 180]);
        assert_eq!(favicon.ico_sizes, [16, 32, 48]);
        assert_eq!(favicon.png_path(32), PathBuf::from("out/favicon-32x32.png"));
        assert_eq!(favicon.ico_path(), PathBuf::from("out/favicon.ico"));
    }

    #[test]
    fn input_dirs_are_deduplicated() {
        let config = OptimizerConfig::from_toml_str(
            r#"
            [profiles.hero]
            input_dir = "shared"
            output_base = "out"
            quality = 80

            [assets.thumbs.gallery]
            input_dir = "shared"
            output_dir = "thumbs"
            width = 100
            quality = 80
            [assets.icons.nav]
            input_dir = "icons"
            output_dir = "icons-out"
            width = 32
            quality = 80
            "#,
        )
        .unwrap();
        assert_eq!(
            config.input_dirs(),
            [PathBuf::from("icons"), PathBuf::from("shared")]
        );
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = OptimizerConfig::load(Path::new("/nonexistent/image-optimizer.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
