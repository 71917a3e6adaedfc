// pixie/src/processors/mod.rs
mod batch;
mod compressor;
mod favicon;
mod loader;
mod metadata;
mod resizer;
pub mod tasks;

pub use batch::BatchProcessor;
pub use compressor::Compressor;
pub use favicon::FaviconGenerator;
pub use loader::Loader;
pub use metadata::MetadataProcessor;
pub use resizer::{ResizeMode, Resizer};
pub use tasks::build_tasks;
