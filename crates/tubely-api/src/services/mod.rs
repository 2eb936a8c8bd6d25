pub mod ingestion;
pub mod thumbnail_store;

pub use ingestion::{StagedFiles, VideoIngestion};
pub use thumbnail_store::{DiskThumbnailStore, MemoryThumbnailStore, ThumbnailStore};
