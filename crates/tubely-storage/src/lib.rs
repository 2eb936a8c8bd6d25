//! Tubely Storage Library
//!
//! Object storage for processed videos: the `Storage` trait plus S3 and local
//! filesystem backends.
//!
//! # Storage key format
//!
//! Video keys are `{orientation}/{name}` where orientation is one of
//! `landscape`, `portrait` or `other`. Keys must not contain `..` or a leading
//! `/`. Key generation lives in the `keys` module so all backends agree.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use factory::create_storage;
pub use keys::video_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
