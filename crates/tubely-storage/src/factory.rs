#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::Config;

fn required<'a>(value: Option<&'a str>, name: &str) -> StorageResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| StorageError::ConfigError(format!("{} not configured", name)))
}

/// Build the object store videos are published to. S3 unless `STORAGE_BACKEND=local`.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let backend = config.storage_backend().unwrap_or_default();
    tracing::info!(backend = %backend, "Creating video storage");

    match backend {
        StorageBackend::S3 => s3_storage(config).await,
        StorageBackend::Local => local_storage(config).await,
    }
}

#[cfg(feature = "storage-s3")]
async fn s3_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let bucket = required(config.s3_bucket(), "S3_BUCKET")?;
    let region = required(
        config.s3_region().or_else(|| config.aws_region()),
        "S3_REGION or AWS_REGION",
    )?;

    let storage = S3Storage::new(
        bucket.to_string(),
        region.to_string(),
        config.s3_endpoint().map(String::from),
        config.s3_max_attempts(),
    )
    .await?
    .with_part_size(config.s3_upload_part_size_bytes())
    .with_cdn_base_url(config.cdn_distribution_url().map(String::from));

    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-s3"))]
async fn s3_storage(_config: &Config) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "tubely-storage was built without the storage-s3 feature".to_string(),
    ))
}

#[cfg(feature = "storage-local")]
async fn local_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let path = required(config.local_storage_path(), "LOCAL_STORAGE_PATH")?;
    let base_url = required(config.local_storage_base_url(), "LOCAL_STORAGE_BASE_URL")?;

    Ok(Arc::new(LocalStorage::new(path, base_url.to_string()).await?))
}

#[cfg(not(feature = "storage-local"))]
async fn local_storage(_config: &Config) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "tubely-storage was built without the storage-local feature".to_string(),
    ))
}
