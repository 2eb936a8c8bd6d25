use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Smallest part S3 accepts for every part but the last
pub const MIN_PART_SIZE: usize = 5 * 1024 * 1024;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    cdn_base_url: Option<String>,
    part_size: usize,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `max_attempts` - Attempts per request under the SDK's standard retry policy
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        max_attempts: u32,
    ) -> StorageResult<Self> {
        if bucket.is_empty() {
            return Err(StorageError::ConfigError("S3 bucket is empty".to_string()));
        }

        let region_provider =
            RegionProviderChain::first_try(aws_config::Region::new(region.clone()));

        let retry_config = RetryConfig::standard()
            .with_max_attempts(max_attempts.max(1))
            .with_retry_mode(RetryMode::Adaptive);

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(retry_config.clone())
            .load()
            .await;

        let client = if let Some(ref endpoint) = endpoint_url {
            // S3-compatible providers (MinIO etc.) need path-style addressing
            let mut s3_config_builder = aws_sdk_s3::Config::builder()
                .endpoint_url(endpoint)
                .region(config.region().cloned())
                .retry_config(retry_config)
                .force_path_style(true);
            if let Some(provider) = config.credentials_provider() {
                s3_config_builder = s3_config_builder.credentials_provider(provider);
            }
            Client::from_conf(s3_config_builder.build())
        } else {
            Client::new(&config)
        };

        Ok(S3Storage {
            client,
            bucket,
            region,
            endpoint_url,
            cdn_base_url: None,
            part_size: MIN_PART_SIZE,
        })
    }

    /// Serve public URLs from a CDN distribution instead of the bucket
    pub fn with_cdn_base_url(mut self, cdn_base_url: Option<String>) -> Self {
        self.cdn_base_url = cdn_base_url;
        self
    }

    /// Chunk size for multipart uploads. Files no larger than this go up in a single request.
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size.max(MIN_PART_SIZE);
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        body: ByteStream,
        content_type: &str,
        size: u64,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    /// Multipart upload reading one part at a time from `path`.
    ///
    /// The upload is aborted if any part or the completion fails, so no partial
    /// object is ever visible under `key`.
    async fn multipart_upload(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();

        let create_result = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Failed to create multipart upload"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let upload_id = create_result
            .upload_id()
            .ok_or_else(|| StorageError::UploadFailed("No upload ID returned from S3".to_string()))?
            .to_string();

        let result = match self.upload_parts(key, &upload_id, path).await {
            Ok(parts) => self.complete_multipart_upload(key, &upload_id, parts).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(total_size) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = total_size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 multipart upload successful"
                );
                Ok(())
            }
            Err(e) => {
                self.abort_multipart_upload(key, &upload_id).await;
                Err(e)
            }
        }
    }

    async fn upload_parts(
        &self,
        key: &str,
        upload_id: &str,
        path: &Path,
    ) -> StorageResult<Vec<(CompletedPart, u64)>> {
        let mut file = tokio::fs::File::open(path).await?;
        let mut part_number = 1i32;
        let mut parts = Vec::new();
        let mut part_buffer = vec![0u8; self.part_size];

        loop {
            let mut bytes_in_part = 0usize;
            while bytes_in_part < self.part_size {
                let bytes_read = file.read(&mut part_buffer[bytes_in_part..]).await.map_err(|e| {
                    StorageError::UploadFailed(format!("Failed to read {}: {}", path.display(), e))
                })?;

                if bytes_read == 0 {
                    break;
                }

                bytes_in_part += bytes_read;
            }

            if bytes_in_part == 0 {
                break;
            }

            let part_body = ByteStream::from(Bytes::copy_from_slice(&part_buffer[..bytes_in_part]));

            let upload_part_result = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(part_body)
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %key,
                        part_number = part_number,
                        "Failed to upload part"
                    );
                    StorageError::UploadFailed(e.to_string())
                })?;

            let etag = upload_part_result
                .e_tag()
                .ok_or_else(|| {
                    StorageError::UploadFailed(format!("No ETag returned for part {}", part_number))
                })?
                .to_string();

            parts.push((
                CompletedPart::builder()
                    .part_number(part_number)
                    .e_tag(etag)
                    .build(),
                bytes_in_part as u64,
            ));

            part_number += 1;

            if bytes_in_part < self.part_size {
                break;
            }
        }

        Ok(parts)
    }

    async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &str,
        parts: Vec<(CompletedPart, u64)>,
    ) -> StorageResult<u64> {
        let total_size = parts.iter().map(|(_, size)| size).sum();
        let completed_parts = CompletedMultipartUpload::builder()
            .set_parts(Some(parts.into_iter().map(|(part, _)| part).collect()))
            .build();

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(completed_parts)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Failed to complete multipart upload"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        Ok(total_size)
    }

    async fn abort_multipart_upload(&self, key: &str, upload_id: &str) {
        if let Err(e) = self
            .client
            .abort_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
        {
            tracing::warn!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                "Failed to abort multipart upload"
            );
        }
    }
}

/// Public URL for an object.
///
/// A CDN base wins over everything. S3-compatible endpoints use path-style
/// `{endpoint}/{bucket}/{key}`, AWS uses `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
pub(crate) fn object_url(
    bucket: &str,
    region: &str,
    endpoint_url: Option<&str>,
    cdn_base_url: Option<&str>,
    key: &str,
) -> String {
    if let Some(cdn) = cdn_base_url {
        return format!("{}/{}", cdn.trim_end_matches('/'), key);
    }
    match endpoint_url {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(key)?;
        let size = tokio::fs::metadata(path).await?.len();

        if size <= self.part_size as u64 {
            let body = ByteStream::from_path(path).await.map_err(|e| {
                StorageError::UploadFailed(format!("Failed to read {}: {}", path.display(), e))
            })?;
            self.put_object(key, body, content_type, size).await?;
        } else {
            self.multipart_upload(key, path, content_type).await?;
        }

        Ok(self.public_url(key))
    }

    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        validate_key(key)?;
        let size = data.len() as u64;
        self.put_object(key, ByteStream::from(data), content_type, size)
            .await?;
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                StorageError::DeleteFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    HeadObjectError::NotFound(_) => Ok(false),
                    _ => Err(StorageError::BackendError(e.to_string())),
                },
                _ => Err(StorageError::BackendError(e.to_string())),
            },
        }
    }

    fn public_url(&self, key: &str) -> String {
        object_url(
            &self.bucket,
            &self.region,
            self.endpoint_url.as_deref(),
            self.cdn_base_url.as_deref(),
            key,
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_aws() {
        assert_eq!(
            object_url("tubely-media", "us-east-2", None, None, "landscape/abc.mp4"),
            "https://tubely-media.s3.us-east-2.amazonaws.com/landscape/abc.mp4"
        );
    }

    #[test]
    fn test_object_url_custom_endpoint_is_path_style() {
        assert_eq!(
            object_url(
                "tubely-media",
                "us-east-1",
                Some("http://localhost:9000/"),
                None,
                "portrait/abc.mp4"
            ),
            "http://localhost:9000/tubely-media/portrait/abc.mp4"
        );
    }

    #[test]
    fn test_object_url_prefers_cdn() {
        assert_eq!(
            object_url(
                "tubely-media",
                "us-east-1",
                Some("http://localhost:9000"),
                Some("https://d111111abcdef8.cloudfront.net/"),
                "other/abc.mp4"
            ),
            "https://d111111abcdef8.cloudfront.net/other/abc.mp4"
        );
    }
}
