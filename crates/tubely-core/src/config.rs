//! Configuration module
//!
//! Server, database, storage, authentication and media-processing settings, loaded
//! from the environment (and an optional `.env` file).

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_ISSUER: &str = "tubely-access";
const MAX_VIDEO_SIZE_MB: usize = 1024;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const S3_UPLOAD_PART_SIZE_MB: usize = 5;
const S3_MAX_ATTEMPTS: u32 = 3;
const THUMBNAIL_CACHE_CAPACITY: usize = 1024;

/// Where uploaded thumbnails are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailStoreKind {
    /// Bounded in-process cache, served back through the thumbnail endpoint
    Memory,
    /// Files under the assets root, served as static assets
    Disk,
}

impl FromStr for ThumbnailStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(ThumbnailStoreKind::Memory),
            "disk" => Ok(ThumbnailStoreKind::Disk),
            _ => Err(anyhow::anyhow!("Invalid thumbnail store: {}", s)),
        }
    }
}

impl Display for ThumbnailStoreKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ThumbnailStoreKind::Memory => write!(f, "memory"),
            ThumbnailStoreKind::Disk => write!(f, "disk"),
        }
    }
}

/// HTTP server and authentication settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub environment: String,
    pub log_format: String,
}

/// Full server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub base: BaseConfig,
    /// Postgres connection string. `None` selects the in-memory metadata store.
    pub database_url: Option<String>,
    pub public_base_url: String,
    pub assets_root: PathBuf,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    pub cdn_distribution_url: Option<String>,
    pub s3_upload_part_size_bytes: usize,
    pub s3_max_attempts: u32,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Media processing configuration
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
    pub thumbnail_store: ThumbnailStoreKind,
    pub thumbnail_cache_capacity: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServerConfig>);

impl Config {
    fn inner(&self) -> &ServerConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServerConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn jwt_issuer(&self) -> &str {
        &self.inner().base.jwt_issuer
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().database_url.as_deref()
    }

    pub fn public_base_url(&self) -> &str {
        &self.inner().public_base_url
    }

    pub fn assets_root(&self) -> &PathBuf {
        &self.inner().assets_root
    }

    /// Directory where uploads are staged while they are probed and remuxed
    pub fn staging_dir(&self) -> PathBuf {
        self.inner().assets_root.join("tmp")
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn cdn_distribution_url(&self) -> Option<&str> {
        self.inner().cdn_distribution_url.as_deref()
    }

    pub fn s3_upload_part_size_bytes(&self) -> usize {
        self.inner().s3_upload_part_size_bytes
    }

    pub fn s3_max_attempts(&self) -> u32 {
        self.inner().s3_max_attempts
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.inner().max_video_size_bytes
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.inner().max_thumbnail_size_bytes
    }

    pub fn thumbnail_store(&self) -> ThumbnailStoreKind {
        self.inner().thumbnail_store
    }

    pub fn thumbnail_cache_capacity(&self) -> usize {
        self.inner().thumbnail_cache_capacity
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| JWT_ISSUER.to_string()),
            environment,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "compact".to_string())
                .to_lowercase(),
        };

        let storage_backend = match env_opt("STORAGE_BACKEND") {
            Some(s) => Some(s.parse::<StorageBackend>()?),
            None => None,
        };

        let thumbnail_store = env::var("THUMBNAIL_STORE")
            .unwrap_or_else(|_| "memory".to_string())
            .parse::<ThumbnailStoreKind>()?;

        let config = ServerConfig {
            database_url: env_opt("DATABASE_URL"),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port))
                .trim_end_matches('/')
                .to_string(),
            assets_root: PathBuf::from(
                env::var("ASSETS_ROOT").unwrap_or_else(|_| "./assets".to_string()),
            ),
            base,
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION"),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            aws_region: env_opt("AWS_REGION"),
            cdn_distribution_url: env_opt("CDN_DISTRIBUTION_URL"),
            s3_upload_part_size_bytes: env::var("S3_UPLOAD_PART_SIZE_MB")
                .unwrap_or_else(|_| S3_UPLOAD_PART_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(S3_UPLOAD_PART_SIZE_MB)
                * 1024
                * 1024,
            s3_max_attempts: env::var("S3_MAX_ATTEMPTS")
                .unwrap_or_else(|_| S3_MAX_ATTEMPTS.to_string())
                .parse()
                .unwrap_or(S3_MAX_ATTEMPTS),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_MB")
                .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_VIDEO_SIZE_MB)
                * 1024
                * 1024,
            max_thumbnail_size_bytes: env::var("MAX_THUMBNAIL_SIZE_MB")
                .unwrap_or_else(|_| MAX_THUMBNAIL_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_THUMBNAIL_SIZE_MB)
                * 1024
                * 1024,
            thumbnail_store,
            thumbnail_cache_capacity: env::var("THUMBNAIL_CACHE_CAPACITY")
                .unwrap_or_else(|_| THUMBNAIL_CACHE_CAPACITY.to_string())
                .parse()
                .unwrap_or(THUMBNAIL_CACHE_CAPACITY),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let is_production = is_production_name(&self.base.environment);

        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if is_production && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        match self.database_url {
            Some(ref url)
                if !url.starts_with("postgres://") && !url.starts_with("postgresql://") =>
            {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
            None if is_production => {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be set in production; the in-memory store is for development only"
                ));
            }
            _ => {}
        }

        if self.s3_upload_part_size_bytes < 5 * 1024 * 1024 {
            return Err(anyhow::anyhow!(
                "S3_UPLOAD_PART_SIZE_MB must be at least 5 (S3 multipart minimum)"
            ));
        }

        if self.s3_max_attempts < 2 {
            return Err(anyhow::anyhow!(
                "S3_MAX_ATTEMPTS must be at least 2 so transient failures are retried"
            ));
        }

        if self.thumbnail_cache_capacity == 0 {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_CACHE_CAPACITY must be greater than zero"
            ));
        }

        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
