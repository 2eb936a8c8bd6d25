//! Test helpers: build AppState and router for integration tests.
//!
//! The app runs against the in-memory video store, `LocalStorage` in a temp dir and
//! fake media tools, so no database, ffmpeg or S3 is needed.

#![allow(dead_code)]

pub mod auth;
pub mod media;

use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::auth::JwtConfig;
use tubely_api::services::MemoryThumbnailStore;
use tubely_api::setup::routes;
use tubely_api::state::{AppState, MediaState, SecurityState};
use tubely_core::models::Video;
use tubely_core::{BaseConfig, Config, ServerConfig, StorageBackend, ThumbnailStoreKind};
use tubely_db::InMemoryVideoRepository;
use tubely_processing::MediaValidator;
use tubely_storage::{LocalStorage, Storage};
use uuid::Uuid;

use self::media::FakeMediaTools;

pub const PUBLIC_BASE_URL: &str = "http://localhost:8091";
pub const MEDIA_BASE_URL: &str = "http://localhost:8091/media";
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_JWT_ISSUER: &str = "tubely-access";

/// Upload limits used by a test app
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_video_size_bytes: 1024 * 1024 * 1024,
            max_thumbnail_size_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Test application: server, state, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub tools: Arc<FakeMediaTools>,
    pub _temp_dir: TempDir,
    pub media_dir: PathBuf,
    pub staging_dir: PathBuf,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        auth::token_for(&self.state.security.jwt, user_id)
    }

    /// Insert a video draft owned by `user_id` directly into the store.
    pub async fn create_video(&self, user_id: Uuid) -> Video {
        self.state
            .videos
            .create_video(&Video::new(user_id, "Boots".to_string(), String::new()))
            .await
            .expect("Failed to create video")
    }

    pub async fn get_video(&self, id: Uuid) -> Video {
        self.state
            .videos
            .get_video(id)
            .await
            .expect("Failed to read video")
            .expect("Video missing")
    }

    /// Files left in the staging directory
    pub fn staged_files(&self) -> Vec<PathBuf> {
        list_files(&self.staging_dir)
    }

    /// Every object written to storage, as paths relative to the media directory
    pub fn stored_objects(&self) -> Vec<String> {
        let mut objects: Vec<String> = list_files(&self.media_dir)
            .into_iter()
            .filter_map(|p| {
                p.strip_prefix(&self.media_dir)
                    .ok()
                    .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        objects.sort();
        objects
    }
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return files;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            files.extend(list_files(&path));
        } else {
            files.push(path);
        }
    }
    files
}

pub fn create_test_config(assets_root: &Path, media_dir: &Path, limits: Limits) -> Config {
    Config(Box::new(ServerConfig {
        base: BaseConfig {
            server_port: 8091,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 5,
            db_timeout_seconds: 5,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_issuer: TEST_JWT_ISSUER.to_string(),
            environment: "test".to_string(),
            log_format: "compact".to_string(),
        },
        database_url: None,
        public_base_url: PUBLIC_BASE_URL.to_string(),
        assets_root: assets_root.to_path_buf(),
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        cdn_distribution_url: None,
        s3_upload_part_size_bytes: 5 * 1024 * 1024,
        s3_max_attempts: 3,
        local_storage_path: Some(media_dir.to_string_lossy().into_owned()),
        local_storage_base_url: Some(MEDIA_BASE_URL.to_string()),
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        max_video_size_bytes: limits.max_video_size_bytes,
        max_thumbnail_size_bytes: limits.max_thumbnail_size_bytes,
        thumbnail_store: ThumbnailStoreKind::Memory,
        thumbnail_cache_capacity: 16,
    }))
}

/// Setup test app with default limits and media tools that succeed.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(FakeMediaTools::default(), Limits::default()).await
}

pub async fn setup_test_app_with(tools: FakeMediaTools, limits: Limits) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let assets_root = temp_dir.path().join("assets");
    let media_dir = temp_dir.path().join("media");
    let config = create_test_config(&assets_root, &media_dir, limits);

    let staging_dir = config.staging_dir();
    std::fs::create_dir_all(&staging_dir).expect("Failed to create staging directory");

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(&media_dir, MEDIA_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );

    let tools = Arc::new(tools);
    let media = MediaState {
        storage,
        prober: tools.clone(),
        remuxer: tools.clone(),
        staging_dir: staging_dir.clone(),
        video_validator: MediaValidator::video(limits.max_video_size_bytes),
        thumbnail_validator: MediaValidator::thumbnail(limits.max_thumbnail_size_bytes),
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        videos: Arc::new(InMemoryVideoRepository::new()),
        media,
        thumbnails: Arc::new(MemoryThumbnailStore::new(
            std::num::NonZeroUsize::new(16).expect("non-zero capacity"),
            PUBLIC_BASE_URL,
        )),
        security: SecurityState {
            jwt: JwtConfig::new(TEST_JWT_SECRET, TEST_JWT_ISSUER),
        },
    });

    let router = routes::setup_routes(&config, state.clone()).expect("Failed to setup routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        state,
        tools,
        _temp_dir: temp_dir,
        media_dir,
        staging_dir,
    }
}
