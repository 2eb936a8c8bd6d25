use super::store::VideoStore;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tubely_core::{models::Video, AppError};
use uuid::Uuid;

const VIDEO_COLUMNS: &str =
    "id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at";

/// Repository for video records in Postgres
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl VideoStore for PgVideoRepository {
    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "insert", db.record_id = %video.id))]
    async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        let query = format!(
            r#"
            INSERT INTO videos (id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        );
        let created = sqlx::query_as::<Postgres, Video>(&query)
            .bind(video.id)
            .bind(video.user_id)
            .bind(&video.title)
            .bind(&video.description)
            .bind(&video.thumbnail_url)
            .bind(&video.video_url)
            .bind(video.created_at)
            .bind(video.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let query = format!("SELECT {} FROM videos WHERE id = $1", VIDEO_COLUMNS);
        let video = sqlx::query_as::<Postgres, Video>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let query = format!(
            "SELECT {} FROM videos WHERE user_id = $1 ORDER BY created_at DESC",
            VIDEO_COLUMNS
        );
        let videos = sqlx::query_as::<Postgres, Video>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(videos)
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "update", db.record_id = %video.id))]
    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let query = format!(
            r#"
            UPDATE videos
            SET title = $2, description = $3, thumbnail_url = $4, video_url = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        );
        let updated = sqlx::query_as::<Postgres, Video>(&query)
            .bind(video.id)
            .bind(&video.title)
            .bind(&video.description)
            .bind(&video.thumbnail_url)
            .bind(&video.video_url)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "delete", db.record_id = %id))]
    async fn delete_video(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
