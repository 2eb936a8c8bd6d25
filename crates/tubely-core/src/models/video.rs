use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A video record as kept by the metadata store.
///
/// `video_url` and `thumbnail_url` only ever point at artifacts that were fully
/// written before the record was updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "videoURL")]
    pub video_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// New draft record with no uploaded media yet
    pub fn new(user_id: Uuid, title: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            description,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Request DTO for creating a video draft
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_serializes_with_client_field_names() {
        let mut video = Video::new(Uuid::new_v4(), "Boots".into(), "A demo".into());
        video.video_url = Some("https://bucket.s3.us-east-1.amazonaws.com/landscape/a.mp4".into());

        let json = serde_json::to_value(&video).unwrap();
        assert!(json.get("videoURL").and_then(|v| v.as_str()).is_some());
        assert!(json.get("thumbnailURL").unwrap().is_null());
        assert!(json.get("userID").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("video_url").is_none());
    }

    #[test]
    fn test_ownership() {
        let owner = Uuid::new_v4();
        let video = Video::new(owner, "t".into(), String::new());
        assert!(video.is_owned_by(owner));
        assert!(!video.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_create_request_validation() {
        let ok = CreateVideoRequest {
            title: "My video".into(),
            description: String::new(),
        };
        assert!(ok.validate().is_ok());

        let empty = CreateVideoRequest {
            title: String::new(),
            description: String::new(),
        };
        assert!(empty.validate().is_err());
    }
}
