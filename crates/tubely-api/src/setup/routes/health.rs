//! `/health`, `/live` and `/ready`.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Key probed on the object store; it never exists.
const STORAGE_PROBE_KEY: &str = "health/probe.mp4";

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
enum Component {
    Up,
    Down(String),
    Timeout,
}

impl Component {
    fn is_up(&self) -> bool {
        matches!(self, Component::Up)
    }
}

async fn probe<F, E>(name: &'static str, check: F) -> Component
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(CHECK_TIMEOUT, check).await {
        Ok(Ok(())) => Component::Up,
        Ok(Err(e)) => {
            tracing::warn!(component = name, error = %e, "Health check failed");
            Component::Down(e.to_string())
        }
        Err(_) => {
            tracing::warn!(component = name, "Health check timed out");
            Component::Timeout
        }
    }
}

#[derive(Serialize)]
struct HealthReport {
    healthy: bool,
    database: Component,
    storage: Component,
    thumbnail_store: String,
}

pub async fn liveness_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "alive" }))
}

/// Ready once the metadata store answers.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = probe("database", state.videos.health_check()).await;
    let status = if database.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({ "ready": database.is_up(), "database": database })),
    )
}

/// Metadata store and object store. Storage failures are reported but do not
/// fail the check.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = probe("database", state.videos.health_check()).await;
    let storage = probe("storage", async {
        state.media.storage.exists(STORAGE_PROBE_KEY).await.map(drop)
    })
    .await;

    let report = HealthReport {
        healthy: database.is_up(),
        database,
        storage,
        thumbnail_store: state.thumbnails.kind().to_string(),
    };
    let status = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_outcomes() {
        assert_eq!(probe("ok", async { Ok::<(), String>(()) }).await, Component::Up);
        assert_eq!(
            probe("err", async { Err::<(), _>("pool closed") }).await,
            Component::Down("pool closed".to_string())
        );
    }

    #[test]
    fn test_component_serialization() {
        assert_eq!(
            serde_json::to_value(Component::Up).unwrap(),
            serde_json::json!({ "status": "up" })
        );
        assert_eq!(
            serde_json::to_value(Component::Down("boom".into())).unwrap(),
            serde_json::json!({ "status": "down", "error": "boom" })
        );
    }
}
