//! Leaderboard HTTP routes
//!
//! - `GET  /api/test`        liveness check
//! - `POST /api/scoreboard`  submit `{username, score}`
//! - `GET  /api/scoreboard`  top 10 as `{scores: [...]}`
//!
//! Anything else falls through to the static file directory, if one is set.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::leaderboard::{LeaderboardStore, PendingSave, ScoreEntry, ScoreSubmission};

pub const MISSING_FIELDS: &str = "Username and score required";

#[derive(Clone, Default)]
pub struct AppState {
    pub scores: Arc<Mutex<LeaderboardStore>>,
    /// Serializes file writes; holds the seq of the last snapshot written
    last_saved: Arc<tokio::sync::Mutex<u64>>,
}

impl AppState {
    pub fn new(store: LeaderboardStore) -> Self {
        Self {
            scores: Arc::new(Mutex::new(store)),
            last_saved: Arc::default(),
        }
    }

    /// Write a snapshot on the blocking pool, skipping it if a newer one
    /// already landed
    async fn persist(&self, save: PendingSave) {
        let mut last = self.last_saved.lock().await;
        if save.seq <= *last {
            return;
        }
        let seq = save.seq;
        let path = save.path.clone();
        match tokio::task::spawn_blocking(move || save.write()).await {
            Ok(Ok(())) => *last = seq,
            Ok(Err(e)) => log::warn!("Failed to save scores to {}: {}", path.display(), e),
            Err(e) => log::warn!("Score save task failed: {}", e),
        }
    }

    fn scores(&self) -> MutexGuard<'_, LeaderboardStore> {
        // A panicked handler can't leave the list half-written
        self.scores.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ScoresResponse {
    scores: Vec<ScoreEntry>,
}

pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/test", get(test_route))
        .route("/api/scoreboard", get(list_scores).post(submit_score))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    };
    app.layer(cors)
}

async fn test_route() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Test route is working",
    })
}

async fn list_scores(State(state): State<AppState>) -> Json<ScoresResponse> {
    let scores = state.scores().board().scores().to_vec();
    Json(ScoresResponse { scores })
}

async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreSubmission>, JsonRejection>,
) -> impl IntoResponse {
    let entry = match payload {
        Ok(Json(submission)) => submission.into_entry(),
        Err(rejection) => {
            log::debug!("Rejected scoreboard body: {}", rejection);
            None
        }
    };
    let Some(entry) = entry else {
        return (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse {
                message: MISSING_FIELDS,
            }),
        );
    };

    log::info!("Score submitted: {} = {}", entry.username, entry.score);
    // Lock released at the end of this statement, before any disk I/O
    let (_, pending) = state.scores().record(entry);
    if let Some(save) = pending {
        state.persist(save).await;
    }
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: "Score submitted successfully",
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(LeaderboardStore::in_memory()), None)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/scoreboard")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_scores() -> Request<Body> {
        Request::builder()
            .uri("/api/scoreboard")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_route_works() {
        let request = Request::builder()
            .uri("/api/test")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Test route is working" }));
    }

    #[tokio::test]
    async fn test_missing_score_is_bad_request() {
        let (status, body) = send(&app(), post(json!({ "username": "A" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Username and score required" }));
    }

    #[tokio::test]
    async fn test_missing_username_is_bad_request() {
        let (status, _) = send(&app(), post(json!({ "score": 10 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, body) = send(&app(), post(json!({ "username": "A", "score": "lots" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], MISSING_FIELDS);
    }

    #[tokio::test]
    async fn test_submit_then_list_sorted() {
        let app = app();
        let (status, body) = send(&app, post(json!({ "username": "A", "score": 50 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Score submitted successfully" }));
        send(&app, post(json!({ "username": "B", "score": 80 }))).await;

        let (status, body) = send(&app, get_scores()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "scores": [
                { "username": "B", "score": 80 },
                { "username": "A", "score": 50 }
            ]})
        );
    }

    #[tokio::test]
    async fn test_file_backed_submit_is_written() {
        let path = std::env::temp_dir().join(format!("alitu-server-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let app = router(AppState::new(LeaderboardStore::open(&path)), None);

        send(&app, post(json!({ "username": "A", "score": 50 }))).await;
        send(&app, post(json!({ "username": "B", "score": 80 }))).await;

        let reopened = LeaderboardStore::open(&path);
        let names: Vec<_> = reopened.board().scores().iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_stale_snapshot_not_written_over_newer() {
        let path = std::env::temp_dir().join(format!("alitu-stale-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let state = AppState::new(LeaderboardStore::open(&path));
        let (_, older) = state.scores().record(ScoreEntry {
            username: "A".into(),
            score: 50,
        });
        let (_, newer) = state.scores().record(ScoreEntry {
            username: "B".into(),
            score: 80,
        });

        state.persist(newer.unwrap()).await;
        state.persist(older.unwrap()).await;

        let reopened = LeaderboardStore::open(&path);
        assert_eq!(reopened.board().scores().len(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_list_truncated_to_ten() {
        let app = app();
        for i in 1..=12 {
            send(&app, post(json!({ "username": format!("p{i}"), "score": i * 10 }))).await;
        }
        let (_, body) = send(&app, get_scores()).await;
        let scores = body["scores"].as_array().unwrap();
        assert_eq!(scores.len(), 10);
        assert_eq!(scores[0]["score"], 120);
        assert_eq!(scores[9]["score"], 30);
    }
}
