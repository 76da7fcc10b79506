pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::alignment::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Alignment API
        .route("/api/v1/vocabulary", get(handlers::handle_get_vocabulary))
        .route("/api/v1/profile", get(handlers::handle_get_profile))
        .route("/api/v1/signals", post(handlers::handle_extract_signals))
        .route("/api/v1/align", post(handlers::handle_align))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::alignment::coverage::KeywordCoverageScorer;
    use crate::config::Config;
    use crate::models::profile::{Claim, ClaimCategory, ProfileStore};
    use crate::vocabulary::Vocabulary;

    fn state(profile: Option<ProfileStore>) -> AppState {
        AppState {
            config: Config::default(),
            vocabulary: Arc::new(Vocabulary::builtin().unwrap()),
            profile: profile.map(Arc::new),
            coverage_scorer: Arc::new(KeywordCoverageScorer),
        }
    }

    fn configured_profile() -> ProfileStore {
        ProfileStore::new(
            Some("Product engineer".to_string()),
            vec![
                Claim::new("s1", ClaimCategory::Skill, "Python"),
                Claim::new("s2", ClaimCategory::Skill, "product roadmapping"),
            ],
        )
        .unwrap()
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(build_router(state(None)), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["profile_loaded"], false);
        assert!(body["vocabulary_phrases"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_signals_endpoint() {
        let (status, body) = send(
            build_router(state(None)),
            "POST",
            "/api/v1/signals",
            Some(json!({"job_texts": ["Looking for strong Python and SQL skills", "Free lunch"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signals"].as_array().unwrap().len(), 2);
        assert_eq!(body["vocabulary_misses"], json!([1]));
    }

    #[tokio::test]
    async fn test_align_with_configured_profile() {
        let (status, body) = send(
            build_router(state(Some(configured_profile()))),
            "POST",
            "/api/v1/align",
            Some(json!({"job_texts": ["Looking for strong Python and SQL skills", "Roadmap ownership required"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["run_id"].is_string());
        let bullets = body["result"]["sections"][0]["bullets"].as_array().unwrap();
        assert_eq!(bullets.len(), 2);
        assert_eq!(bullets[0]["text"], "Python");
        assert_eq!(
            body["result"]["positioning_statement"],
            "Product engineer with experience in Python."
        );
        assert!(body["coverage"]["overall_score"].as_u64().unwrap() <= 100);
    }

    #[tokio::test]
    async fn test_align_with_request_profile() {
        let (status, body) = send(
            build_router(state(None)),
            "POST",
            "/api/v1/align",
            Some(json!({
                "profile": {"claims": [{"id": "a1", "category": "achievement", "text": "Wrote SQL reports"}]},
                "job_texts": ["SQL"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coverage"]["overall_score"], 100);
    }

    #[tokio::test]
    async fn test_align_invalid_profile_is_validation_error() {
        let (status, body) = send(
            build_router(state(None)),
            "POST",
            "/api/v1/align",
            Some(json!({"profile": {"claims": []}, "job_texts": ["SQL"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_align_without_any_profile() {
        let (status, _) = send(
            build_router(state(None)),
            "POST",
            "/api/v1/align",
            Some(json!({"job_texts": ["SQL"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_not_configured_is_404() {
        let (status, _) = send(build_router(state(None)), "GET", "/api/v1/profile", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_vocabulary() {
        let (status, body) = send(build_router(state(None)), "GET", "/api/v1/vocabulary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["entries"].as_array().unwrap().is_empty());
    }
}
