// HTTP surface.
// Thin axum handlers over the orchestrator plus the error-to-status mapping.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::cache::CachedDigest;
use crate::error::DigestError;
use crate::service::DigestService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DigestService>,
}

/// Build the API router. CORS is wide open; the service is fronted by
/// browser clients on other origins.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/analyze-repo", post(analyze_repo))
        .route("/api/repo-data", get(repo_data))
        .route("/api/repo-exists", get(repo_exists))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Analyze request body. `username` and `force` are accepted as aliases so
/// older clients keep working against the one canonical endpoint.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(alias = "username")]
    pub owner: String,
    pub repo: String,
    #[serde(default, alias = "force")]
    pub force_refresh: bool,
}

#[derive(Debug, Deserialize)]
pub struct RepoQuery {
    #[serde(alias = "username")]
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Serialize)]
struct DataEnvelope {
    success: bool,
    data: CachedDigest,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "gitdigest API is running!" }))
}

async fn analyze_repo(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<DataEnvelope>, DigestError> {
    let data = state
        .service
        .get_repo_data(&request.owner, &request.repo, request.force_refresh)
        .await?;
    Ok(Json(DataEnvelope {
        success: true,
        data,
    }))
}

/// Cache-only read. An absent or expired entry is not an error here, just a
/// `success: false` envelope.
async fn repo_data(
    State(state): State<AppState>,
    Query(query): Query<RepoQuery>,
) -> Result<Response, DigestError> {
    match state.service.cached(&query.owner, &query.repo)? {
        Some(data) => Ok(Json(DataEnvelope {
            success: true,
            data,
        })
        .into_response()),
        None => Ok(Json(ErrorEnvelope {
            success: false,
            error: "Cache expired or data not found".to_string(),
        })
        .into_response()),
    }
}

async fn repo_exists(
    State(state): State<AppState>,
    Query(query): Query<RepoQuery>,
) -> Result<Json<serde_json::Value>, DigestError> {
    let exists = state.service.exists(&query.owner, &query.repo).await?;
    Ok(Json(serde_json::json!({ "exists": exists })))
}

impl IntoResponse for DigestError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::RepoNotFound => StatusCode::NOT_FOUND,
            Self::RepoPrivateOrRateLimited => StatusCode::FORBIDDEN,
            Self::RepoTooLarge | Self::MissingParameters => StatusCode::BAD_REQUEST,
            Self::Processing(_) => {
                error!(error = %self, "request failed with processing error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorEnvelope {
            success: false,
            error: self.code(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::cache::DigestCache;
    use crate::error::Result as DigestResult;
    use crate::github::RepoProbe;
    use crate::ingest::Ingestor;
    use crate::types::{RepoDigest, RepoId};

    struct FixedProbe(bool);

    #[async_trait]
    impl RepoProbe for FixedProbe {
        async fn exists(&self, _repo_url: &str) -> bool {
            self.0
        }
    }

    struct FixedIngestor(DigestResult<RepoDigest>);

    #[async_trait]
    impl Ingestor for FixedIngestor {
        async fn ingest(&self, _repo_url: &str) -> DigestResult<RepoDigest> {
            self.0.clone()
        }
    }

    fn digest() -> RepoDigest {
        RepoDigest {
            summary: "Estimated tokens: 12K".to_string(),
            tree: "src/".to_string(),
            content: "fn main() {}".to_string(),
        }
    }

    fn app(dir: &TempDir, exists: bool, result: DigestResult<RepoDigest>) -> Router {
        let cache = DigestCache::new(dir.path().to_path_buf());
        let service = DigestService::new(
            cache,
            Arc::new(FixedProbe(exists)),
            Arc::new(FixedIngestor(result)),
        );
        router(AppState {
            service: Arc::new(service),
        })
    }

    async fn post_analyze(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/analyze-repo")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn analyze_returns_digest_envelope() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true, Ok(digest()));

        let (status, body) = post_analyze(app, r#"{"owner":"octocat","repo":"hello"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["tree"], "src/");
        assert!(body["data"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn legacy_field_names_still_work() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true, Ok(digest()));

        let (status, body) =
            post_analyze(app, r#"{"username":"octocat","repo":"hello","force":true}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn unknown_repo_maps_to_404_with_stable_code() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, false, Ok(digest()));

        let (status, body) = post_analyze(app, r#"{"owner":"octocat","repo":"gone"}"#).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "error:repo_not_found");
    }

    #[tokio::test]
    async fn blank_owner_maps_to_400() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true, Ok(digest()));

        let (status, body) = post_analyze(app, r#"{"owner":"","repo":"hello"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "error:missing_parameters");
    }

    #[tokio::test]
    async fn cache_only_route_reports_absence_without_failing() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true, Ok(digest()));

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/repo-data?owner=octocat&repo=hello")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn cache_only_route_serves_a_seeded_entry() {
        let dir = TempDir::new().unwrap();
        DigestCache::new(dir.path().to_path_buf())
            .put(&RepoId::new("octocat", "hello").unwrap(), &digest())
            .unwrap();
        let app = app(&dir, true, Ok(digest()));

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/repo-data?owner=octocat&repo=hello")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["content"], "fn main() {}");
    }

    #[test]
    fn error_status_mapping_is_stable() {
        let cases = [
            (DigestError::RepoNotFound, StatusCode::NOT_FOUND),
            (
                DigestError::RepoPrivateOrRateLimited,
                StatusCode::FORBIDDEN,
            ),
            (DigestError::RepoTooLarge, StatusCode::BAD_REQUEST),
            (DigestError::MissingParameters, StatusCode::BAD_REQUEST),
            (
                DigestError::Processing("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
