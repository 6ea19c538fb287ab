//! Document API handlers
//!
//! Thin request/response mapping over `DocumentService`. Error kinds
//! become status codes here and nowhere else: 400 for caller errors,
//! 404 for absent ids, 504 for a write whose visibility timed out, 502
//! for store transport faults.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use docstore_common::{Document, DocumentFields, DocumentPatch, Error};
use docstore_index::DocumentIndex;
use docstore_service::DocumentService;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Application state shared across handlers
pub struct AppState<I> {
    pub service: DocumentService<I>,
}

/// Create request body. Fields are optional at the wire level so a
/// missing field is a local validation error (400), not a decode fault.
#[derive(Debug, Deserialize)]
struct CreateDocumentRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Service error wrapped for the HTTP boundary
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Build the document API router around a lifecycle service.
pub fn router<I>(service: DocumentService<I>) -> Router
where
    I: DocumentIndex + 'static,
{
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/health", get(health::<I>))
        .route(
            "/documents",
            get(list_documents::<I>).post(create_document::<I>),
        )
        .route(
            "/documents/{id}",
            get(get_document::<I>)
                .put(update_document::<I>)
                .delete(delete_document::<I>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health<I: DocumentIndex>(State(state): State<Arc<AppState<I>>>) -> StatusCode {
    if state.service.health().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn create_document<I: DocumentIndex>(
    State(state): State<Arc<AppState<I>>>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let fields = DocumentFields {
        name: request.name.unwrap_or_default(),
        email: request.email.unwrap_or_default(),
    };
    let doc = state.service.create(fields).await?;
    debug!(id = %doc.id, "created document");
    Ok((StatusCode::CREATED, Json(doc)))
}

async fn list_documents<I: DocumentIndex>(
    State(state): State<Arc<AppState<I>>>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let docs = state.service.search().await?;
    Ok(Json(docs))
}

async fn get_document<I: DocumentIndex>(
    State(state): State<Arc<AppState<I>>>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let doc = state.service.read(&id).await?;
    Ok(Json(doc))
}

async fn update_document<I: DocumentIndex>(
    State(state): State<Arc<AppState<I>>>,
    Path(id): Path<String>,
    Json(patch): Json<DocumentPatch>,
) -> Result<Json<Document>, ApiError> {
    let doc = state.service.update(&id, patch).await?;
    debug!(id = %doc.id, "updated document");
    Ok(Json(doc))
}

async fn delete_document<I: DocumentIndex>(
    State(state): State<Arc<AppState<I>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&id).await?;
    debug!(id = %id, "deleted document");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use docstore_index::MemoryIndex;
    use docstore_service::VisibilityPolicy;
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(index: MemoryIndex) -> Router {
        let policy = VisibilityPolicy::new(3, Duration::from_millis(1));
        router(DocumentService::new(index, policy))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_read_delete_scenario() {
        let app = app(MemoryIndex::new());

        // POST -> 201 with generated id
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/documents",
                serde_json::json!({"name": "Ann", "email": "ann@ex.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["name"], "Ann");
        assert_eq!(created["email"], "ann@ex.com");
        let id = created["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        // DELETE -> 204
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/documents/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // GET of the deleted id -> 404
        let response = app
            .oneshot(empty_request("GET", &format!("/documents/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_missing_field_is_400() {
        let app = app(MemoryIndex::new());
        let response = app
            .oneshot(json_request(
                "POST",
                "/documents",
                serde_json::json!({"name": "Ann"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "InvalidArgument");
    }

    #[tokio::test]
    async fn test_list_documents() {
        let app = app(MemoryIndex::new());
        for (name, email) in [("Ann", "ann@ex.com"), ("Bob", "bob@ex.com")] {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/documents",
                    serde_json::json!({"name": name, "email": email}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app.oneshot(empty_request("GET", "/documents")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let docs = body_json(response).await;
        assert_eq!(docs.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_partial_preserves_other_field() {
        let app = app(MemoryIndex::new());
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/documents",
                serde_json::json!({"name": "A", "email": "a@x.com"}),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/documents/{id}"),
                serde_json::json!({"name": "B"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["name"], "B");
        assert_eq!(updated["email"], "a@x.com");
    }

    #[tokio::test]
    async fn test_update_empty_patch_is_400() {
        let app = app(MemoryIndex::new());
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/documents",
                serde_json::json!({"name": "A", "email": "a@x.com"}),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/documents/{id}"),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "NoFieldsToUpdate");
    }

    #[tokio::test]
    async fn test_update_missing_id_is_404() {
        let app = app(MemoryIndex::new());
        let response = app
            .oneshot(json_request(
                "PUT",
                "/documents/missing",
                serde_json::json!({"name": "B"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_visibility_timeout_is_504() {
        // Lag beyond the 3-attempt re-read budget
        let app = app(MemoryIndex::with_visibility_lag(10));
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/documents",
                serde_json::json!({"name": "A", "email": "a@x.com"}),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/documents/{id}"),
                serde_json::json!({"name": "B"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body = body_json(response).await;
        assert_eq!(body["error"], "VisibilityTimeout");
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_404() {
        let app = app(MemoryIndex::new());
        let response = app
            .oneshot(empty_request("DELETE", "/documents/missing"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(MemoryIndex::new());
        let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
