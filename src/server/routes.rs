//! HTTP routes for the configuration resource.
//!
//! - `GET /api/configuration` answers `200` with the full document.
//! - `PUT /api/configuration` merges the body into the document and answers
//!   `200` with an empty body, matching what the write queue expects.
//!
//! Bodies that are not JSON objects get `400`; persistence failures get
//! `500` (the in-memory document has already changed by then).

use crate::error::SyncError;
use crate::protocol::{decode_edit, encode_document, CONFIGURATION_PATH, JSON_CONTENT_TYPE};
use crate::server::store::ConfigurationStore;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the router serving `store`.
pub fn router(store: ConfigurationStore) -> Router {
    Router::new()
        .route(
            CONFIGURATION_PATH,
            get(get_configuration).put(update_configuration),
        )
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(store)
}

async fn get_configuration(
    State(store): State<ConfigurationStore>,
) -> Result<impl IntoResponse, SyncError> {
    let body = encode_document(&store.snapshot())?;
    Ok(([(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body))
}

async fn update_configuration(
    State(store): State<ConfigurationStore>,
    body: Bytes,
) -> Result<StatusCode, SyncError> {
    let edit = decode_edit(&body)?;
    store.apply(&edit).await?;
    Ok(StatusCode::OK)
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let status = match &self {
            SyncError::InvalidEdit(_)
            | SyncError::Json(_)
            | SyncError::MergeTypeMismatch { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Configuration request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Document;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    fn put(body: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(CONFIGURATION_PATH)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_document() {
        let store = ConfigurationStore::in_memory(json!({"limits": {"pan": [0, 1]}})).unwrap();
        let response = router(store)
            .oneshot(Request::get(CONFIGURATION_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document: Document = serde_json::from_slice(&body).unwrap();
        assert_eq!(document, json!({"limits": {"pan": [0, 1]}}));
    }

    #[tokio::test]
    async fn test_put_merges_edit() {
        let store = ConfigurationStore::default();
        let response = router(store.clone())
            .oneshot(put(r#"{"tracking": {"color": {"min_hsv": [1, 2, 3]}}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let snapshot = store.snapshot();
        assert_eq!(snapshot["tracking"]["color"]["min_hsv"], json!([1, 2, 3]));
        assert_eq!(snapshot["tracking"]["color"]["max_hsv"], json!([100, 255, 255]));
    }

    #[tokio::test]
    async fn test_put_non_object_is_bad_request() {
        let store = ConfigurationStore::default();
        let before = store.snapshot();
        let response = router(store.clone()).oneshot(put("[1, 2, 3]")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router(store.clone()).oneshot(put("{oops")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_put_ignores_denylisted_keys() {
        let store = ConfigurationStore::in_memory(json!({})).unwrap();
        let response = router(store.clone())
            .oneshot(put(r#"{"__proto__": {"polluted": true}, "safe": 1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.snapshot(), json!({"safe": 1}));
    }

    #[tokio::test]
    async fn test_get_default_store_serves_limits() {
        let response = router(ConfigurationStore::default())
            .oneshot(Request::get(CONFIGURATION_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document: Document = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            document["limits"],
            json!({"areLimitsAppliedInManualMode": false, "pan": null, "tilt": null})
        );
    }
}
