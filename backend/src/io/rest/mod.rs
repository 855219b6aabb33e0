//! # REST API Interface Layer
//!
//! One module per entity group, each contributing its routes to [`router`].
//! Paths keep the names the browser front-end already uses, at the root and
//! without a version prefix.

pub mod certification_apis;
pub mod crop_apis;
pub mod extract;
pub mod farm_apis;
pub mod farmer_apis;
pub mod field_apis;
pub mod report_apis;
pub mod system_apis;

use axum::Router;

use crate::AppState;

/// Every API route, still waiting for its state
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(system_apis::router())
        .merge(farmer_apis::router())
        .merge(farm_apis::router())
        .merge(field_apis::router())
        .merge(crop_apis::router())
        .merge(certification_apis::router())
        .merge(report_apis::router())
}

#[cfg(test)]
pub mod test_support {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::HttpConfig;
    use crate::storage::repositories::test_utils::setup_test_db;
    use crate::storage::DbConnection;
    use crate::{create_router, AppState};

    pub async fn test_app() -> (DbConnection, Router) {
        let db = setup_test_db().await;
        let app = create_router(AppState::new(db.clone()), &HttpConfig::default())
            .expect("router builds with default config");
        (db, app)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read failed");
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, json)
    }

    pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        send(app, request).await
    }

    pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(app, uri, &body.to_string()).await
    }

    pub async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }
}
