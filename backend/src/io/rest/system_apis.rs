//! # REST API for Database Housekeeping

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::info;

use super::extract::respond;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check-db-connection", get(check_db_connection))
        .route("/initialize-farm-tables", post(initialize_farm_tables))
        .route("/populate-tables", post(populate_tables))
}

/// Plain-text connectivity check
pub async fn check_db_connection(State(state): State<AppState>) -> Response {
    info!("GET /check-db-connection");

    if state.system_service.check_connection().await {
        (StatusCode::OK, "connected").into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "unable to connect").into_response()
    }
}

/// Drop and recreate every table
pub async fn initialize_farm_tables(State(state): State<AppState>) -> Response {
    info!("POST /initialize-farm-tables");
    respond(state.system_service.initialize_tables().await)
}

/// Load the bundled sample data
pub async fn populate_tables(State(state): State<AppState>) -> Response {
    info!("POST /populate-tables");
    respond(state.system_service.populate_tables().await)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get, post_json, test_app};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_connection_check_is_plain_text() {
        let (_db, app) = test_app().await;

        let (status, body) = get(&app, "/check-db-connection").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("connected".to_string()));
    }

    #[tokio::test]
    async fn test_populate_then_fetch() {
        let (_db, app) = test_app().await;

        let (status, body) = post_json(&app, "/populate-tables", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        let (status, body) = get(&app, "/farms").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 5);

        let (status, body) = post_json(&app, "/populate-tables", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));

        let (status, _) = post_json(&app, "/initialize-farm-tables", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = get(&app, "/farms").await;
        assert_eq!(body["data"], json!([]));
    }
}
