//! # REST API for Farmers

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use shared::AddFarmerRequest;
use tracing::info;

use super::extract::{respond, respond_data, JsonBody};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/farmers", get(list_farmers))
        .route("/contactinfo", get(list_contact_info))
        .route("/add-farmer", post(add_farmer))
}

pub async fn list_farmers(State(state): State<AppState>) -> Response {
    info!("GET /farmers");
    respond_data(state.farmer_service.list_farmers().await)
}

pub async fn list_contact_info(State(state): State<AppState>) -> Response {
    info!("GET /contactinfo");
    respond_data(state.farmer_service.list_contact_info().await)
}

pub async fn add_farmer(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddFarmerRequest>,
) -> Response {
    info!("POST /add-farmer - request: {:?}", request);
    respond(state.farmer_service.add_farmer(request).await)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get, post_json, post_raw, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_farmer_accepts_string_ids() {
        let (_db, app) = test_app().await;

        let (status, body) = post_json(
            &app,
            "/add-farmer",
            json!({"farmerID": "7", "name": "Dana", "contactInfo": "dana@sunfield.ca"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "Farmer added successfully"}));

        let (_, body) = get(&app, "/farmers").await;
        assert_eq!(
            body["data"],
            json!([{"farmerID": 7, "contactInfo": "dana@sunfield.ca", "name": "Dana"}])
        );
    }

    #[tokio::test]
    async fn test_duplicate_farmer_is_bad_request() {
        let (_db, app) = test_app().await;
        let farmer = json!({"farmerID": 1, "name": "Eli", "contactInfo": "eli@orchardlane.com"});

        post_json(&app, "/add-farmer", farmer.clone()).await;
        let (status, body) = post_json(&app, "/add-farmer", farmer).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let (_db, app) = test_app().await;

        let (status, body) = post_raw(&app, "/add-farmer", "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
    }
}
