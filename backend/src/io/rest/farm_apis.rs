//! # REST API for Farms
//!
//! Insert and list, plus the only update and delete operations in the API.

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use shared::{AddFarmRequest, DeleteFarmRequest, UpdateFarmRequest};
use tracing::info;

use super::extract::{respond, respond_data, JsonBody};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/farms", get(list_farms))
        .route("/add-farm", post(add_farm))
        .route("/update-farms", post(update_farm))
        .route("/delete-farms", post(delete_farm))
}

pub async fn list_farms(State(state): State<AppState>) -> Response {
    info!("GET /farms");
    respond_data(state.farm_service.list_farms().await)
}

pub async fn add_farm(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddFarmRequest>,
) -> Response {
    info!("POST /add-farm - request: {:?}", request);
    respond(state.farm_service.add_farm(request).await)
}

pub async fn update_farm(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateFarmRequest>,
) -> Response {
    info!("POST /update-farms - request: {:?}", request);
    respond(state.farm_service.update_farm(request).await)
}

pub async fn delete_farm(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DeleteFarmRequest>,
) -> Response {
    info!("POST /delete-farms - request: {:?}", request);
    respond(state.farm_service.delete_farm(request).await)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get, post_json, test_app};
    use crate::storage::repositories::test_utils::seed_farm;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_farmer_message() {
        let (_db, app) = test_app().await;

        let (status, body) = post_json(
            &app,
            "/add-farm",
            json!({"farmID": 1, "name": "Sunfield", "location": "Langley", "farmerID": 9}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            json!("farmerID not recognized. Please provide a valid existing farmerID.")
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_flow() {
        let (db, app) = test_app().await;
        seed_farm(&db).await;

        let (status, body) = post_json(&app, "/update-farms", json!({"farmID": 101, "farmName": "", "location": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("Update fields are all blank. Please check and try again."));

        let (status, _) = post_json(&app, "/update-farms", json!({"farmID": "101", "farmName": "Blue Acres"})).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = get(&app, "/farms").await;
        assert_eq!(body["data"][0]["name"], json!("Blue Acres"));

        let (status, body) = post_json(&app, "/delete-farms", json!({"farmID": 101})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Cascade Delete successful!"));

        let (status, body) = post_json(&app, "/delete-farms", json!({"farmID": 101})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));

        let (_, body) = get(&app, "/fields").await;
        assert_eq!(body["data"], json!([]));
    }
}
