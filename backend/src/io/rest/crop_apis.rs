//! # REST API for Crops
//!
//! Crops and their lookup tables, categories, yields, pesticides and
//! treatments.

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use shared::{
    AddCropRequest, AddCropYieldRequest, AddFruitRequest, AddGrainRequest, AddPesticideRequest,
    AddTreatmentRequest, AddVegetableRequest,
};
use tracing::info;

use super::extract::{respond, respond_data, JsonBody};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/crops", get(list_crops))
        .route("/add-crop", post(add_crop))
        .route("/seasons", get(list_seasons))
        .route("/croptypes", get(list_crop_types))
        .route("/pesticides", get(list_pesticides))
        .route("/add-pesticide", post(add_pesticide))
        .route("/treatments", get(list_treatments))
        .route("/add-treatment", post(add_treatment))
        .route("/grains", get(list_grains))
        .route("/add-grain", post(add_grain))
        .route("/vegetables", get(list_vegetables))
        .route("/add-vegetable", post(add_vegetable))
        .route("/fruits", get(list_fruits))
        .route("/add-fruit", post(add_fruit))
        .route("/cropyields", get(list_crop_yields))
        .route("/add-cropyield", post(add_crop_yield))
}

pub async fn list_crops(State(state): State<AppState>) -> Response {
    info!("GET /crops");
    respond_data(state.crop_service.list_crops().await)
}

pub async fn add_crop(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddCropRequest>,
) -> Response {
    info!("POST /add-crop - request: {:?}", request);
    respond(state.crop_service.add_crop(request).await)
}

pub async fn list_seasons(State(state): State<AppState>) -> Response {
    info!("GET /seasons");
    respond_data(state.crop_service.list_seasons().await)
}

pub async fn list_crop_types(State(state): State<AppState>) -> Response {
    info!("GET /croptypes");
    respond_data(state.crop_service.list_crop_types().await)
}

pub async fn list_pesticides(State(state): State<AppState>) -> Response {
    info!("GET /pesticides");
    respond_data(state.crop_service.list_pesticides().await)
}

pub async fn add_pesticide(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddPesticideRequest>,
) -> Response {
    info!("POST /add-pesticide - request: {:?}", request);
    respond(state.crop_service.add_pesticide(request).await)
}

pub async fn list_treatments(State(state): State<AppState>) -> Response {
    info!("GET /treatments");
    respond_data(state.crop_service.list_treatments().await)
}

pub async fn add_treatment(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddTreatmentRequest>,
) -> Response {
    info!("POST /add-treatment - request: {:?}", request);
    respond(state.crop_service.add_treatment(request).await)
}

pub async fn list_grains(State(state): State<AppState>) -> Response {
    info!("GET /grains");
    respond_data(state.crop_service.list_grains().await)
}

pub async fn add_grain(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddGrainRequest>,
) -> Response {
    info!("POST /add-grain - request: {:?}", request);
    respond(state.crop_service.add_grain(request).await)
}

pub async fn list_vegetables(State(state): State<AppState>) -> Response {
    info!("GET /vegetables");
    respond_data(state.crop_service.list_vegetables().await)
}

pub async fn add_vegetable(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddVegetableRequest>,
) -> Response {
    info!("POST /add-vegetable - request: {:?}", request);
    respond(state.crop_service.add_vegetable(request).await)
}

pub async fn list_fruits(State(state): State<AppState>) -> Response {
    info!("GET /fruits");
    respond_data(state.crop_service.list_fruits().await)
}

pub async fn add_fruit(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddFruitRequest>,
) -> Response {
    info!("POST /add-fruit - request: {:?}", request);
    respond(state.crop_service.add_fruit(request).await)
}

pub async fn list_crop_yields(State(state): State<AppState>) -> Response {
    info!("GET /cropyields");
    respond_data(state.crop_service.list_crop_yields().await)
}

pub async fn add_crop_yield(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddCropYieldRequest>,
) -> Response {
    info!("POST /add-cropyield - request: {:?}", request);
    respond(state.crop_service.add_crop_yield(request).await)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get, post_json, test_app};
    use crate::storage::repositories::test_utils::seed_farm;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_crop_round_trip_over_http() {
        let (db, app) = test_app().await;
        seed_farm(&db).await;

        let crop = json!({
            "cropID": 1, "fieldID": 1001, "cropName": "Garlic",
            "plantDate": "2024-09-01", "harvestDate": "2025-06-30", "season": "Fall"
        });
        let (status, body) = post_json(&app, "/add-crop", crop).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Crop added successfully"));

        let (_, body) = get(&app, "/crops").await;
        assert_eq!(
            body["data"],
            json!([{
                "cropID": 1, "fieldID": 1001, "name": "Garlic",
                "plantingDate": "2024-09-01", "harvestDate": "2025-06-30"
            }])
        );

        let (status, _) = post_json(&app, "/add-vegetable", json!({"cropID": 1, "isLeafy": "0"})).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = get(&app, "/vegetables").await;
        assert_eq!(body["data"], json!([{"cropID": 1, "isLeafy": 0}]));
    }

    #[tokio::test]
    async fn test_harvest_before_planting_is_bad_request() {
        let (db, app) = test_app().await;
        seed_farm(&db).await;

        let crop = json!({
            "cropID": 1, "fieldID": 1001, "cropName": "Garlic",
            "plantDate": "2025-06-30", "harvestDate": "2024-09-01", "season": "Fall"
        });
        let (status, body) = post_json(&app, "/add-crop", crop).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("harvestDate must be after plantDate."));
        let (_, body) = get(&app, "/croptypes").await;
        assert_eq!(body["data"], json!([]));
    }
}
