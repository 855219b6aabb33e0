//! # REST API for Reports

use axum::{extract::State, response::Response, routing::get, Router};
use serde::Deserialize;
use shared::Scalar;
use tracing::info;

use super::extract::{respond, QueryParams};
use crate::AppState;

/// Query string of `GET /join-fc_table`
#[derive(Deserialize, Debug)]
pub struct FarmIdQuery {
    #[serde(rename = "farmID")]
    pub farm_id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/join-fc_table", get(join_farm_crops))
        .route("/average-irrigation", get(average_irrigation))
        .route("/healthy-field", get(healthy_fields))
        .route("/highest-moisture-f", get(highest_moisture_fields))
        .route("/all-pesticides", get(fields_using_all_pesticides))
}

pub async fn join_farm_crops(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<FarmIdQuery>,
) -> Response {
    info!("GET /join-fc_table - query: {:?}", query);
    let farm_id = query.farm_id.map(Scalar::Text);
    respond(state.report_service.farm_crops(farm_id.as_ref()).await)
}

pub async fn average_irrigation(State(state): State<AppState>) -> Response {
    info!("GET /average-irrigation");
    respond(state.report_service.average_irrigation().await)
}

pub async fn healthy_fields(State(state): State<AppState>) -> Response {
    info!("GET /healthy-field");
    respond(state.report_service.healthy_fields().await)
}

pub async fn highest_moisture_fields(State(state): State<AppState>) -> Response {
    info!("GET /highest-moisture-f");
    respond(state.report_service.highest_moisture_fields().await)
}

pub async fn fields_using_all_pesticides(State(state): State<AppState>) -> Response {
    info!("GET /all-pesticides");
    respond(state.report_service.fields_using_all_pesticides().await)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get, test_app};
    use crate::storage::repositories::test_utils::seed_sample_data;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_join_report() {
        let (db, app) = test_app().await;
        seed_sample_data(&db).await;

        let (status, body) = get(&app, "/join-fc_table?farmID=101").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!([{
                "farmID": 101, "farmerName": "Alice Moreau", "contactInfo": "alice@greenacres.com",
                "crops": ["Lettuce", "Strawberry", "Wheat"]
            }])
        );

        let (status, body) = get(&app, "/join-fc_table?farmID=404").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["message"], json!("No farm found for this FarmID. Please check and try again."));
    }

    #[tokio::test]
    async fn test_aggregate_reports() {
        let (db, app) = test_app().await;
        seed_sample_data(&db).await;

        let (_, body) = get(&app, "/highest-moisture-f").await;
        assert_eq!(body["data"], json!([{"fieldID": 1004}, {"fieldID": 1005}]));

        let (_, body) = get(&app, "/all-pesticides").await;
        assert_eq!(body["data"], json!([{"fieldID": 1001}]));

        let (_, body) = get(&app, "/average-irrigation").await;
        assert_eq!(body["data"][0], json!({"fieldID": 1001, "averageVolume": 135.0}));

        let (status, body) = get(&app, "/healthy-field").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 4);
    }
}
