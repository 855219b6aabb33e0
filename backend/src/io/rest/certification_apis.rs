//! # REST API for Certifications

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use shared::{AddCertificationRequest, AddReceivesRequest};
use tracing::info;

use super::extract::{respond, respond_data, JsonBody};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/certifications", get(list_certifications))
        .route("/add-certification", post(add_certification))
        .route("/awardexpiries", get(list_award_expiries))
        .route("/receives", get(list_receives))
        .route("/add-receives", post(add_receives))
}

pub async fn list_certifications(State(state): State<AppState>) -> Response {
    info!("GET /certifications");
    respond_data(state.certification_service.list_certifications().await)
}

pub async fn add_certification(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddCertificationRequest>,
) -> Response {
    info!("POST /add-certification - request: {:?}", request);
    respond(state.certification_service.add_certification(request).await)
}

pub async fn list_award_expiries(State(state): State<AppState>) -> Response {
    info!("GET /awardexpiries");
    respond_data(state.certification_service.list_award_expiries().await)
}

pub async fn list_receives(State(state): State<AppState>) -> Response {
    info!("GET /receives");
    respond_data(state.certification_service.list_receives().await)
}

pub async fn add_receives(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddReceivesRequest>,
) -> Response {
    info!("POST /add-receives - request: {:?}", request);
    respond(state.certification_service.add_receives(request).await)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get, post_json, test_app};
    use crate::storage::repositories::test_utils::seed_farm;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_certification_over_http() {
        let (db, app) = test_app().await;
        seed_farm(&db).await;

        let (status, _) = post_json(
            &app,
            "/add-certification",
            json!({"certID": 2, "name": "Fair Trade", "awardDate": "2024-02-01",
                   "expiryDate": "2027-02-01", "farmID": 101}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = get(&app, "/certifications").await;
        assert_eq!(
            body["data"],
            json!([{"certID": 2, "name": "Fair Trade", "awardedDate": "2024-02-01", "expiryDate": "2027-02-01"}])
        );
        let (_, body) = get(&app, "/receives").await;
        assert_eq!(body["data"], json!([{"farmID": 101, "certID": 2}]));
    }
}
