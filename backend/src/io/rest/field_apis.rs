//! # REST API for Fields
//!
//! Fields, the selection and projection searches over them, and the
//! irrigation, soil and moisture records kept per field.

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use shared::{AddFieldRequest, AddIrrigationRequest, AddMoistureRequest, AddSoilRecordRequest, SelectionRequest};
use tracing::info;

use super::extract::{respond, respond_data, JsonBody, QueryParams};
use crate::AppState;

/// Query string of `GET /projection`
#[derive(Deserialize, Debug)]
pub struct ProjectionQuery {
    pub display: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fields", get(list_fields))
        .route("/add-field", post(add_field))
        .route("/selection", post(select_fields))
        .route("/projection", get(project_fields))
        .route("/irrigation", get(list_irrigation))
        .route("/add-irrigation", post(add_irrigation))
        .route("/soilrecords", get(list_soil_records))
        .route("/add-soilrecord", post(add_soil_record))
        .route("/moisture", get(list_moisture))
        .route("/add-moisture", post(add_moisture))
}

pub async fn list_fields(State(state): State<AppState>) -> Response {
    info!("GET /fields");
    respond_data(state.field_service.list_fields().await)
}

pub async fn add_field(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddFieldRequest>,
) -> Response {
    info!("POST /add-field - request: {:?}", request);
    respond(state.field_service.add_field(request).await)
}

pub async fn select_fields(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SelectionRequest>,
) -> Response {
    info!("POST /selection - {} condition(s)", request.conditions.len());
    respond(state.field_service.select_fields(request).await)
}

pub async fn project_fields(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProjectionQuery>,
) -> Response {
    info!("GET /projection - query: {:?}", query);
    respond(state.field_service.project_fields(query.display.as_deref()).await)
}

pub async fn list_irrigation(State(state): State<AppState>) -> Response {
    info!("GET /irrigation");
    respond_data(state.field_service.list_irrigation().await)
}

pub async fn add_irrigation(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddIrrigationRequest>,
) -> Response {
    info!("POST /add-irrigation - request: {:?}", request);
    respond(state.field_service.add_irrigation(request).await)
}

pub async fn list_soil_records(State(state): State<AppState>) -> Response {
    info!("GET /soilrecords");
    respond_data(state.field_service.list_soil_records().await)
}

pub async fn add_soil_record(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddSoilRecordRequest>,
) -> Response {
    info!("POST /add-soilrecord - request: {:?}", request);
    respond(state.field_service.add_soil_record(request).await)
}

pub async fn list_moisture(State(state): State<AppState>) -> Response {
    info!("GET /moisture");
    respond_data(state.field_service.list_moisture().await)
}

pub async fn add_moisture(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddMoistureRequest>,
) -> Response {
    info!("POST /add-moisture - request: {:?}", request);
    respond(state.field_service.add_moisture(request).await)
}
