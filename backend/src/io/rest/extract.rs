//! Extractors and response helpers shared by every handler.

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{ApiResponse, DataResponse};

use crate::error::{FarmError, FarmResult};

/// JSON body whose rejection is reported in the `{success, message}` envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(FarmError))]
pub struct JsonBody<T>(pub T);

/// Query string whose rejection is reported in the `{success, message}` envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(FarmError))]
pub struct QueryParams<T>(pub T);

/// Render a write or report outcome. A search that finds nothing is still
/// answered with 200 and `success: false`; errors carry their own status.
pub fn respond<T: Serialize>(result: FarmResult<ApiResponse<T>>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Render a plain table fetch
pub fn respond_data<T: Serialize>(result: FarmResult<DataResponse<T>>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}
