use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use docfinder_api::ApiResult;
use docfinder_core::AppointmentRequest;

use super::json_rejection;
use crate::intake;
use crate::server::AppState;

/// `POST /api/appointments/create/`
pub async fn create_appointment(
    State(state): State<AppState>,
    payload: Result<Json<AppointmentRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload.map_err(json_rejection)?;
    let created = intake::book(state.store.as_ref(), state.notifications.clone(), request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
