//! Operator endpoints: bulk import, column values, appointment listing and
//! doctor removal.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::StringRejection},
    response::IntoResponse,
};
use docfinder_api::{ApiError, ApiResult};
use docfinder_core::{Appointment, DoctorField};
use serde::Deserialize;
use serde_json::json;

use super::string_rejection;
use crate::import::{ImportError, ImportReport, import_csv};
use crate::server::AppState;

/// Cap on distinct values returned for one column.
pub const DISTINCT_VALUES_LIMIT: usize = 100;

/// `POST /api/admin/import/` with a `text/csv` body.
pub async fn import_doctors(
    State(state): State<AppState>,
    body: Result<String, StringRejection>,
) -> ApiResult<Json<ImportReport>> {
    let body = body.map_err(string_rejection)?;
    if body.trim().is_empty() {
        return Err(ApiError::bad_request("CSV body is empty"));
    }

    let report = import_csv(state.store.as_ref(), body.as_bytes())
        .await
        .map_err(|e| match e {
            ImportError::Storage(e) => e.into(),
            other => ApiError::bad_request(other.to_string()),
        })?;
    Ok(Json(report))
}

/// `GET /api/admin/filters/{field}/`: sorted distinct values of a column.
pub async fn distinct_values(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let field: DoctorField = field
        .parse()
        .map_err(|_| ApiError::not_found(format!("Unknown field: {field}")))?;
    let values = state
        .store
        .distinct_values(field, DISTINCT_VALUES_LIMIT)
        .await?;
    Ok(Json(values))
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentListParams {
    doctor: Option<String>,
}

/// `GET /api/admin/appointments/`, optionally `?doctor=<practitioner_id>`.
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(params): Query<AppointmentListParams>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let doctor = params.doctor.as_deref().map(str::trim).filter(|d| !d.is_empty());
    Ok(Json(state.store.list_appointments(doctor).await?))
}

/// `DELETE /api/admin/doctors/{practitioner_id}/`
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(practitioner_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let removed = state.store.delete_doctor(&practitioner_id).await?;
    tracing::info!(%practitioner_id, appointments_removed = removed, "doctor deleted");
    Ok(Json(json!({
        "deleted": practitioner_id,
        "appointments_deleted": removed,
    })))
}
