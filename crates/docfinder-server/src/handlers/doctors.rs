use axum::{
    Json,
    extract::{OriginalUri, Path, Query, RawQuery, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use docfinder_api::{ApiError, ApiResult};
use docfinder_core::{Doctor, DoctorRequest};
use docfinder_fhir::{FallbackHints, PractitionerOutcome, resolve};
use docfinder_search::{DoctorFilter, EngineError, Page, PageRequest, SearchEngine};
use docfinder_storage::StorageError;
use serde::Deserialize;

use super::{json_rejection, query_pairs, request_url};
use crate::metrics;
use crate::server::AppState;

const DUPLICATE_DOCTOR: &str = "doctor with this practitioner id already exists.";

/// `POST /api/create/`
pub async fn create_doctor(
    State(state): State<AppState>,
    payload: Result<Json<DoctorRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload.map_err(json_rejection)?;
    let doctor = request.validate()?;

    match state.store.create_doctor(doctor).await {
        Ok(created) => {
            tracing::info!(practitioner_id = %created.practitioner_id, "doctor created");
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(StorageError::AlreadyExists { .. }) => {
            Err(ApiError::field("practitioner_id", DUPLICATE_DOCTOR))
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /api/doctors/`: every doctor in name order, unpaginated.
pub async fn list_doctors(State(state): State<AppState>) -> ApiResult<Json<Vec<Doctor>>> {
    let doctors = SearchEngine::all(state.store.as_ref(), &DoctorFilter::default())
        .await
        .map_err(engine_error)?;
    Ok(Json(doctors))
}

/// `GET /api/doctors/filter/`
pub async fn filter_doctors(
    State(state): State<AppState>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Page<Doctor>>> {
    let pairs = query_pairs(query.as_deref());
    let borrowed = || pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()));

    let filter = DoctorFilter::from_pairs(borrowed());
    let page = PageRequest::from_pairs(borrowed(), &state.pagination)
        .map_err(|e| ApiError::not_found(e.to_string()))?;

    let result = SearchEngine::execute(state.store.as_ref(), &filter, page)
        .await
        .map_err(engine_error)?;
    let url = request_url(&state, &headers, &uri)?;
    Ok(Json(result.into_envelope(&url)))
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
    gender: Option<String>,
    specialization_code: Option<String>,
}

/// `GET /api/doctor/{practitioner_id}/`
///
/// 404 only when the doctor is unknown. A record that cannot be converted is
/// served as the sanitized fallback with 200.
pub async fn doctor_detail(
    State(state): State<AppState>,
    Path(practitioner_id): Path<String>,
    Query(params): Query<DetailParams>,
) -> ApiResult<Json<PractitionerOutcome>> {
    let doctor = state
        .store
        .get_doctor(&practitioner_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Doctor not found"))?;

    let hints = FallbackHints {
        gender: params.gender.filter(|g| !g.trim().is_empty()),
        specialization_code: params.specialization_code.filter(|c| !c.trim().is_empty()),
    };
    let outcome = resolve(&doctor, &hints);
    metrics::record_doctor_detail(outcome.label());

    Ok(Json(outcome))
}

fn engine_error(err: EngineError) -> ApiError {
    match err {
        EngineError::Pagination(e) => ApiError::not_found(e.to_string()),
        EngineError::Storage(e) => e.into(),
    }
}
