pub mod admin;
pub mod appointments;
pub mod doctors;

use axum::{
    Json,
    extract::{OriginalUri, State, rejection::JsonRejection, rejection::StringRejection},
    http::{HeaderMap, StatusCode, Uri, header},
    response::IntoResponse,
};
use docfinder_api::{ApiError, ApiResult};
use serde::Serialize;
use serde_json::json;
use url::Url;

use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "DocFinder API",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "api": "/api/",
            "create_doctor": "/api/create/",
            "doctors": "/api/doctors/",
            "filter_doctors": "/api/doctors/filter/",
            "doctor_detail": "/api/doctor/{practitioner_id}/",
            "create_appointment": "/api/appointments/create/",
            "metrics": "/metrics",
        },
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}

pub async fn metrics() -> impl IntoResponse {
    match crate::metrics::render_metrics() {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "metrics not initialized".to_string(),
        ),
    }
}

/// `GET /api/`
pub async fn api_root(
    State(state): State<AppState>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<impl IntoResponse> {
    let base = request_url(&state, &headers, &uri)?;
    let link = |path: &str| base.join(path).map(String::from);
    let body = json!({
        "create": link("/api/create/").map_err(|e| ApiError::internal(e.to_string()))?,
        "filter": link("/api/doctors/filter/").map_err(|e| ApiError::internal(e.to_string()))?,
    });
    Ok(Json(body))
}

/// Absolute URL of the current request.
///
/// The configured base URL wins; otherwise the `Host` header is used.
pub(crate) fn request_url(state: &AppState, headers: &HeaderMap, uri: &Uri) -> ApiResult<Url> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let base = match &state.base_url {
        Some(base) => base.clone(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");
            Url::parse(&format!("http://{host}/"))
                .map_err(|_| ApiError::bad_request("Invalid Host header"))?
        }
    };
    base.join(path_and_query)
        .map_err(|e| ApiError::bad_request(format!("Invalid request URL: {e}")))
}

pub(crate) fn json_rejection(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Payload too large".into())
    } else {
        ApiError::bad_request(rejection.body_text())
    }
}

pub(crate) fn string_rejection(rejection: StringRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Payload too large".into())
    } else {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Query string as owned key/value pairs, in request order.
pub(crate) fn query_pairs(query: Option<&str>) -> Vec<(String, String)> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}
