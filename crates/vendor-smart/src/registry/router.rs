use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::catalog::{LocationId, ReferenceCatalog, ServiceId};

use super::domain::{JobDraft, JobId, Vendor};
use super::error::RegistryError;
use super::store::Registry;

/// Header carrying a human-readable reason on client errors.
pub const DETAILS_HEADER: &str = "details";

/// Router builder exposing the registry under `/vendor-smart`.
pub fn registry_router<C>(registry: Arc<Registry<C>>) -> Router
where
    C: ReferenceCatalog + 'static,
{
    Router::new()
        .route("/vendor-smart/locations", get(locations_handler::<C>))
        .route("/vendor-smart/services", get(services_handler::<C>))
        .route("/vendor-smart/jobs", post(create_job_handler::<C>))
        .route("/vendor-smart/vendors", post(create_vendor_handler::<C>))
        .route(
            "/vendor-smart/vendors-for-job",
            get(vendors_for_job_handler::<C>),
        )
        .route("/vendor-smart/reachable", get(reachable_handler::<C>))
        .with_state(registry)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VendorsForJobQuery {
    pub(crate) job_id: JobId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SlotQuery {
    pub(crate) location_id: LocationId,
    pub(crate) service_id: ServiceId,
}

pub(crate) async fn locations_handler<C>(State(registry): State<Arc<Registry<C>>>) -> Response
where
    C: ReferenceCatalog + 'static,
{
    Json(registry.locations()).into_response()
}

pub(crate) async fn services_handler<C>(State(registry): State<Arc<Registry<C>>>) -> Response
where
    C: ReferenceCatalog + 'static,
{
    Json(registry.services()).into_response()
}

pub(crate) async fn create_job_handler<C>(
    State(registry): State<Arc<Registry<C>>>,
    payload: Result<Json<JobDraft>, JsonRejection>,
) -> Response
where
    C: ReferenceCatalog + 'static,
{
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection_response(rejection),
    };

    match registry.register_job(draft) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(error) => {
            warn!(%error, "job registration rejected");
            registry_error_response(error)
        }
    }
}

pub(crate) async fn create_vendor_handler<C>(
    State(registry): State<Arc<Registry<C>>>,
    payload: Result<Json<Vendor>, JsonRejection>,
) -> Response
where
    C: ReferenceCatalog + 'static,
{
    let Json(vendor) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection_response(rejection),
    };

    match registry.register_vendor(vendor) {
        Ok(vendor) => (StatusCode::OK, Json(vendor)).into_response(),
        Err(error) => {
            warn!(%error, "vendor registration rejected");
            registry_error_response(error)
        }
    }
}

pub(crate) async fn vendors_for_job_handler<C>(
    State(registry): State<Arc<Registry<C>>>,
    query: Result<Query<VendorsForJobQuery>, QueryRejection>,
) -> Response
where
    C: ReferenceCatalog + 'static,
{
    let Query(VendorsForJobQuery { job_id }) = match query {
        Ok(query) => query,
        Err(rejection) => return rejected_payload(rejection.status(), rejection.body_text()),
    };

    match registry.vendors_for_job(job_id) {
        Some(vendors) => (StatusCode::OK, Json(vendors)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(DETAILS_HEADER, "No vendors found")],
            Json(json!({ "error": "No vendors found", "jobId": job_id })),
        )
            .into_response(),
    }
}

pub(crate) async fn reachable_handler<C>(
    State(registry): State<Arc<Registry<C>>>,
    query: Result<Query<SlotQuery>, QueryRejection>,
) -> Response
where
    C: ReferenceCatalog + 'static,
{
    let Query(SlotQuery {
        location_id,
        service_id,
    }) = match query {
        Ok(query) => query,
        Err(rejection) => return rejected_payload(rejection.status(), rejection.body_text()),
    };

    let reachable = registry.reachable(location_id, service_id);
    (StatusCode::OK, Json(json!({ "reachable": reachable }))).into_response()
}

fn registry_error_response(error: RegistryError) -> Response {
    let message = error.to_string();
    (
        StatusCode::BAD_REQUEST,
        [(DETAILS_HEADER, message.clone())],
        Json(json!({ "error": message })),
    )
        .into_response()
}

/// Well-formed JSON that does not fit the payload type is a bad request like any other
/// invalid input, rather than axum's default 422.
fn json_rejection_response(rejection: JsonRejection) -> Response {
    let status = match &rejection {
        JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
        _ => rejection.status(),
    };
    rejected_payload(status, rejection.body_text())
}

fn rejected_payload(status: StatusCode, message: String) -> Response {
    warn!(%status, %message, "malformed registry request");
    // Rejection text can contain characters a header value cannot carry.
    let details: String = message
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();
    (
        status,
        [(DETAILS_HEADER, details)],
        Json(json!({ "error": message })),
    )
        .into_response()
}
