//! # Reference Data API
//!
//! - `GET /v1/reference-data`: approved fuels and expected uses.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tfrs_core::{ApprovedFuel, ExpectedUse};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDataResponse {
    /// Approved fuels with their fuel classes and unit of measure.
    #[schema(value_type = Vec<Object>)]
    pub approved_fuels: Vec<ApprovedFuel>,
    #[schema(value_type = Vec<Object>)]
    pub expected_uses: Vec<ExpectedUse>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/reference-data", get(get_reference_data))
}

/// GET /v1/reference-data — Approved fuels and expected uses.
#[utoipa::path(
    get,
    path = "/v1/reference-data",
    responses(
        (status = 200, description = "Reference catalog", body = ReferenceDataResponse),
    ),
    tag = "reference"
)]
pub(crate) async fn get_reference_data(State(state): State<AppState>) -> Json<ReferenceDataResponse> {
    Json(ReferenceDataResponse {
        approved_fuels: state.catalog.reference.approved_fuels().to_vec(),
        expected_uses: state.catalog.expected_uses.clone(),
    })
}
