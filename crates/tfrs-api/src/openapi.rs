//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented routes into one spec served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TFRS Schedule C API",
        version = "0.1.0",
        description = "Schedule C (fuels used for other purposes) grid sections: mount, sync, edit and draft records.",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::reference_data::get_reference_data,
        crate::routes::schedules::mount_section,
        crate::routes::schedules::get_section,
        crate::routes::schedules::update_props,
        crate::routes::schedules::add_rows,
        crate::routes::schedules::change_cells,
        crate::routes::schedules::get_records,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::reference_data::ReferenceDataResponse,
        crate::routes::schedules::SheetResponse,
        crate::routes::schedules::MountResponse,
        crate::routes::schedules::AddRowsRequest,
        crate::routes::schedules::CellsRequest,
        crate::routes::schedules::EditResponse,
        crate::routes::schedules::RecordsResponse,
    )),
    tags(
        (name = "reference", description = "Approved fuels and expected uses"),
        (name = "schedule-c", description = "Schedule C sections"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — The generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_schedule_paths() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/v1/reference-data"));
        assert!(paths
            .iter()
            .any(|p| p.as_str() == "/v1/compliance-reports/{id}/schedule-c/cells"));
    }
}
