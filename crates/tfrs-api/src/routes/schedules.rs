//! # Schedule C API
//!
//! One Schedule C section per compliance report, kept in memory.
//!
//! ## Endpoints
//!
//! - `POST /v1/compliance-reports/{id}/schedule-c`: mount a section
//! - `GET  /v1/compliance-reports/{id}/schedule-c`: sheet view and draft
//! - `PUT  /v1/compliance-reports/{id}/schedule-c/props`: push new props
//! - `POST /v1/compliance-reports/{id}/schedule-c/rows`: append blank rows
//! - `POST /v1/compliance-reports/{id}/schedule-c/cells`: apply cell edits
//! - `GET  /v1/compliance-reports/{id}/schedule-c/records`: draft records
//!
//! Each request touches one section under a single write lock.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tfrs_core::ComplianceReportId;
use tfrs_schedules::{
    CellChange, EditOutcome, ExpectedUsesLoader, InMemoryScheduleStore, MountKind,
    RenderedSheet, ScheduleCRecord, ScheduleCSection, SectionProps,
};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::{AppState, SheetSession};

// ─── Request / Response types ───────────────────────────────────────

/// Sheet view plus the records held by the draft store.
#[derive(Debug, Serialize, ToSchema)]
pub struct SheetResponse {
    #[schema(value_type = Object)]
    pub sheet: RenderedSheet,
    #[schema(value_type = Vec<Object>)]
    pub records: Vec<ScheduleCRecord>,
}

impl SheetResponse {
    fn of(session: &SheetSession) -> Self {
        Self {
            sheet: session.section.render(),
            records: session.draft_records(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MountResponse {
    /// `existing`, `blank_rows` or `initial_state`.
    #[schema(value_type = String)]
    pub mounted: MountKind,
    #[serde(flatten)]
    pub view: SheetResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddRowsRequest {
    /// Number of blank rows to append.
    pub count: usize,
}

impl Validate for AddRowsRequest {
    fn validate(&self) -> Result<(), String> {
        if self.count == 0 {
            return Err("count must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CellsRequest {
    /// Edits in the order they were made. `row` counts the two header rows.
    #[schema(value_type = Vec<Object>)]
    pub changes: Vec<CellChange>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EditResponse {
    #[schema(value_type = Object)]
    pub outcome: EditOutcome,
    #[schema(value_type = Object)]
    pub sheet: RenderedSheet,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordsResponse {
    #[schema(value_type = Vec<Object>)]
    pub records: Vec<ScheduleCRecord>,
}

// ─── Router ─────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/compliance-reports/{id}/schedule-c",
            post(mount_section).get(get_section),
        )
        .route("/v1/compliance-reports/{id}/schedule-c/props", put(update_props))
        .route("/v1/compliance-reports/{id}/schedule-c/rows", post(add_rows))
        .route("/v1/compliance-reports/{id}/schedule-c/cells", post(change_cells))
        .route("/v1/compliance-reports/{id}/schedule-c/records", get(get_records))
}

fn not_mounted(id: ComplianceReportId) -> AppError {
    AppError::NotFound(format!("no schedule C section mounted for {id}"))
}

/// Tie the props to the report in the path.
fn bind_report(id: ComplianceReportId, props: &mut SectionProps) -> Result<(), AppError> {
    match props.compliance_report.id {
        Some(other) if other != id => Err(AppError::Validation(format!(
            "body names {other} but the path names {id}"
        ))),
        _ => {
            props.compliance_report.id = Some(id);
            Ok(())
        }
    }
}

// ─── Handlers ───────────────────────────────────────────────────────

/// POST /v1/compliance-reports/{id}/schedule-c — Mount a section.
#[utoipa::path(
    post,
    path = "/v1/compliance-reports/{id}/schedule-c",
    params(("id" = u64, Path, description = "Compliance report id")),
    request_body(content = Object, description = "Section props"),
    responses(
        (status = 201, description = "Section mounted", body = MountResponse),
        (status = 400, description = "Malformed props", body = crate::error::ErrorBody),
        (status = 409, description = "Section already mounted", body = crate::error::ErrorBody),
    ),
    tag = "schedule-c"
)]
pub(crate) async fn mount_section(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Result<Json<SectionProps>, JsonRejection>,
) -> Result<(StatusCode, Json<MountResponse>), AppError> {
    let id = ComplianceReportId(id);
    let mut props = extract_json(body)?;
    bind_report(id, &mut props)?;

    if state.sections.contains(&id) {
        return Err(AppError::Conflict(format!("schedule C for {id} is already mounted")));
    }

    let mut session = SheetSession {
        section: ScheduleCSection::new(state.reference.clone(), props),
        store: InMemoryScheduleStore::new(),
        expected_uses: state.expected_uses_loader(),
    };
    let mounted = session
        .section
        .mount(&mut session.store, &mut session.expected_uses);
    let view = SheetResponse::of(&session);

    state
        .sections
        .try_insert(id, session)
        .map_err(|_| AppError::Conflict(format!("schedule C for {id} is already mounted")))?;
    Ok((StatusCode::CREATED, Json(MountResponse { mounted, view })))
}

/// GET /v1/compliance-reports/{id}/schedule-c — Sheet view and draft.
#[utoipa::path(
    get,
    path = "/v1/compliance-reports/{id}/schedule-c",
    params(("id" = u64, Path, description = "Compliance report id")),
    responses(
        (status = 200, description = "Current sheet", body = SheetResponse),
        (status = 404, description = "No section mounted", body = crate::error::ErrorBody),
    ),
    tag = "schedule-c"
)]
pub(crate) async fn get_section(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<SheetResponse>, AppError> {
    let id = ComplianceReportId(id);
    state
        .sections
        .read(&id, SheetResponse::of)
        .map(Json)
        .ok_or_else(|| not_mounted(id))
}

/// PUT /v1/compliance-reports/{id}/schedule-c/props — Push new props.
#[utoipa::path(
    put,
    path = "/v1/compliance-reports/{id}/schedule-c/props",
    params(("id" = u64, Path, description = "Compliance report id")),
    request_body(content = Object, description = "Section props"),
    responses(
        (status = 200, description = "Sheet after sync", body = SheetResponse),
        (status = 400, description = "Malformed props", body = crate::error::ErrorBody),
        (status = 404, description = "No section mounted", body = crate::error::ErrorBody),
    ),
    tag = "schedule-c"
)]
pub(crate) async fn update_props(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Result<Json<SectionProps>, JsonRejection>,
) -> Result<Json<SheetResponse>, AppError> {
    let id = ComplianceReportId(id);
    let mut props = extract_json(body)?;
    bind_report(id, &mut props)?;

    let result = state.sections.try_update(&id, |session| {
        session.section.receive_props(props, &session.store);
        Ok::<_, AppError>(SheetResponse::of(session))
    });
    result.ok_or_else(|| not_mounted(id))?.map(Json)
}

/// POST /v1/compliance-reports/{id}/schedule-c/rows — Append blank rows.
#[utoipa::path(
    post,
    path = "/v1/compliance-reports/{id}/schedule-c/rows",
    params(("id" = u64, Path, description = "Compliance report id")),
    request_body = AddRowsRequest,
    responses(
        (status = 200, description = "Sheet with the new rows", body = SheetResponse),
        (status = 404, description = "No section mounted", body = crate::error::ErrorBody),
        (status = 409, description = "Section is read-only", body = crate::error::ErrorBody),
        (status = 422, description = "Row count out of range", body = crate::error::ErrorBody),
    ),
    tag = "schedule-c"
)]
pub(crate) async fn add_rows(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Result<Json<AddRowsRequest>, JsonRejection>,
) -> Result<Json<SheetResponse>, AppError> {
    let id = ComplianceReportId(id);
    let req = extract_validated_json(body)?;
    let max = state.config.max_rows_per_request;
    if req.count > max {
        return Err(AppError::Validation(format!(
            "count must be at most {max}, got {}",
            req.count
        )));
    }

    let result = state.sections.try_update(&id, |session| {
        if !session.section.add_row_enabled() {
            return Err(AppError::Conflict(format!("schedule C for {id} is read-only")));
        }
        session.section.add_rows(req.count);
        Ok(SheetResponse::of(session))
    });
    result.ok_or_else(|| not_mounted(id))?.map(Json)
}

/// POST /v1/compliance-reports/{id}/schedule-c/cells — Apply cell edits.
#[utoipa::path(
    post,
    path = "/v1/compliance-reports/{id}/schedule-c/cells",
    params(("id" = u64, Path, description = "Compliance report id")),
    request_body = CellsRequest,
    responses(
        (status = 200, description = "Edit outcome and sheet", body = EditResponse),
        (status = 400, description = "Malformed edits", body = crate::error::ErrorBody),
        (status = 404, description = "No section mounted", body = crate::error::ErrorBody),
    ),
    tag = "schedule-c"
)]
pub(crate) async fn change_cells(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Result<Json<CellsRequest>, JsonRejection>,
) -> Result<Json<EditResponse>, AppError> {
    let id = ComplianceReportId(id);
    let req = extract_json(body)?;

    let result = state.sections.try_update(&id, |session| {
        let SheetSession {
            section,
            store,
            expected_uses,
        } = session;
        let outcome = section.handle_cells_changed(&req.changes, store, expected_uses.expected_uses());
        Ok::<_, AppError>(EditResponse {
            outcome,
            sheet: section.render(),
        })
    });
    let response = result.ok_or_else(|| not_mounted(id))??;
    tracing::info!(
        report = %id,
        applied = response.outcome.applied,
        skipped = response.outcome.skipped.len(),
        "applied schedule C edits"
    );
    Ok(Json(response))
}

/// GET /v1/compliance-reports/{id}/schedule-c/records — Draft records.
#[utoipa::path(
    get,
    path = "/v1/compliance-reports/{id}/schedule-c/records",
    params(("id" = u64, Path, description = "Compliance report id")),
    responses(
        (status = 200, description = "Draft records", body = RecordsResponse),
        (status = 404, description = "No section mounted", body = crate::error::ErrorBody),
    ),
    tag = "schedule-c"
)]
pub(crate) async fn get_records(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<RecordsResponse>, AppError> {
    let id = ComplianceReportId(id);
    state
        .sections
        .read(&id, |session| RecordsResponse {
            records: session.draft_records(),
        })
        .map(Json)
        .ok_or_else(|| not_mounted(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rows_requires_a_positive_count() {
        assert!(AddRowsRequest { count: 0 }.validate().is_err());
        assert!(AddRowsRequest { count: 1 }.validate().is_ok());
    }

    #[test]
    fn bind_report_fills_or_checks_the_id() {
        let mut props = SectionProps::default();
        bind_report(ComplianceReportId(4), &mut props).unwrap();
        assert_eq!(props.compliance_report.id, Some(ComplianceReportId(4)));
        assert!(matches!(
            bind_report(ComplianceReportId(5), &mut props),
            Err(AppError::Validation(_))
        ));
    }
}
