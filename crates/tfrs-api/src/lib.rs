//! # tfrs-api — Schedule C Sections over HTTP
//!
//! Hosts Schedule C sections for compliance reports. A client mounts a
//! section with the props a report page would pass down, pushes prop
//! changes (draft records, validation round-trips, snapshots) and cell
//! edits, and reads back the rendered sheet and the draft records.
//!
//! ## API Surface
//!
//! | Prefix | Module | Domain |
//! |--------|--------|--------|
//! | `/v1/reference-data` | [`routes::reference_data`] | Approved fuels, expected uses |
//! | `/v1/compliance-reports/{id}/schedule-c*` | [`routes::schedules`] | Schedule C sections |
//! | `/openapi.json` | [`openapi`] | Generated spec |
//! | `/health/*` | this module | Probes |
//!
//! ## Middleware
//!
//! ```text
//! TraceLayer → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::reference_data::router())
        .merge(routes::schedules::router())
        .merge(openapi::router())
        .layer(middleware::tracing_layer::layer())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once state is built.
async fn readiness() -> &'static str {
    "ready"
}
