//! # Request/Response Tracing
//!
//! `tower_http::trace::TraceLayer` with one span per request carrying the
//! method, URI and status code.

use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;

pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
