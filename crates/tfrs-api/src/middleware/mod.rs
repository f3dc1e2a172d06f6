//! # Middleware
//!
//! Request tracing for every route.

pub mod tracing_layer;
