//! # API Route Modules
//!
//! - `reference_data`: the approved fuels and expected uses sections are
//!   validated against.
//! - `schedules`: Schedule C section lifecycle per compliance report
//!   (mount, prop sync, row appends, cell edits, draft records).

pub mod reference_data;
pub mod schedules;
