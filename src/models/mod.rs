//! Data models for the cage management application.
//!
//! These shapes are shared by the reference backend and the sync client, so the JSON
//! produced by one side is exactly what the other side parses.

mod cage;
mod dashboard;
mod professor;
mod rack;

pub use cage::*;
pub use dashboard::*;
pub use professor::*;
pub use rack::*;

/// Server-assigned rack identifier.
pub type RackId = i64;
/// Server-assigned cage identifier.
pub type CageId = i64;
/// Server-assigned professor identifier.
pub type ProfessorId = i64;
