//! Rack model.

use serde::{Deserialize, Serialize};

use super::RackId;

/// Largest supported grid dimension (row letters run A..Z).
pub const MAX_GRID_DIMENSION: i64 = 26;

/// A fixed-size grid container of cages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    pub id: RackId,
    pub name: String,
    pub rows: i64,
    pub columns: i64,
    pub display_order: i64,
    /// Number of occupied cages in this rack
    #[serde(default)]
    pub assigned_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RackListResponse {
    pub racks: Vec<Rack>,
}

/// Request body for creating a new rack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRackRequest {
    pub name: String,
    pub rows: i64,
    pub columns: i64,
    #[serde(default)]
    pub display_order: i64,
}

/// Request body for updating an existing rack. Resizing adds or removes cages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRackRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rows: Option<i64>,
    #[serde(default)]
    pub columns: Option<i64>,
    #[serde(default)]
    pub display_order: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RackActionResponse {
    pub success: bool,
    pub message: String,
    pub rack: Option<Rack>,
}
