//! Professor model.

use serde::{Deserialize, Serialize};

use super::ProfessorId;

/// Marker color used when a professor is created without one.
pub const DEFAULT_COLOR_CODE: &str = "#3B82F6";

/// A researcher who occupies cages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: ProfessorId,
    pub name: String,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    pub color_code: String,
    /// Number of cages currently referencing this professor
    #[serde(default)]
    pub assigned_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorListResponse {
    pub professors: Vec<Professor>,
}

/// Request body for creating a new professor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfessorRequest {
    pub name: String,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default = "default_color_code")]
    pub color_code: String,
}

fn default_color_code() -> String {
    DEFAULT_COLOR_CODE.to_string()
}

/// Request body for updating an existing professor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfessorRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub color_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorActionResponse {
    pub success: bool,
    pub message: String,
    pub professor: Option<Professor>,
}
