//! Professor API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, validate_color_code, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateProfessorRequest, Professor, ProfessorActionResponse, ProfessorId,
    ProfessorListResponse, UpdateProfessorRequest,
};
use crate::AppState;

/// GET /api/professors - List all professors with their cage counts.
pub async fn list_professors(State(state): State<AppState>) -> ApiResult<ProfessorListResponse> {
    let professors = state.repo.list_professors().await?;
    success(ProfessorListResponse { professors })
}

/// GET /api/professors/:id - Get a single professor.
pub async fn get_professor(
    State(state): State<AppState>,
    Path(id): Path<ProfessorId>,
) -> ApiResult<Professor> {
    match state.repo.get_professor(id).await? {
        Some(professor) => success(professor),
        None => Err(AppError::NotFound(format!("Professor {} not found", id))),
    }
}

/// POST /api/professors - Register a professor.
pub async fn create_professor(
    State(state): State<AppState>,
    Json(request): Json<CreateProfessorRequest>,
) -> ApiResult<ProfessorActionResponse> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Professor name is required".to_string()));
    }
    validate_color_code(&request.color_code)?;

    let professor = state.repo.create_professor(&request).await?;
    success(ProfessorActionResponse {
        success: true,
        message: format!("Professor '{}' registered", professor.name),
        professor: Some(professor),
    })
}

/// PUT /api/professors/:id - Update a professor.
pub async fn update_professor(
    State(state): State<AppState>,
    Path(id): Path<ProfessorId>,
    Json(request): Json<UpdateProfessorRequest>,
) -> ApiResult<ProfessorActionResponse> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Professor name is required".to_string()));
        }
    }
    if let Some(color_code) = &request.color_code {
        validate_color_code(color_code)?;
    }

    let professor = state.repo.update_professor(id, &request).await?;
    success(ProfessorActionResponse {
        success: true,
        message: format!("Professor '{}' updated", professor.name),
        professor: Some(professor),
    })
}

/// DELETE /api/professors/:id - Delete a professor with no assigned cages.
pub async fn delete_professor(
    State(state): State<AppState>,
    Path(id): Path<ProfessorId>,
) -> ApiResult<ProfessorActionResponse> {
    let professor = state.repo.delete_professor(id).await?;
    success(ProfessorActionResponse {
        success: true,
        message: format!("Professor '{}' deleted", professor.name),
        professor: None,
    })
}
