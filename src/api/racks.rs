//! Rack API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateRackRequest, Rack, RackActionResponse, RackId, RackListResponse, UpdateRackRequest,
};
use crate::AppState;

/// GET /api/racks - List all racks with their occupied cage counts.
pub async fn list_racks(State(state): State<AppState>) -> ApiResult<RackListResponse> {
    let racks = state.repo.list_racks().await?;
    success(RackListResponse { racks })
}

/// GET /api/racks/:id - Get a single rack.
pub async fn get_rack(State(state): State<AppState>, Path(id): Path<RackId>) -> ApiResult<Rack> {
    match state.repo.get_rack(id).await? {
        Some(rack) => success(rack),
        None => Err(AppError::NotFound(format!("Rack {} not found", id))),
    }
}

/// POST /api/racks - Create a rack and all of its cages.
pub async fn create_rack(
    State(state): State<AppState>,
    Json(request): Json<CreateRackRequest>,
) -> ApiResult<RackActionResponse> {
    // Validate required fields
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Rack name is required".to_string()));
    }

    let rack = state.repo.create_rack(&request).await?;
    success(RackActionResponse {
        success: true,
        message: format!("Rack '{}' created", rack.name),
        rack: Some(rack),
    })
}

/// PUT /api/racks/:id - Rename, reorder or resize a rack.
pub async fn update_rack(
    State(state): State<AppState>,
    Path(id): Path<RackId>,
    Json(request): Json<UpdateRackRequest>,
) -> ApiResult<RackActionResponse> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Rack name is required".to_string()));
        }
    }

    let rack = state.repo.update_rack(id, &request).await?;
    success(RackActionResponse {
        success: true,
        message: format!("Rack '{}' updated", rack.name),
        rack: Some(rack),
    })
}

/// DELETE /api/racks/:id - Delete a rack with no assigned cages.
pub async fn delete_rack(
    State(state): State<AppState>,
    Path(id): Path<RackId>,
) -> ApiResult<RackActionResponse> {
    let rack = state.repo.delete_rack(id).await?;
    success(RackActionResponse {
        success: true,
        message: format!("Rack '{}' deleted", rack.name),
        rack: None,
    })
}
