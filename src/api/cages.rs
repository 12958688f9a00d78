//! Cage grid and versioned assign/release endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    AssignRequest, CageActionResponse, CageId, GridSnapshot, RackId, ReleaseRequest,
};
use crate::AppState;

/// GET /api/cages/rack/:rack_id - Full cage grid of a rack.
pub async fn get_cage_grid(
    State(state): State<AppState>,
    Path(rack_id): Path<RackId>,
) -> ApiResult<GridSnapshot> {
    match state.repo.get_grid(rack_id).await? {
        Some(grid) => success(grid),
        None => Err(AppError::NotFound(format!("Rack {} not found", rack_id))),
    }
}

/// POST /api/cages/:id/assign - Assign a cage; 409 when `version` is stale.
pub async fn assign_cage(
    State(state): State<AppState>,
    Path(id): Path<CageId>,
    Json(request): Json<AssignRequest>,
) -> ApiResult<CageActionResponse> {
    let result = state
        .repo
        .assign_cage(id, request.professor_id, request.version)
        .await;

    match result {
        Ok((cage, professor)) => {
            tracing::info!(
                cage_id = id,
                professor_id = professor.id,
                version = cage.version,
                "cage assigned"
            );
            success(CageActionResponse {
                success: true,
                message: format!("Cage {} assigned to {}", cage.position, professor.name),
                cage,
            })
        }
        Err(e) => {
            if let AppError::Conflict {
                current_version, ..
            } = &e
            {
                tracing::info!(
                    cage_id = id,
                    sent_version = request.version,
                    current_version,
                    "assign rejected: stale version"
                );
            }
            Err(e)
        }
    }
}

/// POST /api/cages/:id/release - Release a cage; 409 when `version` is stale.
pub async fn release_cage(
    State(state): State<AppState>,
    Path(id): Path<CageId>,
    Json(request): Json<ReleaseRequest>,
) -> ApiResult<CageActionResponse> {
    let result = state.repo.release_cage(id, request.version).await;

    match result {
        Ok((cage, previous)) => {
            tracing::info!(
                cage_id = id,
                professor_id = previous.id,
                version = cage.version,
                "cage released"
            );
            success(CageActionResponse {
                success: true,
                message: format!(
                    "Cage {} released (was assigned to {})",
                    cage.position, previous.name
                ),
                cage,
            })
        }
        Err(e) => {
            if let AppError::Conflict {
                current_version, ..
            } = &e
            {
                tracing::info!(
                    cage_id = id,
                    sent_version = request.version,
                    current_version,
                    "release rejected: stale version"
                );
            }
            Err(e)
        }
    }
}
