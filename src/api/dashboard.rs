//! Dashboard aggregate endpoints.

use axum::extract::{Query, State};
use chrono::Local;

use super::{success, ApiResult};
use crate::models::{
    CostQuery, DashboardCostsResponse, DashboardProfessorsResponse, DashboardSummaryResponse,
};
use crate::AppState;

/// GET /api/dashboard/summary - Rack usage overview.
pub async fn dashboard_summary(State(state): State<AppState>) -> ApiResult<DashboardSummaryResponse> {
    success(state.repo.dashboard_summary().await?)
}

/// GET /api/dashboard/professors - Cage counts per professor.
pub async fn dashboard_professors(
    State(state): State<AppState>,
) -> ApiResult<DashboardProfessorsResponse> {
    let professors = state.repo.professor_usage().await?;
    success(DashboardProfessorsResponse { professors })
}

/// GET /api/dashboard/costs?period=daily|weekly|monthly - Cage-day cost series.
pub async fn dashboard_costs(
    State(state): State<AppState>,
    Query(query): Query<CostQuery>,
) -> ApiResult<DashboardCostsResponse> {
    let today = Local::now().date_naive();
    success(state.repo.costs(query.period, today).await?)
}
