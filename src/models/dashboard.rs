//! Dashboard aggregate shapes: rack usage, professor usage and cost series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ProfessorId, RackId};

/// Billing rate for one cage occupied for one day (KRW).
pub const COST_PER_CAGE_DAY: i64 = 800;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RackSummary {
    pub rack_id: RackId,
    pub rack_name: String,
    pub total_cages: i64,
    pub used_cages: i64,
    pub available_cages: i64,
    pub usage_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummaryResponse {
    pub total_racks: i64,
    pub total_cages: i64,
    pub total_used: i64,
    pub total_available: i64,
    pub overall_usage_rate: f64,
    pub racks: Vec<RackSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorUsage {
    pub professor_id: ProfessorId,
    pub professor_name: String,
    pub color_code: String,
    pub cage_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardProfessorsResponse {
    pub professors: Vec<ProfessorUsage>,
}

/// Reporting window for the cost chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CostPeriod {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl CostPeriod {
    /// First day of the window ending at `today` (inclusive).
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        let days = match self {
            CostPeriod::Daily => 6,
            CostPeriod::Weekly => 28,
            CostPeriod::Monthly => 90,
        };
        today - chrono::Duration::days(days)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCost {
    pub date: NaiveDate,
    pub professor_id: ProfessorId,
    pub professor_name: String,
    pub color_code: String,
    pub cage_count: i64,
    pub cost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorCostSummary {
    pub professor_id: ProfessorId,
    pub professor_name: String,
    pub color_code: String,
    pub total_cage_days: i64,
    pub total_cost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardCostsResponse {
    pub period: CostPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cost_per_cage_day: i64,
    pub total_cost: i64,
    pub daily_costs: Vec<DailyCost>,
    pub professor_summaries: Vec<ProfessorCostSummary>,
}

/// Query string for `/dashboard/costs`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CostQuery {
    #[serde(default)]
    pub period: CostPeriod,
}

/// Round a percentage to one decimal place.
pub fn round_rate(used: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 1000.0).round() / 10.0
}
