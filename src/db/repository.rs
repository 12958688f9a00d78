//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity. Cage writes are fenced by
//! the cage's version column: every mutation is a conditional `UPDATE ... WHERE version = ?`.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::errors::AppError;
use crate::models::{
    position_label, Cage, CageId, CostPeriod, CreateProfessorRequest, CreateRackRequest,
    DailyCost, DashboardCostsResponse, DashboardSummaryResponse, GridSnapshot, Professor,
    ProfessorCostSummary, ProfessorId, ProfessorInfo, ProfessorUsage, Rack, RackId, RackSummary,
    round_rate, row_label, UpdateProfessorRequest, UpdateRackRequest, COST_PER_CAGE_DAY,
    MAX_GRID_DIMENSION,
};

const RACK_COLUMNS: &str = r#"r.id, r.name, r.row_count, r.column_count, r.display_order,
    (SELECT COUNT(*) FROM cages c WHERE c.rack_id = r.id AND c.current_professor_id IS NOT NULL) AS assigned_count"#;

const PROFESSOR_COLUMNS: &str = r#"p.id, p.name, p.student_name, p.contact, p.color_code,
    (SELECT COUNT(*) FROM cages c WHERE c.current_professor_id = p.id) AS assigned_count"#;

const CAGE_SELECT: &str = r#"SELECT c.id, c.rack_id, c.position, c.row_index, c.col_index, c.version,
    p.id AS professor_id, p.name AS professor_name, p.color_code AS professor_color
    FROM cages c LEFT JOIN professors p ON p.id = c.current_professor_id"#;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== RACK OPERATIONS ====================

    /// List all racks ordered by display order.
    pub async fn list_racks(&self) -> Result<Vec<Rack>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM racks r ORDER BY r.display_order, r.id",
            RACK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(rack_from_row).collect())
    }

    /// Get a rack by ID.
    pub async fn get_rack(&self, id: RackId) -> Result<Option<Rack>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM racks r WHERE r.id = ?", RACK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(rack_from_row))
    }

    async fn rack_name_taken(&self, name: &str, except: Option<RackId>) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM racks WHERE name = ? AND id != ?")
            .bind(name)
            .bind(except.unwrap_or(-1))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n") > 0)
    }

    /// Create a new rack and populate every cage of its grid.
    pub async fn create_rack(&self, request: &CreateRackRequest) -> Result<Rack, AppError> {
        validate_dimension("rows", request.rows)?;
        validate_dimension("columns", request.columns)?;

        if self.rack_name_taken(&request.name, None).await? {
            return Err(AppError::Validation(format!(
                "A rack named '{}' already exists",
                request.name
            )));
        }

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO racks (name, row_count, column_count, display_order) VALUES (?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(request.rows)
        .bind(request.columns)
        .bind(request.display_order)
        .execute(&mut *tx)
        .await?;
        let rack_id = result.last_insert_rowid();

        insert_cages(&mut tx, rack_id, 0..request.rows, 0..request.columns).await?;
        tx.commit().await?;

        tracing::info!(rack_id, name = %request.name, "rack created");

        self.get_rack(rack_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Rack {} vanished after insert", rack_id)))
    }

    /// Update a rack. Growing adds vacant cages; shrinking is refused while a cage that
    /// would be removed is occupied.
    pub async fn update_rack(
        &self,
        id: RackId,
        request: &UpdateRackRequest,
    ) -> Result<Rack, AppError> {
        if let Some(rows) = request.rows {
            validate_dimension("rows", rows)?;
        }
        if let Some(columns) = request.columns {
            validate_dimension("columns", columns)?;
        }

        if let Some(name) = &request.name {
            if self.rack_name_taken(name, Some(id)).await? {
                return Err(AppError::Validation(format!(
                    "A rack named '{}' already exists",
                    name
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        // Take the write lock before reading occupancy so a concurrent assign cannot
        // invalidate this transaction's snapshot.
        let locked = sqlx::query("UPDATE racks SET display_order = display_order WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if locked.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Rack {} not found", id)));
        }

        let existing = sqlx::query(&format!("SELECT {} FROM racks r WHERE r.id = ?", RACK_COLUMNS))
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map(|row| rack_from_row(&row))?;

        let new_rows = request.rows.unwrap_or(existing.rows);
        let new_cols = request.columns.unwrap_or(existing.columns);
        let old_rows = existing.rows;
        let old_cols = existing.columns;

        if new_rows < old_rows {
            let occupied = sqlx::query(
                "SELECT COUNT(*) AS n FROM cages WHERE rack_id = ? AND row_index >= ? AND current_professor_id IS NOT NULL",
            )
            .bind(id)
            .bind(new_rows)
            .fetch_one(&mut *tx)
            .await?;
            if occupied.get::<i64, _>("n") > 0 {
                let removed: Vec<String> = (new_rows..old_rows).map(row_label).collect();
                return Err(AppError::BadRequest(format!(
                    "Rows {} contain assigned cages; release them before shrinking the rack",
                    removed.join(", ")
                )));
            }
        }

        if new_cols < old_cols {
            let occupied = sqlx::query(
                "SELECT COUNT(*) AS n FROM cages WHERE rack_id = ? AND col_index >= ? AND current_professor_id IS NOT NULL",
            )
            .bind(id)
            .bind(new_cols)
            .fetch_one(&mut *tx)
            .await?;
            if occupied.get::<i64, _>("n") > 0 {
                let removed: Vec<String> =
                    (new_cols..old_cols).map(|c| (c + 1).to_string()).collect();
                return Err(AppError::BadRequest(format!(
                    "Columns {} contain assigned cages; release them before shrinking the rack",
                    removed.join(", ")
                )));
            }
        }

        sqlx::query("DELETE FROM cages WHERE rack_id = ? AND (row_index >= ? OR col_index >= ?)")
            .bind(id)
            .bind(new_rows)
            .bind(new_cols)
            .execute(&mut *tx)
            .await?;

        if new_rows > old_rows {
            insert_cages(&mut tx, id, old_rows..new_rows, 0..new_cols).await?;
        }
        if new_cols > old_cols {
            insert_cages(&mut tx, id, 0..old_rows.min(new_rows), old_cols..new_cols).await?;
        }

        let name = request.name.as_ref().unwrap_or(&existing.name);
        let display_order = request.display_order.unwrap_or(existing.display_order);

        sqlx::query(
            "UPDATE racks SET name = ?, row_count = ?, column_count = ?, display_order = ? WHERE id = ?",
        )
        .bind(name)
        .bind(new_rows)
        .bind(new_cols)
        .bind(display_order)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if (new_rows, new_cols) != (old_rows, old_cols) {
            tracing::info!(
                rack_id = id,
                old_rows,
                old_cols,
                new_rows,
                new_cols,
                "rack resized"
            );
        }

        self.get_rack(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rack {} not found", id)))
    }

    /// Delete a rack. Only allowed while none of its cages is assigned.
    pub async fn delete_rack(&self, id: RackId) -> Result<Rack, AppError> {
        let rack = self
            .get_rack(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rack {} not found", id)))?;

        // The occupancy check and the delete are one statement, so an assign that
        // commits in between cannot have its cage cascaded away.
        let result = sqlx::query(
            r#"DELETE FROM racks WHERE id = ? AND NOT EXISTS (
                   SELECT 1 FROM cages WHERE rack_id = ? AND current_professor_id IS NOT NULL
               )"#,
        )
        .bind(id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_rack(id).await? {
                Some(_) => Err(AppError::BadRequest(
                    "Rack has assigned cages; release every cage before deleting it".to_string(),
                )),
                None => Err(AppError::NotFound(format!("Rack {} not found", id))),
            };
        }

        tracing::info!(rack_id = id, "rack deleted");
        Ok(rack)
    }

    // ==================== PROFESSOR OPERATIONS ====================

    /// List all professors ordered by name.
    pub async fn list_professors(&self) -> Result<Vec<Professor>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM professors p ORDER BY p.name",
            PROFESSOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(professor_from_row).collect())
    }

    /// Get a professor by ID.
    pub async fn get_professor(&self, id: ProfessorId) -> Result<Option<Professor>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM professors p WHERE p.id = ?",
            PROFESSOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(professor_from_row))
    }

    async fn professor_name_taken(
        &self,
        name: &str,
        except: Option<ProfessorId>,
    ) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM professors WHERE name = ? AND id != ?")
            .bind(name)
            .bind(except.unwrap_or(-1))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n") > 0)
    }

    /// Create a new professor.
    pub async fn create_professor(
        &self,
        request: &CreateProfessorRequest,
    ) -> Result<Professor, AppError> {
        if self.professor_name_taken(&request.name, None).await? {
            return Err(AppError::Validation(format!(
                "A professor named '{}' already exists",
                request.name
            )));
        }

        let result = sqlx::query(
            "INSERT INTO professors (name, student_name, contact, color_code) VALUES (?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&request.student_name)
        .bind(&request.contact)
        .bind(&request.color_code)
        .execute(&self.pool)
        .await?;

        Ok(Professor {
            id: result.last_insert_rowid(),
            name: request.name.clone(),
            student_name: request.student_name.clone(),
            contact: request.contact.clone(),
            color_code: request.color_code.clone(),
            assigned_count: 0,
        })
    }

    /// Update a professor. Absent fields keep their current value.
    pub async fn update_professor(
        &self,
        id: ProfessorId,
        request: &UpdateProfessorRequest,
    ) -> Result<Professor, AppError> {
        let existing = self
            .get_professor(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Professor {} not found", id)))?;

        if let Some(name) = &request.name {
            if self.professor_name_taken(name, Some(id)).await? {
                return Err(AppError::Validation(format!(
                    "A professor named '{}' already exists",
                    name
                )));
            }
        }

        let name = request.name.clone().unwrap_or(existing.name);
        let student_name = request.student_name.clone().or(existing.student_name);
        let contact = request.contact.clone().or(existing.contact);
        let color_code = request.color_code.clone().unwrap_or(existing.color_code);

        sqlx::query(
            "UPDATE professors SET name = ?, student_name = ?, contact = ?, color_code = ? WHERE id = ?",
        )
        .bind(&name)
        .bind(&student_name)
        .bind(&contact)
        .bind(&color_code)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Professor {
            id,
            name,
            student_name,
            contact,
            color_code,
            assigned_count: existing.assigned_count,
        })
    }

    /// Delete a professor. Only allowed while no cage references them.
    pub async fn delete_professor(&self, id: ProfessorId) -> Result<Professor, AppError> {
        let professor = self
            .get_professor(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Professor {} not found", id)))?;

        let result = sqlx::query(
            r#"DELETE FROM professors WHERE id = ? AND NOT EXISTS (
                   SELECT 1 FROM cages WHERE current_professor_id = ?
               )"#,
        )
        .bind(id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_professor(id).await? {
                Some(_) => Err(AppError::BadRequest(
                    "Professor still has assigned cages; release them before deleting".to_string(),
                )),
                None => Err(AppError::NotFound(format!("Professor {} not found", id))),
            };
        }

        Ok(professor)
    }

    // ==================== CAGE OPERATIONS ====================

    /// Get the full cage grid of a rack, ordered by row then column.
    pub async fn get_grid(&self, rack_id: RackId) -> Result<Option<GridSnapshot>, AppError> {
        let Some(rack) = self.get_rack(rack_id).await? else {
            return Ok(None);
        };

        let rows = sqlx::query(&format!(
            "{} WHERE c.rack_id = ? ORDER BY c.row_index, c.col_index",
            CAGE_SELECT
        ))
        .bind(rack_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(GridSnapshot {
            rack_id: rack.id,
            rack_name: rack.name,
            rows: rack.rows,
            columns: rack.columns,
            cages: rows.iter().map(cage_from_row).collect(),
        }))
    }

    /// Get a cage by ID.
    pub async fn get_cage(&self, id: CageId) -> Result<Option<Cage>, AppError> {
        let row = sqlx::query(&format!("{} WHERE c.id = ?", CAGE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(cage_from_row))
    }

    /// Assign a cage to a professor, fenced by the caller's expected version.
    pub async fn assign_cage(
        &self,
        id: CageId,
        professor_id: ProfessorId,
        expected_version: i64,
    ) -> Result<(Cage, Professor), AppError> {
        let existing = self
            .get_cage(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cage {} not found", id)))?;

        if existing.version != expected_version {
            return Err(AppError::version_mismatch(expected_version, existing.version));
        }

        let professor = self
            .get_professor(professor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Professor {} not found", professor_id)))?;

        if existing.current_professor.as_ref().map(|p| p.id) == Some(professor_id) {
            return Err(AppError::BadRequest(
                "Cage is already assigned to this professor".to_string(),
            ));
        }

        // The conditional write is the first statement so the transaction takes the write
        // lock before it reads anything.
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE cages SET current_professor_id = ?, version = version + 1 WHERE id = ? AND version = ?",
        )
        .bind(professor_id)
        .bind(id)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Version changed between read and write, or the rack went away
            return Err(stale_write(&mut tx, id, expected_version).await);
        }

        sqlx::query(
            "INSERT INTO assignments (cage_id, professor_id, assigned_date, assigned_at, cost) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(professor_id)
        .bind(Local::now().date_naive())
        .bind(Utc::now().to_rfc3339())
        .bind(COST_PER_CAGE_DAY)
        .execute(&mut *tx)
        .await?;

        let cage = fetch_cage_in(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cage {} not found", id)))?;
        tx.commit().await?;

        Ok((cage, professor))
    }

    /// Release a cage, fenced by the caller's expected version.
    ///
    /// Returns the updated cage and the professor it was released from.
    pub async fn release_cage(
        &self,
        id: CageId,
        expected_version: i64,
    ) -> Result<(Cage, ProfessorInfo), AppError> {
        let existing = self
            .get_cage(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cage {} not found", id)))?;

        if existing.version != expected_version {
            return Err(AppError::version_mismatch(expected_version, existing.version));
        }

        let previous = existing
            .current_professor
            .ok_or_else(|| AppError::BadRequest("Cage is not assigned".to_string()))?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE cages SET current_professor_id = NULL, version = version + 1 WHERE id = ? AND version = ?",
        )
        .bind(id)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(stale_write(&mut tx, id, expected_version).await);
        }

        sqlx::query(
            "UPDATE assignments SET released_at = ? WHERE cage_id = ? AND professor_id = ? AND released_at IS NULL",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(previous.id)
        .execute(&mut *tx)
        .await?;

        let cage = fetch_cage_in(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cage {} not found", id)))?;
        tx.commit().await?;

        Ok((cage, previous))
    }

    // ==================== DASHBOARD OPERATIONS ====================

    /// Per-rack and overall occupancy.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummaryResponse, AppError> {
        let racks = self.list_racks().await?;

        let mut total_cages = 0;
        let mut total_used = 0;
        let summaries: Vec<RackSummary> = racks
            .iter()
            .map(|rack| {
                let cage_count = rack.rows * rack.columns;
                total_cages += cage_count;
                total_used += rack.assigned_count;
                RackSummary {
                    rack_id: rack.id,
                    rack_name: rack.name.clone(),
                    total_cages: cage_count,
                    used_cages: rack.assigned_count,
                    available_cages: cage_count - rack.assigned_count,
                    usage_rate: round_rate(rack.assigned_count, cage_count),
                }
            })
            .collect();

        Ok(DashboardSummaryResponse {
            total_racks: racks.len() as i64,
            total_cages,
            total_used,
            total_available: total_cages - total_used,
            overall_usage_rate: round_rate(total_used, total_cages),
            racks: summaries,
        })
    }

    /// Current cage counts per professor, busiest first.
    pub async fn professor_usage(&self) -> Result<Vec<ProfessorUsage>, AppError> {
        let mut usages: Vec<ProfessorUsage> = self
            .list_professors()
            .await?
            .into_iter()
            .map(|p| ProfessorUsage {
                professor_id: p.id,
                professor_name: p.name,
                color_code: p.color_code,
                cage_count: p.assigned_count,
            })
            .collect();

        usages.sort_by(|a, b| {
            b.cage_count
                .cmp(&a.cage_count)
                .then_with(|| a.professor_name.cmp(&b.professor_name))
        });
        Ok(usages)
    }

    /// Cage-day costs for the window ending at `today`.
    pub async fn costs(
        &self,
        period: CostPeriod,
        today: NaiveDate,
    ) -> Result<DashboardCostsResponse, AppError> {
        let start_date = period.start_date(today);

        let rows = sqlx::query(
            r#"SELECT a.assigned_date, a.professor_id, p.name, p.color_code, COUNT(*) AS cage_count
               FROM assignments a JOIN professors p ON p.id = a.professor_id
               WHERE a.assigned_date >= ? AND a.assigned_date <= ?
               GROUP BY a.assigned_date, a.professor_id
               ORDER BY a.assigned_date, a.professor_id"#,
        )
        .bind(start_date)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        let daily_costs: Vec<DailyCost> = rows
            .iter()
            .map(|row| {
                let cage_count: i64 = row.get("cage_count");
                DailyCost {
                    date: row.get("assigned_date"),
                    professor_id: row.get("professor_id"),
                    professor_name: row.get("name"),
                    color_code: row.get("color_code"),
                    cage_count,
                    cost: cage_count * COST_PER_CAGE_DAY,
                }
            })
            .collect();

        let mut totals: HashMap<ProfessorId, ProfessorCostSummary> = HashMap::new();
        for day in &daily_costs {
            let entry = totals
                .entry(day.professor_id)
                .or_insert_with(|| ProfessorCostSummary {
                    professor_id: day.professor_id,
                    professor_name: day.professor_name.clone(),
                    color_code: day.color_code.clone(),
                    total_cage_days: 0,
                    total_cost: 0,
                });
            entry.total_cage_days += day.cage_count;
            entry.total_cost += day.cost;
        }

        let mut professor_summaries: Vec<ProfessorCostSummary> = totals.into_values().collect();
        professor_summaries.sort_by(|a, b| {
            b.total_cost
                .cmp(&a.total_cost)
                .then_with(|| a.professor_name.cmp(&b.professor_name))
        });

        Ok(DashboardCostsResponse {
            period,
            start_date,
            end_date: today,
            cost_per_cage_day: COST_PER_CAGE_DAY,
            total_cost: professor_summaries.iter().map(|s| s.total_cost).sum(),
            daily_costs,
            professor_summaries,
        })
    }
}

/// Error for a fenced cage write that matched no row.
async fn stale_write(
    tx: &mut Transaction<'_, Sqlite>,
    id: CageId,
    expected_version: i64,
) -> AppError {
    match fetch_cage_in(tx, id).await {
        Ok(Some(current)) => AppError::version_mismatch(expected_version, current.version),
        Ok(None) => AppError::NotFound(format!("Cage {} not found", id)),
        Err(e) => e,
    }
}

/// Check a rack grid dimension against the supported 1..=26 range.
fn validate_dimension(field: &str, value: i64) -> Result<(), AppError> {
    if !(1..=MAX_GRID_DIMENSION).contains(&value) {
        return Err(AppError::Validation(format!(
            "{} must be between 1 and {}",
            field, MAX_GRID_DIMENSION
        )));
    }
    Ok(())
}

/// Insert vacant cages for every (row, col) pair of the given ranges.
async fn insert_cages(
    tx: &mut Transaction<'_, Sqlite>,
    rack_id: RackId,
    rows: std::ops::Range<i64>,
    cols: std::ops::Range<i64>,
) -> Result<(), AppError> {
    for row in rows {
        for col in cols.clone() {
            sqlx::query(
                "INSERT INTO cages (rack_id, position, row_index, col_index, version) VALUES (?, ?, ?, ?, 1)",
            )
            .bind(rack_id)
            .bind(position_label(row, col))
            .bind(row)
            .bind(col)
            .execute(&mut **tx)
            .await?;
        }
    }
    Ok(())
}

async fn fetch_cage_in(
    tx: &mut Transaction<'_, Sqlite>,
    id: CageId,
) -> Result<Option<Cage>, AppError> {
    let row = sqlx::query(&format!("{} WHERE c.id = ?", CAGE_SELECT))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.as_ref().map(cage_from_row))
}

// ==================== ROW MAPPING HELPERS ====================

fn rack_from_row(row: &SqliteRow) -> Rack {
    Rack {
        id: row.get("id"),
        name: row.get("name"),
        rows: row.get("row_count"),
        columns: row.get("column_count"),
        display_order: row.get("display_order"),
        assigned_count: row.get("assigned_count"),
    }
}

fn professor_from_row(row: &SqliteRow) -> Professor {
    Professor {
        id: row.get("id"),
        name: row.get("name"),
        student_name: row.get("student_name"),
        contact: row.get("contact"),
        color_code: row.get("color_code"),
        assigned_count: row.get("assigned_count"),
    }
}

fn cage_from_row(row: &SqliteRow) -> Cage {
    let professor_id: Option<ProfessorId> = row.get("professor_id");
    Cage {
        id: row.get("id"),
        rack_id: row.get("rack_id"),
        position: row.get("position"),
        row_index: row.get("row_index"),
        col_index: row.get("col_index"),
        version: row.get("version"),
        current_professor: professor_id.map(|id| ProfessorInfo {
            id,
            name: row.get("professor_name"),
            color_code: row.get("professor_color"),
        }),
    }
}
