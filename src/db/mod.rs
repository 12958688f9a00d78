//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for racks, professors, cages and assignment history.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS racks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            row_count INTEGER NOT NULL,
            column_count INTEGER NOT NULL,
            display_order INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS professors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            student_name TEXT,
            contact TEXT,
            color_code TEXT NOT NULL DEFAULT '#3B82F6'
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rack_id INTEGER NOT NULL REFERENCES racks(id) ON DELETE CASCADE,
            position TEXT NOT NULL,
            row_index INTEGER NOT NULL,
            col_index INTEGER NOT NULL,
            current_professor_id INTEGER REFERENCES professors(id),
            version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Assignment history outlives professors, so professor_id is not a foreign key
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cage_id INTEGER NOT NULL REFERENCES cages(id) ON DELETE CASCADE,
            professor_id INTEGER NOT NULL,
            assigned_date TEXT NOT NULL,
            assigned_at TEXT NOT NULL,
            released_at TEXT,
            cost INTEGER NOT NULL DEFAULT 800
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS ix_cages_rack_position ON cages(rack_id, row_index, col_index);
        CREATE INDEX IF NOT EXISTS ix_cages_professor ON cages(current_professor_id);
        CREATE INDEX IF NOT EXISTS ix_assignments_cage_date ON assignments(cage_id, assigned_date);
        CREATE INDEX IF NOT EXISTS ix_assignments_professor_date ON assignments(professor_id, assigned_date);
        CREATE INDEX IF NOT EXISTS ix_assignments_date ON assignments(assigned_date);
        CREATE INDEX IF NOT EXISTS ix_racks_display_order ON racks(display_order);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
