//! View-facing adapter over the engine and coordinator.
//!
//! Turns the current snapshot into rows of cells in render order, maps a double
//! interaction on a cell to the dialog it should open, and turns write outcomes into
//! notices. Rendering itself belongs to whatever UI sits on top.

use std::sync::Arc;

use tokio::sync::watch;

use crate::client::{CageApi, ErrorKind, HttpCageClient};
use crate::config::Config;
use crate::coordinator::{WriteCoordinator, WriteOutcome};
use crate::models::{Cage, CageId, GridSnapshot, Professor, ProfessorId, RackId};
use crate::sync::{GridEngine, GridState, SyncConfig, SyncError};

/// Cages ordered for rendering: by row, then by column.
pub fn sorted_cages(cages: &[Cage]) -> Vec<&Cage> {
    let mut sorted: Vec<&Cage> = cages.iter().collect();
    sorted.sort_by_key(|c| (c.row_index, c.col_index));
    sorted
}

/// One rendered grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub rack_id: RackId,
    pub rack_name: String,
    pub columns: i64,
    /// Cells grouped by row, each row ordered by column
    pub rows: Vec<Vec<Cage>>,
}

impl GridLayout {
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Self {
        let mut rows: Vec<Vec<Cage>> = Vec::new();
        let mut current_row = None;
        for cage in sorted_cages(&snapshot.cages) {
            if current_row != Some(cage.row_index) {
                rows.push(Vec::new());
                current_row = Some(cage.row_index);
            }
            if let Some(row) = rows.last_mut() {
                row.push(cage.clone());
            }
        }

        Self {
            rack_id: snapshot.rack_id,
            rack_name: snapshot.rack_name.clone(),
            columns: snapshot.columns,
            rows,
        }
    }

    /// Cells in render order.
    pub fn cells(&self) -> impl Iterator<Item = &Cage> {
        self.rows.iter().flatten()
    }
}

/// Dialog to open after a double interaction on a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CageIntent {
    /// Vacant cage: pick a professor to assign
    OpenProfessorPicker { cage: Cage },
    /// Occupied cage: confirm releasing it from its holder
    ConfirmRelease { cage: Cage, professor_name: String },
}

pub fn intent_for(cage: &Cage) -> CageIntent {
    match &cage.current_professor {
        None => CageIntent::OpenProfessorPicker { cage: cage.clone() },
        Some(holder) => CageIntent::ConfirmRelease {
            cage: cage.clone(),
            professor_name: holder.name.clone(),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// User-facing message for the result of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Notice for a write on the cage at `position`.
    pub fn from_outcome(position: &str, outcome: &WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Applied(cage) => match &cage.current_professor {
                Some(holder) => Notice::new(
                    NoticeLevel::Success,
                    format!("Cage {} assigned to {}", position, holder.name),
                ),
                None => Notice::new(NoticeLevel::Success, format!("Cage {} released", position)),
            },
            WriteOutcome::Conflict(_) => Notice::new(
                NoticeLevel::Warning,
                format!(
                    "Cage {} was changed by someone else. The grid has been refreshed.",
                    position
                ),
            ),
            WriteOutcome::Failed(err) => match err.kind() {
                ErrorKind::Client | ErrorKind::Conflict => {
                    Notice::new(NoticeLevel::Error, err.message.clone())
                }
                ErrorKind::Transient => Notice::new(
                    NoticeLevel::Error,
                    "The server could not complete the request. Please try again.",
                ),
            },
        }
    }

    pub fn from_sync_error(err: &SyncError) -> Self {
        match err {
            SyncError::Load(_) => Notice::new(
                NoticeLevel::Error,
                "Failed to load racks and professors.",
            ),
            SyncError::Snapshot { .. } => {
                Notice::new(NoticeLevel::Error, "Failed to load the cage grid.")
            }
        }
    }
}

/// Routes user intents to the engine and coordinator.
pub struct Presenter {
    engine: Arc<GridEngine>,
    coordinator: WriteCoordinator,
}

impl Presenter {
    pub fn new(api: Arc<dyn CageApi>, config: SyncConfig) -> Self {
        let engine = GridEngine::new(api, config);
        let coordinator = WriteCoordinator::new(engine.clone());
        Self {
            engine,
            coordinator,
        }
    }

    /// Presenter talking HTTP to the backend named in `config`.
    pub fn connect(config: &Config) -> Self {
        let api = Arc::new(HttpCageClient::new(config.api_url.clone()));
        Self::new(api, config.sync_config())
    }

    pub fn engine(&self) -> &Arc<GridEngine> {
        &self.engine
    }

    pub fn coordinator(&self) -> &WriteCoordinator {
        &self.coordinator
    }

    pub fn subscribe(&self) -> watch::Receiver<GridState> {
        self.engine.subscribe()
    }

    /// Load the initial view. A failure here is a blocking error state.
    pub async fn start(&self) -> Result<(), Notice> {
        self.engine
            .initialize()
            .await
            .map_err(|e| Notice::from_sync_error(&e))
    }

    pub async fn select_rack(&self, rack_id: RackId) -> Option<Notice> {
        self.engine
            .select_rack(rack_id)
            .await
            .err()
            .map(|e| Notice::from_sync_error(&e))
    }

    /// Layout of the selected rack, if its grid has been loaded.
    pub fn layout(&self) -> Option<GridLayout> {
        self.engine
            .state()
            .current_snapshot()
            .map(GridLayout::from_snapshot)
    }

    pub fn professors(&self) -> Vec<Professor> {
        self.engine.state().professors
    }

    /// Double interaction on a cell of the current grid.
    pub fn activate(&self, cage_id: CageId) -> Option<CageIntent> {
        self.engine
            .state()
            .current_snapshot()
            .and_then(|s| s.cage(cage_id))
            .map(intent_for)
    }

    pub async fn request_assign(&self, cage: &Cage, professor_id: ProfessorId) -> Notice {
        let outcome = self.coordinator.assign_cage(cage, professor_id).await;
        Notice::from_outcome(&cage.position, &outcome)
    }

    pub async fn request_release(&self, cage: &Cage) -> Notice {
        let outcome = self.coordinator.release_cage(cage).await;
        Notice::from_outcome(&cage.position, &outcome)
    }
}
