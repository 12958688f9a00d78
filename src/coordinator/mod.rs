//! Optimistic write coordinator.
//!
//! Assign and release requests carry the version of the cage the caller last saw. The
//! backend either applies the write and returns the updated cage, which is merged into the
//! engine's snapshot by id, or rejects it as stale. A rejected writer is never retried; the
//! engine is reconciled once so the caller sees who won.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::client::{CageApi, ClientError};
use crate::models::{Cage, CageId, ProfessorId};
use crate::sync::GridEngine;

/// Result of a single write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The backend accepted the write; carries the cage it returned
    Applied(Cage),
    /// Another actor changed the cage first; the engine has been reconciled
    Conflict(ClientError),
    /// Any other failure; nothing was changed locally
    Failed(ClientError),
}

impl WriteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied(_))
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            WriteOutcome::Applied(_) => None,
            WriteOutcome::Conflict(err) | WriteOutcome::Failed(err) => Some(err),
        }
    }
}

/// Per-cage interaction state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteState {
    #[default]
    Idle,
    Pending,
    Applied,
    Conflicted,
    Failed,
}

impl From<&WriteOutcome> for WriteState {
    fn from(outcome: &WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Applied(_) => WriteState::Applied,
            WriteOutcome::Conflict(_) => WriteState::Conflicted,
            WriteOutcome::Failed(_) => WriteState::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum WriteOp {
    Assign(ProfessorId),
    Release,
}

impl WriteOp {
    fn name(self) -> &'static str {
        match self {
            WriteOp::Assign(_) => "assign",
            WriteOp::Release => "release",
        }
    }
}

/// Sends version-fenced cage writes and folds their results into the [`GridEngine`].
pub struct WriteCoordinator {
    engine: Arc<GridEngine>,
    api: Arc<dyn CageApi>,
    states: Mutex<HashMap<CageId, WriteState>>,
}

impl WriteCoordinator {
    /// Coordinator writing through the engine's own client.
    pub fn new(engine: Arc<GridEngine>) -> Self {
        let api = engine.api();
        Self {
            engine,
            api,
            states: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &Arc<GridEngine> {
        &self.engine
    }

    /// Assign `cage` to a professor using the version held in `cage`.
    pub async fn assign_cage(&self, cage: &Cage, professor_id: ProfessorId) -> WriteOutcome {
        self.write(cage, WriteOp::Assign(professor_id)).await
    }

    /// Release `cage` using the version held in `cage`.
    pub async fn release_cage(&self, cage: &Cage) -> WriteOutcome {
        self.write(cage, WriteOp::Release).await
    }

    pub fn write_state(&self, cage_id: CageId) -> WriteState {
        self.states().get(&cage_id).copied().unwrap_or_default()
    }

    async fn write(&self, cage: &Cage, op: WriteOp) -> WriteOutcome {
        self.set_state(cage.id, WriteState::Pending);

        let result = match op {
            WriteOp::Assign(professor_id) => {
                self.api.assign(cage.id, professor_id, cage.version).await
            }
            WriteOp::Release => self.api.release(cage.id, cage.version).await,
        };

        let outcome = match result {
            Ok(updated) => {
                tracing::info!(
                    cage_id = cage.id,
                    op = op.name(),
                    sent_version = cage.version,
                    version = updated.version,
                    "cage write applied"
                );
                self.engine.merge_cage(updated.clone());
                WriteOutcome::Applied(updated)
            }
            Err(err) if err.is_conflict => {
                tracing::info!(
                    cage_id = cage.id,
                    op = op.name(),
                    sent_version = cage.version,
                    "cage write lost to a concurrent change"
                );
                if let Err(e) = self.engine.reconcile().await {
                    tracing::warn!(cage_id = cage.id, error = %e, "reconciliation failed");
                }
                WriteOutcome::Conflict(err)
            }
            Err(err) => {
                tracing::warn!(
                    cage_id = cage.id,
                    op = op.name(),
                    status = err.status_code,
                    error = %err,
                    "cage write failed"
                );
                WriteOutcome::Failed(err)
            }
        };

        self.set_state(cage.id, WriteState::from(&outcome));
        outcome
    }

    fn states(&self) -> MutexGuard<'_, HashMap<CageId, WriteState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, cage_id: CageId, state: WriteState) {
        self.states().insert(cage_id, state);
    }
}
