//! Grid synchronization: the client-side cache of one rack's cage grid.
//!
//! [`GridEngine`] owns the authoritative in-memory [`GridState`] and is its only writer.
//! Readers take snapshots with [`GridEngine::state`] or watch for changes through
//! [`GridEngine::subscribe`]. A background [`Poller`] refreshes the selected rack while one
//! is selected.

mod engine;
mod poller;
#[cfg(test)]
pub(crate) mod testing;

pub use engine::*;
pub use poller::*;

use std::time::Duration;

use thiserror::Error;

use crate::client::ClientError;
use crate::config::DEFAULT_POLL_INTERVAL_MS;
use crate::models::{GridSnapshot, Professor, Rack, RackId};

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Refresh cadence for the selected rack; `None` disables background polling
    pub poll_interval: Option<Duration>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Some(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)),
        }
    }
}

/// Failures recorded in [`GridState::last_error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The rack or professor list could not be loaded; the view cannot proceed
    #[error("failed to load racks and professors: {0}")]
    Load(ClientError),
    /// The grid of one rack could not be fetched
    #[error("failed to load cage grid for rack {rack_id}: {source}")]
    Snapshot { rack_id: RackId, source: ClientError },
}

impl SyncError {
    pub fn client_error(&self) -> &ClientError {
        match self {
            SyncError::Load(err) => err,
            SyncError::Snapshot { source, .. } => source,
        }
    }

    /// True for failures that leave nothing to render.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Load(_))
    }
}

/// Everything the view renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridState {
    pub racks: Vec<Rack>,
    pub selected_rack_id: Option<RackId>,
    /// Last good grid. After a failed rack switch it may still belong to the previous
    /// rack; compare `snapshot.rack_id` with `selected_rack_id`.
    pub snapshot: Option<GridSnapshot>,
    pub professors: Vec<Professor>,
    pub is_loading: bool,
    pub last_error: Option<SyncError>,
}

impl GridState {
    /// The snapshot, only if it belongs to the selected rack.
    pub fn current_snapshot(&self) -> Option<&GridSnapshot> {
        self.snapshot
            .as_ref()
            .filter(|s| Some(s.rack_id) == self.selected_rack_id)
    }
}
