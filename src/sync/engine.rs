//! The grid synchronization engine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::{watch, Mutex};

use super::{GridState, Poller, SyncConfig, SyncError};
use crate::client::CageApi;
use crate::models::{Cage, GridSnapshot, RackId};

/// Whether a fetch drives the loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    /// User-visible load (rack selection, initialization) with its load sequence number
    Loading(u64),
    /// Background refresh (poll, reconciliation)
    Silent,
}

/// Owns the cage grid of the selected rack and keeps it in sync with the backend.
///
/// Fetches are never aborted. Every grid response is checked against the rack selected
/// at the moment it lands and dropped if the selection has moved on.
pub struct GridEngine {
    api: Arc<dyn CageApi>,
    config: SyncConfig,
    state: watch::Sender<GridState>,
    poller: Mutex<Option<Poller>>,
    /// Bumped each time a selection starts a loading fetch
    load_seq: AtomicU64,
    this: Weak<GridEngine>,
}

impl std::fmt::Debug for GridEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridEngine")
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl GridEngine {
    pub fn new(api: Arc<dyn CageApi>, config: SyncConfig) -> Arc<Self> {
        let (state, _) = watch::channel(GridState::default());
        Arc::new_cyclic(|this| Self {
            api,
            config,
            state,
            poller: Mutex::new(None),
            load_seq: AtomicU64::new(0),
            this: this.clone(),
        })
    }

    pub fn api(&self) -> Arc<dyn CageApi> {
        Arc::clone(&self.api)
    }

    /// Copy of the current state.
    pub fn state(&self) -> GridState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<GridState> {
        self.state.subscribe()
    }

    pub fn selected_rack_id(&self) -> Option<RackId> {
        self.state.borrow().selected_rack_id
    }

    /// Load racks and professors, then select the first rack.
    pub async fn initialize(&self) -> Result<(), SyncError> {
        self.state.send_modify(|s| s.is_loading = true);

        let (racks, professors) = tokio::join!(self.api.list_racks(), self.api.list_professors());
        let (racks, professors) = match (racks, professors) {
            (Ok(racks), Ok(professors)) => (racks, professors),
            (Err(e), _) | (_, Err(e)) => {
                let err = SyncError::Load(e);
                tracing::warn!(error = %err, "grid initialization failed");
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.last_error = Some(err.clone());
                });
                return Err(err);
            }
        };

        tracing::info!(
            racks = racks.len(),
            professors = professors.len(),
            "grid engine initialized"
        );

        let first = racks.first().map(|r| r.id);
        let mut seq = 0;
        self.state.send_modify(|s| {
            s.racks = racks;
            s.professors = professors;
            s.last_error = None;
            s.selected_rack_id = first;
            s.is_loading = first.is_some();
            seq = self.next_load_seq();
        });

        match first {
            Some(rack_id) => self.activate(rack_id, seq).await,
            None => Ok(()),
        }
    }

    /// Switch the view to `rack_id`.
    ///
    /// Selecting the current rack again fetches nothing; it only restarts polling if
    /// [`GridEngine::shutdown`] stopped it.
    pub async fn select_rack(&self, rack_id: RackId) -> Result<(), SyncError> {
        let mut seq = 0;
        let changed = self.state.send_if_modified(|s| {
            if s.selected_rack_id == Some(rack_id) {
                return false;
            }
            s.selected_rack_id = Some(rack_id);
            s.is_loading = true;
            seq = self.next_load_seq();
            true
        });

        if !changed {
            tracing::debug!(rack_id, "rack already selected");
            self.resume_poller(rack_id).await;
            return Ok(());
        }

        tracing::debug!(rack_id, "rack selected");
        self.activate(rack_id, seq).await
    }

    /// Refresh the selected rack without touching the loading indicator.
    pub async fn poll(&self) -> Result<(), SyncError> {
        match self.selected_rack_id() {
            Some(rack_id) => self.poll_rack(rack_id).await,
            None => Ok(()),
        }
    }

    /// Force a silent refetch of the selected rack after a write conflict.
    pub async fn reconcile(&self) -> Result<(), SyncError> {
        let Some(rack_id) = self.selected_rack_id() else {
            return Ok(());
        };
        tracing::info!(rack_id, "reconciling grid with backend");
        self.fetch_and_commit(rack_id, FetchMode::Silent)
            .await
            .map(|_| ())
    }

    /// Replace one cage of the current snapshot by id.
    ///
    /// Returns `false` when no snapshot is held or no cage in it has that id.
    pub fn merge_cage(&self, cage: Cage) -> bool {
        let cage_id = cage.id;
        let merged = self.state.send_if_modified(|s| match s.snapshot.as_mut() {
            Some(snapshot) => snapshot.merge_cage(cage),
            None => false,
        });
        if !merged {
            tracing::debug!(cage_id, "merged cage not present in current grid");
        }
        merged
    }

    /// Rack the background poller is currently bound to.
    pub async fn polling_rack_id(&self) -> Option<RackId> {
        self.poller.lock().await.as_ref().map(Poller::rack_id)
    }

    /// Stop background polling. The engine stays usable; the next `select_rack` call
    /// starts polling again, even for the rack already selected.
    pub async fn shutdown(&self) {
        if let Some(poller) = self.poller.lock().await.take() {
            poller.stop().await;
        }
    }

    pub(crate) async fn poll_rack(&self, rack_id: RackId) -> Result<(), SyncError> {
        self.fetch_and_commit(rack_id, FetchMode::Silent)
            .await
            .map(|_| ())
    }

    /// Restart polling for `rack_id` and load its grid with the loading indicator on.
    async fn activate(&self, rack_id: RackId, seq: u64) -> Result<(), SyncError> {
        self.restart_poller(rack_id).await;
        self.fetch_and_commit(rack_id, FetchMode::Loading(seq))
            .await
            .map(|_| ())
    }

    fn next_load_seq(&self) -> u64 {
        self.load_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a fetch in `mode` is the latest loading fetch.
    fn ends_loading(&self, mode: FetchMode) -> bool {
        match mode {
            FetchMode::Loading(seq) => self.load_seq.load(Ordering::SeqCst) == seq,
            FetchMode::Silent => false,
        }
    }

    async fn resume_poller(&self, rack_id: RackId) {
        let Some(interval) = self.config.poll_interval else {
            return;
        };
        let mut slot = self.poller.lock().await;
        if slot.is_none() {
            tracing::debug!(rack_id, "resuming background polling");
            *slot = Some(Poller::spawn(self.this.clone(), rack_id, interval));
        }
    }

    async fn restart_poller(&self, rack_id: RackId) {
        let Some(interval) = self.config.poll_interval else {
            return;
        };
        let mut slot = self.poller.lock().await;
        // Dropping the previous poller signals its task to stop after any in-flight poll.
        *slot = Some(Poller::spawn(self.this.clone(), rack_id, interval));
    }

    /// Fetch a grid and commit it if its rack is still selected.
    ///
    /// Returns whether the response was committed.
    async fn fetch_and_commit(&self, rack_id: RackId, mode: FetchMode) -> Result<bool, SyncError> {
        match self.api.fetch_grid(rack_id).await {
            Ok(snapshot) => Ok(self.commit_snapshot(snapshot, mode)),
            Err(source) => {
                let err = SyncError::Snapshot { rack_id, source };
                let relevant = self.state.send_if_modified(|s| {
                    if s.selected_rack_id != Some(rack_id) {
                        return false;
                    }
                    // The previous snapshot is kept as the last good view.
                    s.last_error = Some(err.clone());
                    if self.ends_loading(mode) {
                        s.is_loading = false;
                    }
                    true
                });
                if relevant {
                    tracing::warn!(rack_id, error = %err, "cage grid fetch failed");
                } else {
                    tracing::debug!(rack_id, "ignoring failure for deselected rack");
                }
                Err(err)
            }
        }
    }

    fn commit_snapshot(&self, snapshot: GridSnapshot, mode: FetchMode) -> bool {
        let rack_id = snapshot.rack_id;
        let committed = self.state.send_if_modified(|s| {
            if s.selected_rack_id != Some(rack_id) {
                return false;
            }
            s.snapshot = Some(snapshot);
            s.last_error = None;
            if self.ends_loading(mode) {
                s.is_loading = false;
            }
            true
        });
        if !committed {
            tracing::debug!(rack_id, "discarding grid response for deselected rack");
        }
        committed
    }
}
