//! In-memory [`CageApi`] used by the engine and coordinator tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::client::{CageApi, ClientError};
use crate::models::{
    position_label, Cage, CageId, GridSnapshot, Professor, ProfessorId, ProfessorInfo, Rack,
    RackId,
};

#[derive(Default)]
struct Inner {
    racks: Vec<Rack>,
    professors: Vec<Professor>,
    grids: HashMap<RackId, GridSnapshot>,
    fetch_counts: HashMap<RackId, usize>,
    write_calls: usize,
    gates: HashMap<RackId, VecDeque<oneshot::Receiver<()>>>,
    list_failure: Option<ClientError>,
    grid_failures: HashMap<RackId, ClientError>,
    next_write_failure: Option<ClientError>,
}

impl Inner {
    fn cage_mut(&mut self, cage_id: CageId) -> Option<&mut Cage> {
        self.grids
            .values_mut()
            .flat_map(|g| g.cages.iter_mut())
            .find(|c| c.id == cage_id)
    }

    fn professor_info(&self, professor_id: ProfessorId) -> Option<ProfessorInfo> {
        self.professors
            .iter()
            .find(|p| p.id == professor_id)
            .map(|p| ProfessorInfo {
                id: p.id,
                name: p.name.clone(),
                color_code: p.color_code.clone(),
            })
    }
}

/// Backend double that applies the same version fencing as the real service.
#[derive(Default)]
pub struct FakeCageApi {
    inner: Mutex<Inner>,
}

/// Two racks: rack 1 is 2x2 (cages 10..=13, cage 13 held by professor 2),
/// rack 2 is 1x3 (cages 20..=22, all vacant).
pub fn fake_api() -> Arc<FakeCageApi> {
    let api = FakeCageApi::default();
    {
        let mut inner = api.lock();
        inner.professors = vec![professor(1, "Kim"), professor(2, "Lee")];
        inner.racks = vec![rack(1, "Rack A", 2, 2, 0), rack(2, "Rack B", 1, 3, 1)];

        let mut first = grid(1, "Rack A", 2, 2, 10);
        let holder = inner.professor_info(2);
        if let Some(cage) = first.cages.iter_mut().find(|c| c.id == 13) {
            cage.current_professor = holder;
            cage.version = 2;
        }
        inner.grids.insert(1, first);
        inner.grids.insert(2, grid(2, "Rack B", 1, 3, 20));
    }
    Arc::new(api)
}

/// Single-rack backend with one vacant cage (id 1) at (0,0), version 1.
pub fn single_cage_api() -> Arc<FakeCageApi> {
    let api = FakeCageApi::default();
    {
        let mut inner = api.lock();
        inner.professors = vec![professor(1, "P1"), professor(2, "P2")];
        inner.racks = vec![rack(1, "R1", 1, 1, 0)];
        inner.grids.insert(1, grid(1, "R1", 1, 1, 1));
    }
    Arc::new(api)
}

fn professor(id: ProfessorId, name: &str) -> Professor {
    Professor {
        id,
        name: name.to_string(),
        student_name: None,
        contact: None,
        color_code: format!("#00000{}", id),
        assigned_count: 0,
    }
}

fn rack(id: RackId, name: &str, rows: i64, columns: i64, display_order: i64) -> Rack {
    Rack {
        id,
        name: name.to_string(),
        rows,
        columns,
        display_order,
        assigned_count: 0,
    }
}

fn grid(rack_id: RackId, name: &str, rows: i64, columns: i64, first_id: CageId) -> GridSnapshot {
    let mut cages = Vec::new();
    for row in 0..rows {
        for col in 0..columns {
            cages.push(Cage {
                id: first_id + row * columns + col,
                rack_id,
                position: position_label(row, col),
                row_index: row,
                col_index: col,
                version: 1,
                current_professor: None,
            });
        }
    }
    GridSnapshot {
        rack_id,
        rack_name: name.to_string(),
        rows,
        columns,
        cages,
    }
}

impl FakeCageApi {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fetch_count(&self, rack_id: RackId) -> usize {
        self.lock().fetch_counts.get(&rack_id).copied().unwrap_or(0)
    }

    pub fn write_calls(&self) -> usize {
        self.lock().write_calls
    }

    /// Current backend-side grid.
    pub fn grid(&self, rack_id: RackId) -> GridSnapshot {
        self.lock().grids[&rack_id].clone()
    }

    pub fn cage(&self, cage_id: CageId) -> Cage {
        self.lock()
            .cage_mut(cage_id)
            .map(|c| c.clone())
            .expect("unknown cage")
    }

    pub fn fail_lists(&self, err: ClientError) {
        self.lock().list_failure = Some(err);
    }

    pub fn fail_grid(&self, rack_id: RackId, err: ClientError) {
        self.lock().grid_failures.insert(rack_id, err);
    }

    pub fn fail_next_write(&self, err: ClientError) {
        self.lock().next_write_failure = Some(err);
    }

    /// Block the next grid fetch for `rack_id` until the returned sender fires.
    pub fn hold_next_fetch(&self, rack_id: RackId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().gates.entry(rack_id).or_default().push_back(rx);
        tx
    }

    /// Yield until at least `count` fetches for `rack_id` have started.
    pub async fn wait_for_fetches(&self, rack_id: RackId, count: usize) {
        while self.fetch_count(rack_id) < count {
            tokio::task::yield_now().await;
        }
    }

    /// Assign a cage as some other client would, bumping its version.
    pub fn occupy(&self, cage_id: CageId, professor_id: ProfessorId) {
        let mut inner = self.lock();
        let holder = inner.professor_info(professor_id);
        let cage = inner.cage_mut(cage_id).expect("unknown cage");
        cage.current_professor = holder;
        cage.version += 1;
    }

    /// Release a cage as some other client would, bumping its version.
    pub fn vacate(&self, cage_id: CageId) {
        let mut inner = self.lock();
        let cage = inner.cage_mut(cage_id).expect("unknown cage");
        cage.current_professor = None;
        cage.version += 1;
    }

    fn begin_write(&self, cage_id: CageId, expected_version: i64) -> Result<(), ClientError> {
        let mut inner = self.lock();
        inner.write_calls += 1;
        if let Some(err) = inner.next_write_failure.take() {
            return Err(err);
        }
        let cage = inner
            .cage_mut(cage_id)
            .ok_or_else(|| ClientError::from_status(404, "Cage not found"))?;
        if cage.version != expected_version {
            return Err(ClientError::from_status(
                409,
                format!(
                    "Version mismatch: expected {}, current {}",
                    expected_version, cage.version
                ),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CageApi for FakeCageApi {
    async fn fetch_grid(&self, rack_id: RackId) -> Result<GridSnapshot, ClientError> {
        let gate = {
            let mut inner = self.lock();
            *inner.fetch_counts.entry(rack_id).or_default() += 1;
            inner.gates.get_mut(&rack_id).and_then(VecDeque::pop_front)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let inner = self.lock();
        if let Some(err) = inner.grid_failures.get(&rack_id) {
            return Err(err.clone());
        }
        inner
            .grids
            .get(&rack_id)
            .cloned()
            .ok_or_else(|| ClientError::from_status(404, "Rack not found"))
    }

    async fn assign(
        &self,
        cage_id: CageId,
        professor_id: ProfessorId,
        expected_version: i64,
    ) -> Result<Cage, ClientError> {
        self.begin_write(cage_id, expected_version)?;
        let mut inner = self.lock();
        let holder = inner
            .professor_info(professor_id)
            .ok_or_else(|| ClientError::from_status(404, "Professor not found"))?;
        let cage = inner
            .cage_mut(cage_id)
            .ok_or_else(|| ClientError::from_status(404, "Cage not found"))?;
        if cage.current_professor.as_ref().map(|p| p.id) == Some(professor_id) {
            return Err(ClientError::from_status(
                400,
                "Cage is already assigned to this professor",
            ));
        }
        cage.current_professor = Some(holder);
        cage.version += 1;
        Ok(cage.clone())
    }

    async fn release(&self, cage_id: CageId, expected_version: i64) -> Result<Cage, ClientError> {
        self.begin_write(cage_id, expected_version)?;
        let mut inner = self.lock();
        let cage = inner
            .cage_mut(cage_id)
            .ok_or_else(|| ClientError::from_status(404, "Cage not found"))?;
        if cage.current_professor.is_none() {
            return Err(ClientError::from_status(400, "Cage is not assigned"));
        }
        cage.current_professor = None;
        cage.version += 1;
        Ok(cage.clone())
    }

    async fn list_racks(&self) -> Result<Vec<Rack>, ClientError> {
        let inner = self.lock();
        match &inner.list_failure {
            Some(err) => Err(err.clone()),
            None => Ok(inner.racks.clone()),
        }
    }

    async fn list_professors(&self) -> Result<Vec<Professor>, ClientError> {
        let inner = self.lock();
        match &inner.list_failure {
            Some(err) => Err(err.clone()),
            None => Ok(inner.professors.clone()),
        }
    }
}
