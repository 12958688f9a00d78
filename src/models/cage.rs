//! Cage model and the per-rack grid snapshot.

use serde::{Deserialize, Serialize};

use super::{CageId, ProfessorId, RackId};

/// Embedded professor reference carried by an occupied cage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorInfo {
    pub id: ProfessorId,
    pub name: String,
    pub color_code: String,
}

/// A single cage slot in a rack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cage {
    pub id: CageId,
    pub rack_id: RackId,
    /// Display label such as `A1` or `C4`
    pub position: String,
    pub row_index: i64,
    pub col_index: i64,
    /// Optimistic concurrency token, bumped by the backend on every mutation
    pub version: i64,
    #[serde(default)]
    pub current_professor: Option<ProfessorInfo>,
}

impl Cage {
    pub fn is_vacant(&self) -> bool {
        self.current_professor.is_none()
    }
}

/// Full cage grid for one rack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub rack_id: RackId,
    pub rack_name: String,
    pub rows: i64,
    pub columns: i64,
    pub cages: Vec<Cage>,
}

impl GridSnapshot {
    /// Replace the cage with the same id, leaving every other entry untouched.
    ///
    /// Returns `false` when no cage in this grid carries that id.
    pub fn merge_cage(&mut self, cage: Cage) -> bool {
        match self.cages.iter_mut().find(|c| c.id == cage.id) {
            Some(slot) => {
                *slot = cage;
                true
            }
            None => false,
        }
    }

    pub fn cage(&self, id: CageId) -> Option<&Cage> {
        self.cages.iter().find(|c| c.id == id)
    }

    pub fn occupied_count(&self) -> usize {
        self.cages.iter().filter(|c| !c.is_vacant()).count()
    }
}

/// Letters for a 0-based row: A..Z, then AA, AB and so on.
pub fn row_label(row_index: i64) -> String {
    let mut n = row_index.max(0).unsigned_abs() + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Build the display label for a grid coordinate: row letters then 1-based column.
pub fn position_label(row_index: i64, col_index: i64) -> String {
    format!("{}{}", row_label(row_index), col_index + 1)
}

/// Request body for assigning a cage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    pub professor_id: ProfessorId,
    pub version: i64,
}

/// Request body for releasing a cage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRequest {
    pub version: i64,
}

/// Response body for assign/release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CageActionResponse {
    pub success: bool,
    pub message: String,
    pub cage: Cage,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cage(id: CageId, row: i64, col: i64) -> Cage {
        Cage {
            id,
            rack_id: 1,
            position: position_label(row, col),
            row_index: row,
            col_index: col,
            version: 1,
            current_professor: None,
        }
    }

    #[test]
    fn test_position_label() {
        assert_eq!(position_label(0, 0), "A1");
        assert_eq!(position_label(1, 2), "B3");
        assert_eq!(position_label(25, 9), "Z10");
        assert_eq!(position_label(26, 0), "AA1");
    }

    #[test]
    fn test_row_label_past_z() {
        assert_eq!(row_label(0), "A");
        assert_eq!(row_label(25), "Z");
        assert_eq!(row_label(26), "AA");
        assert_eq!(row_label(27), "AB");
        assert_eq!(row_label(51), "AZ");
        assert_eq!(row_label(52), "BA");
        assert_eq!(row_label(200), "GS");
    }

    #[test]
    fn test_merge_cage_replaces_only_matching_id() {
        let mut grid = GridSnapshot {
            rack_id: 1,
            rack_name: "R1".to_string(),
            rows: 1,
            columns: 3,
            cages: vec![cage(10, 0, 0), cage(11, 0, 1), cage(12, 0, 2)],
        };
        let before = grid.clone();

        let mut updated = cage(11, 0, 1);
        updated.version = 2;
        updated.current_professor = Some(ProfessorInfo {
            id: 7,
            name: "Kim".to_string(),
            color_code: "#FF0000".to_string(),
        });

        assert!(grid.merge_cage(updated.clone()));
        assert_eq!(grid.cages[0], before.cages[0]);
        assert_eq!(grid.cages[1], updated);
        assert_eq!(grid.cages[2], before.cages[2]);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_merge_cage_unknown_id_is_noop() {
        let mut grid = GridSnapshot {
            rack_id: 1,
            rack_name: "R1".to_string(),
            rows: 1,
            columns: 1,
            cages: vec![cage(10, 0, 0)],
        };
        let before = grid.clone();

        assert!(!grid.merge_cage(cage(99, 0, 0)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_vacant_cage_deserializes_without_professor() {
        let json = r#"{"id":1,"rack_id":2,"position":"A1","row_index":0,"col_index":0,"version":3}"#;
        let cage: Cage = serde_json::from_str(json).unwrap();
        assert!(cage.is_vacant());
        assert_eq!(cage.version, 3);
    }
}
