//! Fee record repository for JSON storage
//!
//! Records are indexed by student. Soft-deleted records are stored and
//! returned like any other; callers decide whether to skip them.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SchoolError;
use crate::models::{FeeId, FeeRecord, StudentId};

use super::file_io::{read_json, write_json_atomic};
use super::{poisoned, unique_id_match};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct FeeData {
    fees: Vec<FeeRecord>,
}

/// Repository for fee record persistence with a per-student index
pub struct FeeRepository {
    path: PathBuf,
    data: RwLock<HashMap<FeeId, FeeRecord>>,
    by_student: RwLock<HashMap<StudentId, Vec<FeeId>>>,
}

/// Newest first, creation time breaking ties
fn newest_first(records: &mut [FeeRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

impl FeeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_student: RwLock::new(HashMap::new()),
        }
    }

    /// Load fee records from disk and rebuild the index
    pub fn load(&self) -> Result<(), SchoolError> {
        let file_data: FeeData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(poisoned)?;
        let mut by_student = self.by_student.write().map_err(poisoned)?;

        data.clear();
        by_student.clear();

        for fee in file_data.fees {
            by_student.entry(fee.student_id).or_default().push(fee.id);
            data.insert(fee.id, fee);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SchoolError> {
        let file_data = FeeData {
            fees: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: FeeId) -> Result<Option<FeeRecord>, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.get(&id).cloned())
    }

    /// Find a record by full or short ID; an ambiguous short ID is an error
    pub fn find(&self, identifier: &str) -> Result<Option<FeeRecord>, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        let found = unique_id_match(
            "fee",
            identifier,
            data.values(),
            |f| f.id.matches(identifier),
            |f| f.id.as_uuid().to_string(),
        )?;
        Ok(found.cloned())
    }

    /// Every record, deleted ones included, newest first
    pub fn get_all(&self) -> Result<Vec<FeeRecord>, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        let mut fees: Vec<_> = data.values().cloned().collect();
        newest_first(&mut fees);
        Ok(fees)
    }

    /// Every record of one student, deleted ones included, newest first
    pub fn get_by_student(&self, student_id: StudentId) -> Result<Vec<FeeRecord>, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        let by_student = self.by_student.read().map_err(poisoned)?;

        let ids = by_student.get(&student_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut fees: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        newest_first(&mut fees);
        Ok(fees)
    }

    /// Insert or update a record, moving it in the index if its student changed
    pub fn upsert(&self, fee: FeeRecord) -> Result<(), SchoolError> {
        let mut data = self.data.write().map_err(poisoned)?;
        let mut by_student = self.by_student.write().map_err(poisoned)?;

        if let Some(old) = data.get(&fee.id) {
            if let Some(ids) = by_student.get_mut(&old.student_id) {
                ids.retain(|&id| id != fee.id);
            }
        }

        by_student.entry(fee.student_id).or_default().push(fee.id);
        data.insert(fee.id, fee);
        Ok(())
    }

    /// Remove a record from storage entirely
    pub fn delete(&self, id: FeeId) -> Result<bool, SchoolError> {
        let mut data = self.data.write().map_err(poisoned)?;
        let mut by_student = self.by_student.write().map_err(poisoned)?;

        match data.remove(&id) {
            Some(fee) => {
                if let Some(ids) = by_student.get_mut(&fee.student_id) {
                    ids.retain(|&fid| fid != id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn count(&self) -> Result<usize, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn create_test_repo() -> (TempDir, FeeRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = FeeRepository::new(temp_dir.path().join("fees.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_get_by_student_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let asha = StudentId::new();
        let ravi = StudentId::new();
        repo.upsert(FeeRecord::payment(asha, Money::from_units(100), date(1))).unwrap();
        repo.upsert(FeeRecord::payment(asha, Money::from_units(200), date(9))).unwrap();
        repo.upsert(FeeRecord::payment(ravi, Money::from_units(300), date(5))).unwrap();

        let fees = repo.get_by_student(asha).unwrap();
        assert_eq!(fees.len(), 2);
        assert_eq!(fees[0].amount, Money::from_units(200));
        assert!(repo.get_by_student(StudentId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_soft_deleted_records_are_kept() {
        let (temp_dir, repo) = create_test_repo();
        let student = StudentId::new();
        let mut fee = FeeRecord::payment(student, Money::from_units(100), date(1));
        fee.soft_delete();
        repo.upsert(fee).unwrap();
        repo.save().unwrap();

        let repo2 = FeeRepository::new(temp_dir.path().join("fees.json"));
        repo2.load().unwrap();
        let fees = repo2.get_by_student(student).unwrap();
        assert_eq!(fees.len(), 1);
        assert!(fees[0].is_deleted);
    }

    #[test]
    fn test_upsert_moves_index_and_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let first = StudentId::new();
        let second = StudentId::new();

        let mut fee = FeeRecord::payment(first, Money::from_units(100), date(1));
        let id = fee.id;
        repo.upsert(fee.clone()).unwrap();

        fee.student_id = second;
        repo.upsert(fee).unwrap();
        assert!(repo.get_by_student(first).unwrap().is_empty());
        assert_eq!(repo.get_by_student(second).unwrap().len(), 1);

        assert!(repo.find(&id.to_string()).unwrap().is_some());
        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_find_reports_ambiguous_short_id() {
        let (_temp_dir, repo) = create_test_repo();
        let student = StudentId::new();

        let mut first = FeeRecord::payment(student, Money::from_units(100), date(1));
        first.id = FeeId::parse("1a2b3c4d-0000-4000-8000-000000000001").unwrap();
        let mut second = FeeRecord::payment(student, Money::from_units(200), date(2));
        second.id = FeeId::parse("1a2b3c4d-0000-4000-8000-000000000002").unwrap();
        repo.upsert(first.clone()).unwrap();
        repo.upsert(second).unwrap();

        let err = repo.find("fee-1a2b3c4d").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("matches 2 fee records"));

        let found = repo
            .find("1a2b3c4d-0000-4000-8000-000000000001")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.amount, Money::from_units(100));
        assert!(repo.find("fee-ffffffff").unwrap().is_none());
    }
}
