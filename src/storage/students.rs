//! Student repository for JSON storage
//!
//! Manages loading and saving students to students.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SchoolError;
use crate::models::{Student, StudentId};

use super::file_io::{read_json, write_json_atomic};
use super::{poisoned, sort_key, unique_id_match};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct StudentData {
    students: Vec<Student>,
}

/// Repository for student persistence
pub struct StudentRepository {
    path: PathBuf,
    data: RwLock<HashMap<StudentId, Student>>,
}

impl StudentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load students from disk
    pub fn load(&self) -> Result<(), SchoolError> {
        let file_data: StudentData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(poisoned)?;

        data.clear();
        for student in file_data.students {
            data.insert(student.id, student);
        }

        Ok(())
    }

    /// Save students to disk
    pub fn save(&self) -> Result<(), SchoolError> {
        let file_data = StudentData {
            students: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: StudentId) -> Result<Option<Student>, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.get(&id).cloned())
    }

    /// All students ordered by class, roll number, then name
    pub fn get_all(&self) -> Result<Vec<Student>, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;

        let mut students: Vec<_> = data.values().cloned().collect();
        students.sort_by(|a, b| {
            sort_key(&a.class)
                .cmp(&sort_key(&b.class))
                .then(a.section.cmp(&b.section))
                .then(a.roll_number.cmp(&b.roll_number))
                .then(a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(students)
    }

    /// Find by admission number, ID, or name (case-insensitive), in that order
    pub fn find(&self, identifier: &str) -> Result<Option<Student>, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        let needle = identifier.trim();

        if let Some(student) = data
            .values()
            .find(|s| s.admission_number.as_deref() == Some(needle))
        {
            return Ok(Some(student.clone()));
        }

        if let Some(student) = unique_id_match(
            "student",
            needle,
            data.values(),
            |s| s.id.matches(needle),
            |s| s.id.as_uuid().to_string(),
        )? {
            return Ok(Some(student.clone()));
        }

        let lower = needle.to_lowercase();
        Ok(data
            .values()
            .find(|s| s.name.to_lowercase() == lower)
            .cloned())
    }

    /// Whether another student already holds this admission number
    pub fn admission_number_exists(
        &self,
        admission_number: &str,
        exclude: Option<StudentId>,
    ) -> Result<bool, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.values().any(|s| {
            s.admission_number.as_deref() == Some(admission_number) && Some(s.id) != exclude
        }))
    }

    /// Insert or update a student
    pub fn upsert(&self, student: Student) -> Result<(), SchoolError> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.insert(student.id, student);
        Ok(())
    }

    pub fn delete(&self, id: StudentId) -> Result<bool, SchoolError> {
        let mut data = self.data.write().map_err(poisoned)?;
        Ok(data.remove(&id).is_some())
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
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, StudentRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = StudentRepository::new(temp_dir.path().join("students.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_find_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let mut student = Student::with_fees("Asha Verma", "8", Money::from_units(5000), Money::zero());
        student.admission_number = Some("A-101".into());
        let id = student.id;
        repo.upsert(student).unwrap();
        repo.save().unwrap();

        let repo2 = StudentRepository::new(temp_dir.path().join("students.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.find("A-101").unwrap().unwrap().id, id);
        assert_eq!(repo2.find("asha verma").unwrap().unwrap().id, id);
        assert_eq!(repo2.find(&id.to_string()).unwrap().unwrap().id, id);
        assert!(repo2.find("Nobody").unwrap().is_none());
    }

    #[test]
    fn test_ordering_by_class_then_roll() {
        let (_temp_dir, repo) = create_test_repo();

        let mut a = Student::new("Zoya");
        a.class = "10".into();
        let mut b = Student::new("Aarav");
        b.class = "9".into();
        b.roll_number = Some(2);
        let mut c = Student::new("Bela");
        c.class = "9".into();
        c.roll_number = Some(1);

        repo.upsert(a).unwrap();
        repo.upsert(b).unwrap();
        repo.upsert(c).unwrap();

        let names: Vec<_> = repo.get_all().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Bela", "Aarav", "Zoya"]);
    }

    #[test]
    fn test_admission_number_exists() {
        let (_temp_dir, repo) = create_test_repo();
        let mut student = Student::new("Asha");
        student.admission_number = Some("A-1".into());
        let id = student.id;
        repo.upsert(student).unwrap();

        assert!(repo.admission_number_exists("A-1", None).unwrap());
        assert!(!repo.admission_number_exists("A-1", Some(id)).unwrap());
        assert!(!repo.admission_number_exists("A-2", None).unwrap());
    }
}
