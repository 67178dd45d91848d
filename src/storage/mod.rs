//! Storage layer for SchoolBook
//!
//! JSON files with atomic writes, one repository per record type, plus the
//! audit trail hooks used by the service layer.

pub mod employees;
pub mod fees;
pub mod file_io;
pub mod init;
pub mod students;

pub use employees::EmployeeRepository;
pub use fees::FeeRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use students::StudentRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::SchoolPaths;
use crate::error::{SchoolError, SchoolResult};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SchoolPaths,
    audit: AuditLogger,
    /// Name recorded as the actor on audit entries
    actor: Option<String>,
    pub students: StudentRepository,
    pub employees: EmployeeRepository,
    pub fees: FeeRepository,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: SchoolPaths) -> Result<Self, SchoolError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            actor: None,
            students: StudentRepository::new(paths.students_file()),
            employees: EmployeeRepository::new(paths.employees_file()),
            fees: FeeRepository::new(paths.fees_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &SchoolPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Attribute subsequent audit entries to someone
    pub fn set_actor(&mut self, actor: Option<String>) {
        self.actor = actor;
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), SchoolError> {
        self.students.load()?;
        self.employees.load()?;
        self.fees.load()?;
        tracing::debug!(
            students = self.students.count()?,
            employees = self.employees.count()?,
            fees = self.fees.count()?,
            "records loaded"
        );
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), SchoolError> {
        self.students.save()?;
        self.employees.save()?;
        self.fees.save()?;
        Ok(())
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> SchoolResult<()> {
        let entry = AuditEntry::create(entity_type, entity_id, entity_name, entity)
            .by(self.actor.clone());
        self.audit.log(&entry)
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) -> SchoolResult<()> {
        let entry = AuditEntry::update(entity_type, entity_id, entity_name, before, after, summary)
            .by(self.actor.clone());
        self.audit.log(&entry)
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> SchoolResult<()> {
        let entry = AuditEntry::delete(entity_type, entity_id, entity_name, entity)
            .by(self.actor.clone());
        self.audit.log(&entry)
    }
}

pub(crate) fn poisoned<E: std::fmt::Display>(e: E) -> SchoolError {
    SchoolError::Storage(format!("Failed to acquire lock: {}", e))
}

/// The one record whose ID matches `identifier`.
///
/// A full ID can only match its own record; a short ID shared by several
/// records is reported instead of picking one of them.
pub(crate) fn unique_id_match<'a, T: 'a>(
    kind: &str,
    identifier: &str,
    records: impl IntoIterator<Item = &'a T>,
    matches: impl Fn(&T) -> bool,
    label: impl Fn(&T) -> String,
) -> Result<Option<&'a T>, SchoolError> {
    let found: Vec<&T> = records.into_iter().filter(|r| matches(r)).collect();
    match found.as_slice() {
        [] => Ok(None),
        [record] => Ok(Some(*record)),
        many => {
            let mut labels: Vec<String> = many.iter().map(|r| label(r)).collect();
            labels.sort();
            Err(SchoolError::Validation(format!(
                "'{}' matches {} {} records ({}); give more of the ID",
                identifier.trim(),
                many.len(),
                kind,
                labels.join(", ")
            )))
        }
    }
}

/// Order class names numerically when they are numbers ("9" before "10")
pub(crate) fn sort_key(class: &str) -> (u32, String) {
    match class.trim().parse::<u32>() {
        Ok(n) => (n, String::new()),
        Err(_) => (u32::MAX, class.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Student;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SchoolPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert_eq!(storage.students.count().unwrap(), 0);
    }

    #[test]
    fn test_audit_entries_carry_actor() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SchoolPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.set_actor(Some("Sunita Rao".into()));

        let student = Student::new("Asha");
        storage
            .log_create(EntityType::Student, student.id.to_string(), Some(student.name.clone()), &student)
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor.as_deref(), Some("Sunita Rao"));
    }

    #[test]
    fn test_class_sort_key() {
        assert!(sort_key("9") < sort_key("10"));
        assert!(sort_key("10") < sort_key("Nursery"));
        assert!(sort_key("LKG") < sort_key("UKG"));
    }
}
