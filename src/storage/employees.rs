//! Employee repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SchoolError;
use crate::models::{Employee, EmployeeId};

use super::file_io::{read_json, write_json_atomic};
use super::{poisoned, unique_id_match};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EmployeeData {
    employees: Vec<Employee>,
}

/// Repository for employee persistence
pub struct EmployeeRepository {
    path: PathBuf,
    data: RwLock<HashMap<EmployeeId, Employee>>,
}

impl EmployeeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), SchoolError> {
        let file_data: EmployeeData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(poisoned)?;

        data.clear();
        for employee in file_data.employees {
            data.insert(employee.id, employee);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SchoolError> {
        let file_data = EmployeeData {
            employees: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: EmployeeId) -> Result<Option<Employee>, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.get(&id).cloned())
    }

    /// All employees ordered by name
    pub fn get_all(&self) -> Result<Vec<Employee>, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        let mut employees: Vec<_> = data.values().cloned().collect();
        employees.sort_by_key(|e| e.name.to_lowercase());
        Ok(employees)
    }

    pub fn get_active(&self) -> Result<Vec<Employee>, SchoolError> {
        Ok(self.get_all()?.into_iter().filter(|e| e.active).collect())
    }

    /// Find by ID, phone number, or name (case-insensitive)
    pub fn find(&self, identifier: &str) -> Result<Option<Employee>, SchoolError> {
        let data = self.data.read().map_err(poisoned)?;
        let needle = identifier.trim();

        if let Some(employee) = unique_id_match(
            "employee",
            needle,
            data.values(),
            |e| e.id.matches(needle),
            |e| e.id.as_uuid().to_string(),
        )? {
            return Ok(Some(employee.clone()));
        }

        if let Some(employee) = data
            .values()
            .find(|e| !e.phone.is_empty() && e.phone == needle)
        {
            return Ok(Some(employee.clone()));
        }

        let lower = needle.to_lowercase();
        Ok(data
            .values()
            .find(|e| e.name.to_lowercase() == lower)
            .cloned())
    }

    pub fn upsert(&self, employee: Employee) -> Result<(), SchoolError> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.insert(employee.id, employee);
        Ok(())
    }

    pub fn delete(&self, id: EmployeeId) -> Result<bool, SchoolError> {
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
    use tempfile::TempDir;

    #[test]
    fn test_find_by_phone_and_name() {
        let temp_dir = TempDir::new().unwrap();
        let repo = EmployeeRepository::new(temp_dir.path().join("employees.json"));
        repo.load().unwrap();

        let mut employee = Employee::new("Sunita Rao", "Accountant");
        employee.phone = "9876543210".into();
        let id = employee.id;
        repo.upsert(employee).unwrap();

        assert_eq!(repo.find("9876543210").unwrap().unwrap().id, id);
        assert_eq!(repo.find("SUNITA RAO").unwrap().unwrap().id, id);
        assert!(repo.find("").unwrap().is_none());
    }

    #[test]
    fn test_active_filter_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("employees.json");
        let repo = EmployeeRepository::new(path.clone());

        let mut former = Employee::new("Old Hand", "Clerk");
        former.active = false;
        repo.upsert(former).unwrap();
        repo.upsert(Employee::new("New Hand", "Teacher")).unwrap();
        repo.save().unwrap();

        let repo2 = EmployeeRepository::new(path);
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 2);
        assert_eq!(repo2.get_active().unwrap().len(), 1);
    }
}
