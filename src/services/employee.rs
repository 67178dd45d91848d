//! Employee service

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{SchoolError, SchoolResult};
use crate::models::{Employee, EmployeeId, Money};
use crate::storage::Storage;

/// Service for staff records
pub struct EmployeeService<'a> {
    storage: &'a Storage,
}

/// Fields for creating or updating an employee; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct EmployeeInput {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub joining_date: Option<NaiveDate>,
    pub salary: Option<Money>,
    pub pin: Option<String>,
}

impl EmployeeInput {
    /// Apply the set fields, returning a description of each change
    fn apply_to(self, employee: &mut Employee) -> Vec<String> {
        let mut changes = Vec::new();

        if let Some(name) = self.name {
            changes.push(format!("name: {} -> {}", employee.name, name.trim()));
            employee.name = name.trim().to_string();
        }
        if let Some(designation) = self.designation {
            changes.push(format!(
                "designation: {} -> {}",
                employee.designation,
                designation.trim()
            ));
            employee.designation = designation.trim().to_string();
        }
        if let Some(department) = self.department {
            changes.push(format!("department -> {}", department.trim()));
            employee.department = department.trim().to_string();
        }
        if let Some(phone) = self.phone {
            changes.push("phone updated".to_string());
            employee.phone = phone.trim().to_string();
        }
        if let Some(email) = self.email {
            changes.push("email updated".to_string());
            employee.email = email.trim().to_string();
        }
        if let Some(dob) = self.date_of_birth {
            changes.push("date of birth updated".to_string());
            employee.date_of_birth = Some(dob);
        }
        if let Some(joined) = self.joining_date {
            changes.push(format!("joining date -> {}", joined));
            employee.joining_date = Some(joined);
        }
        if let Some(salary) = self.salary {
            changes.push(format!("salary: {} -> {}", employee.salary, salary));
            employee.salary = salary;
        }
        if let Some(pin) = self.pin {
            // PINs never go into the change summary
            changes.push("PIN changed".to_string());
            employee.pin = Some(pin.trim().to_string()).filter(|p| !p.is_empty());
        }

        changes
    }
}

impl<'a> EmployeeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a member of staff
    pub fn create(&self, input: EmployeeInput) -> SchoolResult<Employee> {
        let name = input.name.clone().unwrap_or_default();
        if name.trim().is_empty() {
            return Err(SchoolError::Validation("Employee name cannot be empty".into()));
        }

        let mut employee = Employee::new(name.trim(), "");
        input.apply_to(&mut employee);
        if employee.joining_date.is_none() {
            employee.joining_date = Some(Utc::now().date_naive());
        }

        employee
            .validate()
            .map_err(|e| SchoolError::Validation(e.to_string()))?;
        self.check_pin_unique(&employee)?;

        self.storage.employees.upsert(employee.clone())?;
        self.storage.employees.save()?;

        self.storage.log_create(
            EntityType::Employee,
            employee.id.to_string(),
            Some(employee.name.clone()),
            &employee.redacted(),
        )?;

        tracing::info!(employee = %employee.id, "employee added");
        Ok(employee)
    }

    pub fn get(&self, id: EmployeeId) -> SchoolResult<Option<Employee>> {
        self.storage.employees.get(id)
    }

    pub fn find(&self, identifier: &str) -> SchoolResult<Option<Employee>> {
        self.storage.employees.find(identifier)
    }

    pub fn require(&self, identifier: &str) -> SchoolResult<Employee> {
        self.find(identifier)?
            .ok_or_else(|| SchoolError::employee_not_found(identifier))
    }

    pub fn list(&self, include_inactive: bool) -> SchoolResult<Vec<Employee>> {
        if include_inactive {
            self.storage.employees.get_all()
        } else {
            self.storage.employees.get_active()
        }
    }

    pub fn update(&self, id: EmployeeId, input: EmployeeInput) -> SchoolResult<Employee> {
        let before = self
            .storage
            .employees
            .get(id)?
            .ok_or_else(|| SchoolError::employee_not_found(id.to_string()))?;

        let mut employee = before.clone();
        let changes = input.apply_to(&mut employee);
        if changes.is_empty() {
            return Ok(employee);
        }

        employee
            .validate()
            .map_err(|e| SchoolError::Validation(e.to_string()))?;
        self.check_pin_unique(&employee)?;
        employee.updated_at = Utc::now();

        self.save_update(&before, &employee, changes.join(", "))?;
        Ok(employee)
    }

    /// Mark an employee as no longer working at the school
    pub fn deactivate(&self, id: EmployeeId) -> SchoolResult<Employee> {
        let before = self
            .storage
            .employees
            .get(id)?
            .ok_or_else(|| SchoolError::employee_not_found(id.to_string()))?;

        let mut employee = before.clone();
        employee.active = false;
        employee.updated_at = Utc::now();
        self.save_update(&before, &employee, "deactivated".to_string())?;
        Ok(employee)
    }

    pub fn delete(&self, id: EmployeeId) -> SchoolResult<Employee> {
        let employee = self
            .storage
            .employees
            .get(id)?
            .ok_or_else(|| SchoolError::employee_not_found(id.to_string()))?;

        self.storage.employees.delete(id)?;
        self.storage.employees.save()?;
        self.storage.log_delete(
            EntityType::Employee,
            employee.id.to_string(),
            Some(employee.name.clone()),
            &employee.redacted(),
        )?;
        Ok(employee)
    }

    /// Two active employees may not share a PIN, or the gate could not tell
    /// them apart
    fn check_pin_unique(&self, employee: &Employee) -> SchoolResult<()> {
        let Some(pin) = employee.pin.as_deref() else {
            return Ok(());
        };
        let clash = self
            .storage
            .employees
            .get_active()?
            .into_iter()
            .any(|other| other.id != employee.id && other.pin_matches(pin));
        if clash {
            return Err(SchoolError::Validation(
                "Another employee already uses this PIN".into(),
            ));
        }
        Ok(())
    }

    fn save_update(&self, before: &Employee, after: &Employee, summary: String) -> SchoolResult<()> {
        self.storage.employees.upsert(after.clone())?;
        self.storage.employees.save()?;
        self.storage.log_update(
            EntityType::Employee,
            after.id.to_string(),
            Some(after.name.clone()),
            &before.redacted(),
            &after.redacted(),
            Some(summary),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SchoolPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SchoolPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(name: &str, pin: Option<&str>) -> EmployeeInput {
        EmployeeInput {
            name: Some(name.into()),
            designation: Some("Teacher".into()),
            pin: pin.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_require() {
        let (_temp_dir, storage) = create_test_storage();
        let service = EmployeeService::new(&storage);

        let employee = service.create(input("Sunita Rao", Some("1357"))).unwrap();
        assert_eq!(employee.designation, "Teacher");
        assert!(employee.joining_date.is_some());
        assert_eq!(service.require("sunita rao").unwrap().id, employee.id);
        assert!(service.require("nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn test_pin_not_written_to_audit_log() {
        let (_temp_dir, storage) = create_test_storage();
        let service = EmployeeService::new(&storage);
        service.create(input("Sunita Rao", Some("1357"))).unwrap();

        let raw = std::fs::read_to_string(storage.audit().path()).unwrap();
        assert!(!raw.contains("\"1357\""));
        assert!(raw.contains("****"));
    }

    #[test]
    fn test_invalid_and_duplicate_pins() {
        let (_temp_dir, storage) = create_test_storage();
        let service = EmployeeService::new(&storage);

        assert!(service.create(input("A", Some("12"))).unwrap_err().is_validation());

        service.create(input("A", Some("2468"))).unwrap();
        assert!(service.create(input("B", Some("2468"))).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_deactivate_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = EmployeeService::new(&storage);
        let employee = service.create(input("Sunita Rao", None)).unwrap();

        let updated = service
            .update(
                employee.id,
                EmployeeInput {
                    designation: Some("Principal".into()),
                    salary: Some(Money::from_units(60_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.designation, "Principal");
        assert_eq!(updated.salary, Money::from_units(60_000));

        service.deactivate(employee.id).unwrap();
        assert!(service.list(false).unwrap().is_empty());
        assert_eq!(service.list(true).unwrap().len(), 1);

        service.delete(employee.id).unwrap();
        assert!(service.list(true).unwrap().is_empty());
    }
}
