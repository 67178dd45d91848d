//! Student service
//!
//! CRUD for student profiles, fee terms and departures.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{SchoolError, SchoolResult};
use crate::models::{Money, Student, StudentId};
use crate::storage::Storage;

/// Service for student management
pub struct StudentService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new student
#[derive(Debug, Clone, Default)]
pub struct CreateStudentInput {
    pub name: String,
    pub class: Option<String>,
    pub section: Option<String>,
    pub roll_number: Option<u32>,
    pub admission_number: Option<String>,
    pub guardian_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub admission_date: Option<NaiveDate>,
    pub total_agreed_fees: Option<Money>,
    pub back_logs: Option<Money>,
}

/// Contact and placement fields that can be changed after admission
#[derive(Debug, Clone, Default)]
pub struct UpdateStudentInput {
    pub name: Option<String>,
    pub class: Option<String>,
    pub section: Option<String>,
    pub roll_number: Option<u32>,
    pub guardian_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl UpdateStudentInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.class.is_none()
            && self.section.is_none()
            && self.roll_number.is_none()
            && self.guardian_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.date_of_birth.is_none()
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl<'a> StudentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Admit a new student
    pub fn create(&self, input: CreateStudentInput) -> SchoolResult<Student> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(SchoolError::Validation("Student name cannot be empty".into()));
        }

        let admission_number = input
            .admission_number
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if let Some(number) = &admission_number {
            if self.storage.students.admission_number_exists(number, None)? {
                return Err(SchoolError::Duplicate {
                    entity_type: "Student",
                    identifier: number.clone(),
                });
            }
        }

        let mut student = Student::new(name);
        student.class = trimmed(input.class);
        student.section = trimmed(input.section);
        student.roll_number = input.roll_number;
        student.admission_number = admission_number;
        student.guardian_name = trimmed(input.guardian_name);
        student.phone = trimmed(input.phone);
        student.address = trimmed(input.address);
        student.date_of_birth = input.date_of_birth;
        student.admission_date = input.admission_date.or_else(|| Some(Utc::now().date_naive()));
        student.total_agreed_fees = input.total_agreed_fees.unwrap_or_default();
        student.back_logs = input.back_logs.unwrap_or_default();

        student
            .validate()
            .map_err(|e| SchoolError::Validation(e.to_string()))?;

        self.storage.students.upsert(student.clone())?;
        self.storage.students.save()?;

        self.storage.log_create(
            EntityType::Student,
            student.id.to_string(),
            Some(student.name.clone()),
            &student,
        )?;

        tracing::info!(student = %student.id, "student admitted");
        Ok(student)
    }

    pub fn get(&self, id: StudentId) -> SchoolResult<Option<Student>> {
        self.storage.students.get(id)
    }

    /// Find by admission number, ID, or name
    pub fn find(&self, identifier: &str) -> SchoolResult<Option<Student>> {
        self.storage.students.find(identifier)
    }

    /// Find or fail with a not-found error
    pub fn require(&self, identifier: &str) -> SchoolResult<Student> {
        self.find(identifier)?
            .ok_or_else(|| SchoolError::student_not_found(identifier))
    }

    /// List students, optionally restricted to one class
    pub fn list(&self, class: Option<&str>, include_inactive: bool) -> SchoolResult<Vec<Student>> {
        Ok(self
            .storage
            .students
            .get_all()?
            .into_iter()
            .filter(|s| include_inactive || s.active)
            .filter(|s| class.map_or(true, |c| s.class.eq_ignore_ascii_case(c.trim())))
            .collect())
    }

    /// Change the fee terms the ledger reads
    pub fn set_fee_terms(
        &self,
        id: StudentId,
        total_agreed_fees: Option<Money>,
        back_logs: Option<Money>,
    ) -> SchoolResult<Student> {
        let before = self
            .storage
            .students
            .get(id)?
            .ok_or_else(|| SchoolError::student_not_found(id.to_string()))?;

        let mut student = before.clone();
        let mut changes = Vec::new();

        if let Some(agreed) = total_agreed_fees {
            if agreed.is_negative() {
                return Err(SchoolError::InvalidInput(format!(
                    "agreed fees cannot be negative: {}",
                    agreed
                )));
            }
            changes.push(format!("agreed fees: {} -> {}", student.total_agreed_fees, agreed));
            student.total_agreed_fees = agreed;
        }

        if let Some(back_logs) = back_logs {
            if back_logs.is_negative() {
                return Err(SchoolError::InvalidInput(format!(
                    "back logs cannot be negative: {}",
                    back_logs
                )));
            }
            changes.push(format!("back logs: {} -> {}", student.back_logs, back_logs));
            student.back_logs = back_logs;
        }

        if changes.is_empty() {
            return Ok(student);
        }

        student.updated_at = Utc::now();
        self.save_update(&before, &student, changes)?;
        Ok(student)
    }

    /// Update contact and placement details
    pub fn update(&self, id: StudentId, input: UpdateStudentInput) -> SchoolResult<Student> {
        let before = self
            .storage
            .students
            .get(id)?
            .ok_or_else(|| SchoolError::student_not_found(id.to_string()))?;

        let mut student = before.clone();
        let mut changes = Vec::new();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(SchoolError::Validation("Student name cannot be empty".into()));
            }
            changes.push(format!("name: {} -> {}", student.name, name));
            student.name = name;
        }
        if let Some(class) = input.class {
            changes.push(format!("class: {} -> {}", student.class, class.trim()));
            student.class = class.trim().to_string();
        }
        if let Some(section) = input.section {
            changes.push(format!("section: {} -> {}", student.section, section.trim()));
            student.section = section.trim().to_string();
        }
        if let Some(roll) = input.roll_number {
            changes.push(format!("roll number -> {}", roll));
            student.roll_number = Some(roll);
        }
        if let Some(guardian) = input.guardian_name {
            changes.push("guardian updated".to_string());
            student.guardian_name = guardian.trim().to_string();
        }
        if let Some(phone) = input.phone {
            changes.push("phone updated".to_string());
            student.phone = phone.trim().to_string();
        }
        if let Some(address) = input.address {
            changes.push("address updated".to_string());
            student.address = address.trim().to_string();
        }
        if let Some(dob) = input.date_of_birth {
            changes.push(format!("date of birth -> {}", dob));
            student.date_of_birth = Some(dob);
        }

        if changes.is_empty() {
            return Ok(student);
        }

        student
            .validate()
            .map_err(|e| SchoolError::Validation(e.to_string()))?;
        student.updated_at = Utc::now();
        self.save_update(&before, &student, changes)?;
        Ok(student)
    }

    /// Record that a student left the school
    pub fn deactivate(&self, id: StudentId, leaving_date: NaiveDate) -> SchoolResult<Student> {
        let before = self
            .storage
            .students
            .get(id)?
            .ok_or_else(|| SchoolError::student_not_found(id.to_string()))?;

        if !before.active {
            return Err(SchoolError::Validation(format!(
                "{} has already left the school",
                before.name
            )));
        }

        let mut student = before.clone();
        student.deactivate(leaving_date);
        self.save_update(&before, &student, vec![format!("left on {}", leaving_date)])?;
        Ok(student)
    }

    /// Delete a student. Students with fee records are refused unless
    /// `force` is set, in which case their records are removed too.
    pub fn delete(&self, id: StudentId, force: bool) -> SchoolResult<Student> {
        let student = self
            .storage
            .students
            .get(id)?
            .ok_or_else(|| SchoolError::student_not_found(id.to_string()))?;

        let fees = self.storage.fees.get_by_student(id)?;
        if !fees.is_empty() && !force {
            return Err(SchoolError::Validation(format!(
                "{} has {} fee record(s); deactivate the student instead or pass --force",
                student.name,
                fees.len()
            )));
        }

        for fee in &fees {
            self.storage.fees.delete(fee.id)?;
            self.storage.log_delete(
                EntityType::FeeRecord,
                fee.id.to_string(),
                Some(student.name.clone()),
                fee,
            )?;
        }
        if !fees.is_empty() {
            self.storage.fees.save()?;
        }

        self.storage.students.delete(id)?;
        self.storage.students.save()?;
        self.storage.log_delete(
            EntityType::Student,
            student.id.to_string(),
            Some(student.name.clone()),
            &student,
        )?;

        tracing::info!(student = %student.id, fees = fees.len(), "student deleted");
        Ok(student)
    }

    fn save_update(&self, before: &Student, after: &Student, changes: Vec<String>) -> SchoolResult<()> {
        self.storage.students.upsert(after.clone())?;
        self.storage.students.save()?;
        self.storage.log_update(
            EntityType::Student,
            after.id.to_string(),
            Some(after.name.clone()),
            before,
            after,
            Some(changes.join(", ")),
        )
    }
}
