//! Fee record service
//!
//! Recording payments and charges against students. Deletion is soft:
//! records stay on disk with `is_deleted` set and can be restored.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{SchoolError, SchoolResult};
use crate::models::{FeeRecord, FeeStatus, Money, PaymentMode, Student, StudentId};
use crate::storage::Storage;

/// Service for fee records
pub struct FeeService<'a> {
    storage: &'a Storage,
}

/// Input for a new fee record
#[derive(Debug, Clone)]
pub struct CreateFeeInput {
    pub student_id: StudentId,
    pub amount: Money,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub status: FeeStatus,
    pub mode: Option<PaymentMode>,
    pub note: Option<String>,
}

impl CreateFeeInput {
    /// A payment received today in cash
    pub fn payment(student_id: StudentId, amount: Money) -> Self {
        Self {
            student_id,
            amount,
            date: None,
            status: FeeStatus::Paid,
            mode: None,
            note: None,
        }
    }
}

impl<'a> FeeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a payment or raise a charge
    pub fn create(&self, input: CreateFeeInput) -> SchoolResult<FeeRecord> {
        if input.amount.is_negative() {
            return Err(SchoolError::InvalidInput(format!(
                "fee amount cannot be negative: {}",
                input.amount
            )));
        }

        let student = self.student(input.student_id)?;

        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
        let mut fee = FeeRecord::new(student.id, input.amount, date, input.status);
        if let Some(mode) = input.mode {
            fee.mode = mode;
        }
        if let Some(note) = input.note {
            fee.note = note.trim().to_string();
        }

        fee.validate()
            .map_err(|e| SchoolError::Validation(e.to_string()))?;

        self.storage.fees.upsert(fee.clone())?;
        self.storage.fees.save()?;

        self.storage.log_create(
            EntityType::FeeRecord,
            fee.id.to_string(),
            Some(student.name.clone()),
            &fee,
        )?;

        tracing::info!(
            fee = %fee.id,
            student = %student.id,
            amount = fee.amount.cents(),
            status = %fee.status,
            "fee recorded"
        );
        Ok(fee)
    }

    /// Find a record by full or short ID
    pub fn find(&self, identifier: &str) -> SchoolResult<Option<FeeRecord>> {
        self.storage.fees.find(identifier)
    }

    pub fn require(&self, identifier: &str) -> SchoolResult<FeeRecord> {
        self.find(identifier)?
            .ok_or_else(|| SchoolError::fee_not_found(identifier))
    }

    /// Records of one student, newest first
    pub fn list_for_student(
        &self,
        student_id: StudentId,
        include_deleted: bool,
    ) -> SchoolResult<Vec<FeeRecord>> {
        Ok(self
            .storage
            .fees
            .get_by_student(student_id)?
            .into_iter()
            .filter(|fee| include_deleted || !fee.is_deleted)
            .collect())
    }

    /// Mark a pending or overdue charge as paid
    pub fn mark_paid(
        &self,
        identifier: &str,
        date: Option<NaiveDate>,
        mode: PaymentMode,
    ) -> SchoolResult<FeeRecord> {
        let before = self.require(identifier)?;
        if before.is_deleted {
            return Err(SchoolError::Validation(format!(
                "Fee record {} is deleted; restore it first",
                before.id
            )));
        }
        if before.is_paid() {
            return Err(SchoolError::Validation(format!(
                "Fee record {} is already paid",
                before.id
            )));
        }

        let mut fee = before.clone();
        fee.mark_paid(date.unwrap_or_else(|| Utc::now().date_naive()), mode);
        let summary = format!("status: {} -> {}", before.status, fee.status);
        self.save_update(&before, &fee, summary)?;
        Ok(fee)
    }

    /// Soft-delete a record so the ledger ignores it
    pub fn delete(&self, identifier: &str) -> SchoolResult<FeeRecord> {
        let before = self.require(identifier)?;
        if before.is_deleted {
            return Err(SchoolError::Validation(format!(
                "Fee record {} is already deleted",
                before.id
            )));
        }

        let mut fee = before.clone();
        fee.soft_delete();
        self.save_update(&before, &fee, "deleted".to_string())?;
        Ok(fee)
    }

    /// Undo a soft delete
    pub fn restore(&self, identifier: &str) -> SchoolResult<FeeRecord> {
        let before = self.require(identifier)?;
        if !before.is_deleted {
            return Err(SchoolError::Validation(format!(
                "Fee record {} is not deleted",
                before.id
            )));
        }

        let mut fee = before.clone();
        fee.restore();
        self.save_update(&before, &fee, "restored".to_string())?;
        Ok(fee)
    }

    fn student(&self, id: StudentId) -> SchoolResult<Student> {
        self.storage
            .students
            .get(id)?
            .ok_or_else(|| SchoolError::student_not_found(id.to_string()))
    }

    fn save_update(&self, before: &FeeRecord, after: &FeeRecord, summary: String) -> SchoolResult<()> {
        let student_name = self.storage.students.get(after.student_id)?.map(|s| s.name);

        self.storage.fees.upsert(after.clone())?;
        self.storage.fees.save()?;
        self.storage.log_update(
            EntityType::FeeRecord,
            after.id.to_string(),
            student_name,
            before,
            after,
            Some(summary),
        )?;

        tracing::info!(fee = %after.id, "fee record updated");
        Ok(())
    }
}
