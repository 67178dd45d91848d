//! Fee ledger
//!
//! The fee filter and aggregator are pure functions over in-memory records:
//! the ledger is recomputed from the current fee records on every read and
//! never stored. `LedgerService` wires them to storage for the profile,
//! the ledger list, reminders and receipts.

use chrono::NaiveDate;

use crate::error::{SchoolError, SchoolResult};
use crate::models::{FeeRecord, LedgerStatus, LedgerSummary, Money, Student, StudentId};
use crate::storage::Storage;

/// Records belonging to `student_id` that have not been deleted
pub fn filter_student_fees<'a, I>(records: I, student_id: StudentId) -> Vec<&'a FeeRecord>
where
    I: IntoIterator<Item = &'a FeeRecord>,
{
    records
        .into_iter()
        .filter(|fee| fee.is_live_for(student_id))
        .collect()
}

/// Compute a ledger summary from already-filtered records and fee terms.
///
/// Negative amounts, agreed fees or back logs are rejected with
/// `SchoolError::InvalidInput`.
pub fn aggregate(
    records: &[&FeeRecord],
    total_agreed: Money,
    back_logs: Money,
) -> SchoolResult<LedgerSummary> {
    if total_agreed.is_negative() {
        return Err(SchoolError::InvalidInput(format!(
            "agreed fees cannot be negative: {}",
            total_agreed
        )));
    }
    if back_logs.is_negative() {
        return Err(SchoolError::InvalidInput(format!(
            "back logs cannot be negative: {}",
            back_logs
        )));
    }
    if let Some(bad) = records.iter().find(|fee| fee.amount.is_negative()) {
        return Err(SchoolError::InvalidInput(format!(
            "fee record {} has a negative amount: {}",
            bad.id, bad.amount
        )));
    }

    let mut paid: Vec<&FeeRecord> = records.iter().copied().filter(|fee| fee.is_paid()).collect();

    let paid_total = Money::checked_sum(paid.iter().map(|fee| fee.amount))
        .ok_or_else(|| too_large("paid total"))?;
    let total_liability = total_agreed
        .checked_add(back_logs)
        .ok_or_else(|| too_large("total liability"))?;
    let due_amount = total_liability.saturating_sub_floor(paid_total);
    let overpaid_amount = paid_total.saturating_sub_floor(total_liability);
    let progress_percent = progress_percent(paid_total, total_liability);
    let status = LedgerStatus::derive(total_liability, paid_total, due_amount);

    // Stable sort keeps input order among payments on the same date
    paid.sort_by(|a, b| b.date.cmp(&a.date));
    let (last_payment_amount, last_payment_date) = paid
        .first()
        .map(|fee| (fee.amount, Some(fee.date)))
        .unwrap_or((Money::zero(), None));

    Ok(LedgerSummary {
        total_agreed,
        total_liability,
        paid_total,
        due_amount,
        overpaid_amount,
        progress_percent,
        status,
        transaction_count: paid.len(),
        last_payment_amount,
        last_payment_date,
    })
}

/// Filter then aggregate for one student
pub fn summarize(student: &Student, records: &[FeeRecord]) -> SchoolResult<LedgerSummary> {
    let live = filter_student_fees(records, student.id);
    aggregate(&live, student.total_agreed_fees, student.back_logs)
}

fn too_large(what: &str) -> SchoolError {
    SchoolError::InvalidInput(format!("{} is too large to compute", what))
}

/// `paid / liability * 100`, rounded half up and capped at 100
fn progress_percent(paid_total: Money, total_liability: Money) -> u32 {
    if !total_liability.is_positive() {
        return 0;
    }
    let paid = i128::from(paid_total.cents().max(0));
    let liability = i128::from(total_liability.cents());
    let rounded = (paid * 200 + liability) / (liability * 2);
    rounded.min(100) as u32
}

/// A student with their ledger summary
#[derive(Debug, Clone)]
pub struct StudentLedger {
    pub student: Student,
    pub summary: LedgerSummary,
}

/// School-wide totals over a set of student ledgers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    pub students: usize,
    pub total_liability: Money,
    pub collected: Money,
    pub due: Money,
}

impl LedgerTotals {
    /// Sum the ledgers; fails with `InvalidInput` if a total overflows
    pub fn from_ledgers(ledgers: &[StudentLedger]) -> SchoolResult<Self> {
        ledgers.iter().try_fold(Self::default(), |acc, ledger| {
            let summary = &ledger.summary;
            Ok(Self {
                students: acc.students + 1,
                total_liability: acc
                    .total_liability
                    .checked_add(summary.total_liability)
                    .ok_or_else(|| too_large("school liability"))?,
                collected: acc
                    .collected
                    .checked_add(summary.paid_total)
                    .ok_or_else(|| too_large("school collection"))?,
                due: acc
                    .due
                    .checked_add(summary.due_amount)
                    .ok_or_else(|| too_large("school dues"))?,
            })
        })
    }
}

/// Service computing ledgers from stored records
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Ledger summary of one student
    pub fn summary_for(&self, student: &Student) -> SchoolResult<LedgerSummary> {
        let records = self.storage.fees.get_by_student(student.id)?;
        let summary = summarize(student, &records)?;
        tracing::debug!(
            student = %student.id,
            status = %summary.status,
            due = summary.due_amount.cents(),
            "ledger computed"
        );
        Ok(summary)
    }

    /// Ledgers of every student, optionally including those who left and
    /// optionally restricted to one status
    pub fn list(
        &self,
        include_inactive: bool,
        status: Option<LedgerStatus>,
    ) -> SchoolResult<Vec<StudentLedger>> {
        let all_fees = self.storage.fees.get_all()?;
        let mut ledgers = Vec::new();

        for student in self.storage.students.get_all()? {
            if !include_inactive && !student.active {
                continue;
            }
            let summary = summarize(&student, &all_fees)?;
            if status.is_some_and(|s| s != summary.status) {
                continue;
            }
            ledgers.push(StudentLedger { student, summary });
        }

        Ok(ledgers)
    }

    /// Paid, non-deleted records of a student, newest first
    pub fn payment_history(&self, student: &Student) -> SchoolResult<Vec<FeeRecord>> {
        Ok(self
            .storage
            .fees
            .get_by_student(student.id)?
            .into_iter()
            .filter(|fee| fee.is_live_for(student.id) && fee.is_paid())
            .collect())
    }

    /// Payments received within a date range (inclusive), across all students
    pub fn collected_between(&self, start: NaiveDate, end: NaiveDate) -> SchoolResult<Money> {
        let fees = self.storage.fees.get_all()?;
        Money::checked_sum(
            fees.iter()
                .filter(|fee| !fee.is_deleted && fee.is_paid())
                .filter(|fee| fee.date >= start && fee.date <= end)
                .map(|fee| fee.amount),
        )
        .ok_or_else(|| too_large("amount collected"))
    }
}
