//! Core data models for SchoolBook
//!
//! Students, employees, fee records and the derived fee ledger summary.

pub mod employee;
pub mod fee;
pub mod ids;
pub mod ledger;
pub mod money;
pub mod student;

pub use employee::Employee;
pub use fee::{FeeRecord, FeeStatus, PaymentMode};
pub use ids::{EmployeeId, FeeId, StudentId};
pub use ledger::{LedgerStatus, LedgerSummary};
pub use money::Money;
pub use student::Student;
