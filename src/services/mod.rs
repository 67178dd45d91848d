//! Service layer for SchoolBook
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, the fee ledger, and audit logging of every change.

pub mod employee;
pub mod fee;
pub mod ledger;
pub mod lock;
pub mod messages;
pub mod student;

pub use employee::{EmployeeInput, EmployeeService};
pub use fee::{CreateFeeInput, FeeService};
pub use ledger::{LedgerService, LedgerTotals, StudentLedger};
pub use lock::{Credential, Identity, LockScreen, LockState};
pub use student::{CreateStudentInput, StudentService, UpdateStudentInput};
