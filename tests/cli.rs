use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn schoolbook(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("schoolbook").unwrap();
    cmd.env("SCHOOLBOOK_DATA_DIR", dir.path())
        .env_remove("SCHOOLBOOK_PIN")
        .env_remove("RUST_LOG");
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    schoolbook(&dir).arg("init").assert().success();
    schoolbook(&dir)
        .args([
            "student", "add", "Asha Verma", "--class", "8", "--section", "B", "--admission-no",
            "A-101", "--guardian", "Meena", "--fees", "12000", "--back-logs", "500",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added student: Asha Verma (8-B)"));
    dir
}

#[test]
fn init_creates_data_files() {
    let dir = TempDir::new().unwrap();
    schoolbook(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("students.json").exists());
}

#[test]
fn payment_updates_ledger_status() {
    let dir = setup();

    schoolbook(&dir)
        .args(["ledger", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unpaid"));

    schoolbook(&dir)
        .args(["fee", "pay", "A-101", "4500", "--date", "2025-04-05", "--mode", "upi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded ₹4,500 from Asha Verma on 05 Apr 2025"))
        .stdout(predicate::str::contains("Due now: ₹8,000  (Partial)"));

    schoolbook(&dir)
        .args(["ledger", "list", "--status", "partial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Asha Verma"))
        .stdout(predicate::str::contains("Collected: ₹4,500"));

    schoolbook(&dir)
        .args(["ledger", "list", "--status", "paid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No students match."));
}

#[test]
fn negative_payment_is_rejected() {
    let dir = setup();
    schoolbook(&dir)
        .args(["fee", "pay", "A-101", "-200"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn reminder_and_receipt() {
    let dir = setup();

    schoolbook(&dir)
        .args(["ledger", "remind", "asha verma"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dear Meena,"))
        .stdout(predicate::str::contains("fees of ₹12,500 are due"));

    schoolbook(&dir)
        .args(["ledger", "receipt", "A-101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no recorded payments"));

    schoolbook(&dir)
        .args(["fee", "pay", "A-101", "12500", "--date", "2025-05-01"])
        .assert()
        .success();

    schoolbook(&dir)
        .args(["ledger", "receipt", "A-101"])
        .assert()
        .success()
        .stdout(predicate::str::contains("We have received ₹12,500"))
        .stdout(predicate::str::contains("All fees are now cleared."));

    schoolbook(&dir)
        .args(["ledger", "remind", "A-101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no outstanding dues"));
}

#[test]
fn transfer_certificate_after_leaving() {
    let dir = setup();

    schoolbook(&dir)
        .args(["document", "tc", "A-101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still enrolled"));

    schoolbook(&dir)
        .args(["student", "leave", "A-101", "--date", "2025-03-31"])
        .assert()
        .success();

    schoolbook(&dir)
        .args(["document", "tc", "A-101", "--date", "2025-04-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TRANSFER CERTIFICATE"))
        .stdout(predicate::str::contains("₹12,500 outstanding (Unpaid)"));
}

#[test]
fn lock_gate_blocks_changes_without_credential() {
    let dir = setup();
    schoolbook(&dir)
        .args(["config", "set", "lock.admin_pin", "2468"])
        .assert()
        .success();
    schoolbook(&dir)
        .args(["config", "set", "lock.enabled", "true"])
        .assert()
        .success();

    // Reading stays open
    schoolbook(&dir).args(["ledger", "list"]).assert().success();

    schoolbook(&dir)
        .args(["--pin", "0000", "fee", "pay", "A-101", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Locked"));

    schoolbook(&dir)
        .env("SCHOOLBOOK_PIN", "2468")
        .args(["fee", "pay", "A-101", "100"])
        .assert()
        .success();

    schoolbook(&dir)
        .args(["audit", "--entity", "fee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by admin"));
}

#[test]
fn employee_unlocks_with_date_of_birth() {
    let dir = setup();
    schoolbook(&dir)
        .args([
            "employee", "add", "Sunita Rao", "--designation", "Teacher", "--dob", "1985-06-01",
        ])
        .assert()
        .success();
    schoolbook(&dir)
        .args(["config", "set", "lock.admin_pin", "2468"])
        .assert()
        .success();
    schoolbook(&dir)
        .args(["config", "set", "lock.enabled", "yes"])
        .assert()
        .success();

    schoolbook(&dir)
        .args(["--as", "sunita rao", "--dob", "1985-06-01", "unlock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Credential accepted."));

    schoolbook(&dir)
        .args(["--as", "sunita rao", "--dob", "1990-01-01", "unlock"])
        .assert()
        .failure();
}

#[test]
fn ledger_csv_export() {
    let dir = setup();
    let out = dir.path().join("ledger.csv");

    schoolbook(&dir)
        .args(["export", "ledger"])
        .arg(&out)
        .assert()
        .success();

    let csv = std::fs::read_to_string(out).unwrap();
    assert!(csv.starts_with("Student ID,Name,Class"));
    assert!(csv.contains("Asha Verma,8-B,A-101,12000.00,500.00,12500.00,0.00,12500.00"));
}
