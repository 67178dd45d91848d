use anyhow::Result;
use clap::{Parser, Subcommand};

use schoolbook::cli::{
    handle_audit_command, handle_config_command, handle_document_command,
    handle_employee_command, handle_export_command, handle_fee_command, handle_ledger_command,
    handle_student_command, parse_date, ConfigCommands, DocumentCommands, EmployeeCommands,
    ExportCommands, FeeCommands, LedgerCommands, StudentCommands,
};
use schoolbook::config::{SchoolPaths, Settings};
use schoolbook::error::{SchoolError, SchoolResult};
use schoolbook::services::{Credential, Identity, LockScreen};
use schoolbook::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "schoolbook",
    version,
    about = "Student records and fee ledger for small schools",
    long_about = "SchoolBook keeps student and staff records for a small school and \
                  tracks every student's fees: what was agreed, what has been paid \
                  and what is still due. It composes fee reminders and receipts, \
                  prints ID cards and transfer certificates, and exports the ledger."
)]
struct Cli {
    /// Unlock PIN (admin or employee)
    #[arg(long, env = "SCHOOLBOOK_PIN", hide_env_values = true)]
    pin: Option<String>,

    /// Unlock as this employee (name, phone or ID); needs --dob
    #[arg(long = "as", value_name = "EMPLOYEE", requires = "dob")]
    as_employee: Option<String>,

    /// Date of birth of the --as employee (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", requires = "as_employee")]
    dob: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data files
    Init,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    /// Student records and fee terms
    #[command(subcommand)]
    Student(StudentCommands),

    /// Staff records
    #[command(subcommand, alias = "staff")]
    Employee(EmployeeCommands),

    /// Payments and charges
    #[command(subcommand)]
    Fee(FeeCommands),

    /// Fee ledger, reminders and receipts
    #[command(subcommand)]
    Ledger(LedgerCommands),

    /// ID cards and transfer certificates
    #[command(subcommand, alias = "doc")]
    Document(DocumentCommands),

    /// Export data to CSV, JSON or YAML
    #[command(subcommand)]
    Export(ExportCommands),

    /// Check a credential against the lock
    Unlock,

    /// Show recent changes
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        /// Only this kind of record (student, employee, fee)
        #[arg(short, long)]
        entity: Option<String>,
    },
}

impl Commands {
    /// Commands that need the lock open when it is enabled
    fn requires_unlock(&self) -> bool {
        match self {
            Commands::Student(cmd) => cmd.is_mutating(),
            Commands::Employee(cmd) => cmd.is_mutating(),
            Commands::Fee(cmd) => cmd.is_mutating(),
            Commands::Config { action } => matches!(action, Some(ConfigCommands::Set { .. })),
            Commands::Export(_) | Commands::Unlock => true,
            Commands::Init
            | Commands::Ledger(_)
            | Commands::Document(_)
            | Commands::Audit { .. } => false,
        }
    }
}

/// Build the credential from the command line, if one was given
fn credential_from_args(cli: &Cli) -> SchoolResult<Option<Credential>> {
    if let (Some(employee), Some(dob)) = (&cli.as_employee, &cli.dob) {
        return Ok(Some(Credential::DateOfBirth {
            employee: employee.clone(),
            dob: parse_date(dob)?,
        }));
    }
    Ok(cli.pin.clone().map(Credential::Pin))
}

/// Run the lock gate and return who unlocked it
fn unlock(cli: &Cli, settings: &Settings, storage: &Storage) -> SchoolResult<Identity> {
    let mut screen = LockScreen::new(&settings.lock);
    if let Some(identity) = screen.identity() {
        return Ok(identity.clone());
    }

    let employees = storage.employees.get_all()?;

    if let Some(credential) = credential_from_args(cli)? {
        return screen.attempt(&credential, &employees).cloned();
    }

    loop {
        let pin = rpassword::prompt_password("PIN: ")
            .map_err(|e| SchoolError::Locked(format!("locked; no PIN given ({})", e)))?;
        let result = screen.attempt(&Credential::Pin(pin), &employees).cloned();
        match result {
            Ok(identity) => return Ok(identity),
            Err(e) if screen.remaining_attempts() > 0 => eprintln!("{}", e),
            Err(e) => return Err(e),
        }
    }
}

fn main() -> Result<()> {
    schoolbook::init_tracing();
    let cli = Cli::parse();

    let paths = SchoolPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let Some(command) = cli.command.as_ref() else {
        println!("SchoolBook - student records and fee ledger");
        println!();
        println!("Run 'schoolbook init' to set up, then 'schoolbook --help' for usage.");
        return Ok(());
    };

    if settings.lock.enabled && command.requires_unlock() {
        let identity = unlock(&cli, &settings, &storage)?;
        tracing::debug!(identity = %identity, "lock gate passed");
        storage.set_actor(Some(identity.actor()));
    }

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing SchoolBook at: {}", paths.base_dir().display());
            initialize_storage(&paths, &settings)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  schoolbook config set school_name \"Your School\"");
            println!("  schoolbook student add \"Student Name\" --class 5 --fees 12000");
        }
        Some(Commands::Config { action }) => {
            handle_config_command(&paths, &mut settings, action)?;
        }
        Some(Commands::Student(cmd)) => handle_student_command(&storage, &settings, cmd)?,
        Some(Commands::Employee(cmd)) => handle_employee_command(&storage, &settings, cmd)?,
        Some(Commands::Fee(cmd)) => handle_fee_command(&storage, &settings, cmd)?,
        Some(Commands::Ledger(cmd)) => handle_ledger_command(&storage, &settings, cmd)?,
        Some(Commands::Document(cmd)) => handle_document_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::Unlock) => {
            if settings.lock.enabled {
                println!("Credential accepted.");
            } else {
                println!("The lock is disabled. Enable it with 'schoolbook config set lock.enabled true'.");
            }
        }
        Some(Commands::Audit { limit, entity }) => handle_audit_command(&storage, limit, entity)?,
        None => {}
    }

    Ok(())
}
