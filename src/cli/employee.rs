//! Employee CLI commands

use clap::{Args, Subcommand};

use super::{parse_optional_date, parse_optional_money};
use crate::config::Settings;
use crate::display::{format_employee_details, format_employee_list};
use crate::error::SchoolResult;
use crate::services::{EmployeeInput, EmployeeService};
use crate::storage::Storage;

/// Optional employee fields shared by `add` and `edit`
#[derive(Args)]
pub struct EmployeeFields {
    #[arg(short, long)]
    pub designation: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short, long)]
    pub email: Option<String>,
    /// Date of birth (YYYY-MM-DD); also used to unlock with --as
    #[arg(long)]
    pub dob: Option<String>,
    /// Joining date (YYYY-MM-DD)
    #[arg(long)]
    pub joined: Option<String>,
    /// Monthly salary
    #[arg(short, long, allow_hyphen_values = true)]
    pub salary: Option<String>,
    /// Unlock PIN (4-6 digits)
    #[arg(long)]
    pub pin: Option<String>,
}

impl EmployeeFields {
    fn into_input(self, name: Option<String>) -> SchoolResult<EmployeeInput> {
        Ok(EmployeeInput {
            name,
            designation: self.designation,
            department: self.department,
            phone: self.phone,
            email: self.email,
            date_of_birth: parse_optional_date(self.dob)?,
            joining_date: parse_optional_date(self.joined)?,
            salary: parse_optional_money(self.salary)?,
            pin: self.pin,
        })
    }
}

/// Employee subcommands
#[derive(Subcommand)]
pub enum EmployeeCommands {
    /// Add a member of staff
    Add {
        /// Employee name
        name: String,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    /// List staff
    List {
        /// Include former staff
        #[arg(short, long)]
        all: bool,
    },
    /// Show employee details
    Show {
        /// Name, phone or ID
        employee: String,
    },
    /// Edit employee details
    Edit {
        /// Name, phone or ID
        employee: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    /// Mark an employee as no longer working here
    Deactivate {
        /// Name, phone or ID
        employee: String,
    },
    /// Delete an employee record
    Delete {
        /// Name, phone or ID
        employee: String,
    },
}

impl EmployeeCommands {
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::List { .. } | Self::Show { .. })
    }
}

/// Handle an employee command
pub fn handle_employee_command(
    storage: &Storage,
    settings: &Settings,
    cmd: EmployeeCommands,
) -> SchoolResult<()> {
    let service = EmployeeService::new(storage);

    match cmd {
        EmployeeCommands::Add { name, fields } => {
            let employee = service.create(fields.into_input(Some(name))?)?;
            println!("Added employee: {}", employee.name);
            println!("  ID: {}", employee.id);
        }

        EmployeeCommands::List { all } => {
            println!("{}", format_employee_list(&service.list(all)?));
        }

        EmployeeCommands::Show { employee } => {
            let employee = service.require(&employee)?;
            print!("{}", format_employee_details(settings, &employee));
        }

        EmployeeCommands::Edit {
            employee,
            name,
            fields,
        } => {
            let found = service.require(&employee)?;
            let updated = service.update(found.id, fields.into_input(name)?)?;
            println!("Updated employee: {}", updated.name);
        }

        EmployeeCommands::Deactivate { employee } => {
            let found = service.require(&employee)?;
            let employee = service.deactivate(found.id)?;
            println!("Deactivated employee: {}", employee.name);
        }

        EmployeeCommands::Delete { employee } => {
            let found = service.require(&employee)?;
            let employee = service.delete(found.id)?;
            println!("Deleted employee: {}", employee.name);
        }
    }

    Ok(())
}
