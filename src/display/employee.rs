//! Employee display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{date_or_na, or_na};
use crate::config::Settings;
use crate::models::Employee;

#[derive(Tabled)]
struct EmployeeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Designation")]
    designation: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "PIN")]
    pin: String,
    #[tabled(rename = "Status")]
    state: String,
}

/// Format the staff list as a table. PINs are only shown as set/unset.
pub fn format_employee_list(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "No employees found.".to_string();
    }

    let rows: Vec<EmployeeRow> = employees
        .iter()
        .map(|e| EmployeeRow {
            id: e.id.to_string(),
            name: e.name.clone(),
            designation: or_na(&e.designation).to_string(),
            department: or_na(&e.department).to_string(),
            phone: or_na(&e.phone).to_string(),
            pin: if e.pin.is_some() { "set" } else { "-" }.to_string(),
            state: if e.active { "Active" } else { "Inactive" }.to_string(),
        })
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format a single employee's details
pub fn format_employee_details(settings: &Settings, employee: &Employee) -> String {
    let mut output = String::new();

    output.push_str(&format!("Employee: {}\n", employee.name));
    output.push_str(&format!("  ID:           {}\n", employee.id));
    output.push_str(&format!("  Designation:  {}\n", or_na(&employee.designation)));
    output.push_str(&format!("  Department:   {}\n", or_na(&employee.department)));
    output.push_str(&format!("  Phone:        {}\n", or_na(&employee.phone)));
    output.push_str(&format!("  Email:        {}\n", or_na(&employee.email)));
    output.push_str(&format!(
        "  Born:         {}\n",
        date_or_na(settings, employee.date_of_birth)
    ));
    output.push_str(&format!(
        "  Joined:       {}\n",
        date_or_na(settings, employee.joining_date)
    ));
    output.push_str(&format!(
        "  Salary:       {}\n",
        settings.format_money(employee.salary)
    ));
    output.push_str(&format!(
        "  PIN:          {}\n",
        if employee.pin.is_some() { "set" } else { "not set" }
    ));
    output.push_str(&format!(
        "  Active:       {}\n",
        if employee.active { "Yes" } else { "No" }
    ));

    output
}
