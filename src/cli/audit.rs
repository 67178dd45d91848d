//! Audit log CLI command

use crate::audit::EntityType;
use crate::error::{SchoolError, SchoolResult};
use crate::storage::Storage;

fn parse_entity(value: &str) -> SchoolResult<EntityType> {
    match value.trim().to_lowercase().as_str() {
        "student" | "students" => Ok(EntityType::Student),
        "employee" | "employees" | "staff" => Ok(EntityType::Employee),
        "fee" | "fees" => Ok(EntityType::FeeRecord),
        other => Err(SchoolError::InvalidInput(format!(
            "Unknown record type '{}'. Valid: student, employee, fee",
            other
        ))),
    }
}

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, limit: usize, entity: Option<String>) -> SchoolResult<()> {
    let entity = entity.as_deref().map(parse_entity).transpose()?;

    let mut entries = storage.audit().read_all()?;
    if let Some(entity) = entity {
        entries.retain(|e| e.entity_type == entity);
    }
    let start = entries.len().saturating_sub(limit);

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }
    for entry in &entries[start..] {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
