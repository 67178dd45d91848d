//! YAML Export functionality
//!
//! Exports the complete database to YAML format for human-readable backup.

use crate::config::Settings;
use crate::error::{SchoolError, SchoolResult};
use crate::export::json::FullExport;
use crate::storage::Storage;
use std::io::Write;

fn export_error(e: impl std::fmt::Display) -> SchoolError {
    SchoolError::Export(e.to_string())
}

/// Export the full database to YAML format
pub fn export_full_yaml<W: Write>(
    storage: &Storage,
    settings: &Settings,
    writer: &mut W,
) -> SchoolResult<()> {
    let export = FullExport::from_storage(storage, settings)?;
    export.validate().map_err(SchoolError::Export)?;

    writeln!(writer, "# SchoolBook Full Database Export").map_err(export_error)?;
    writeln!(writer, "# School: {}", export.school_name).map_err(export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_error)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_error)?;
    writeln!(writer, "#").map_err(export_error)?;
    writeln!(
        writer,
        "# Contains student contact details. Store it securely."
    )
    .map_err(export_error)?;
    writeln!(writer).map_err(export_error)?;

    serde_yaml::to_writer(writer, &export).map_err(export_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SchoolPaths;
    use crate::models::{Money, Student};
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SchoolPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let student = Student::with_fees("Asha", "8", Money::from_units(5000), Money::zero());
        storage.students.upsert(student).unwrap();

        let mut output = Vec::new();
        export_full_yaml(&storage, &Settings::default(), &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();

        assert!(yaml.starts_with("# SchoolBook Full Database Export"));
        assert!(yaml.contains("name: Asha"));

        // Comments are ignored by the parser
        let parsed: FullExport = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.students.len(), 1);
        assert_eq!(parsed.metadata.student_count, 1);
    }
}
