//! YAML Export functionality
//!
//! Exports a session snapshot to YAML format for human-readable review.

use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::export::json::SessionExport;
use crate::session::Session;

/// Export the session to YAML format
pub fn export_session_yaml<W: Write>(session: &Session, writer: &mut W) -> FinanceResult<()> {
    let export = SessionExport::from_session(session);

    writeln!(writer, "# ContaCerta Session Export")?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a YAML export
pub fn import_from_yaml(yaml_str: &str) -> FinanceResult<SessionExport> {
    let export: SessionExport = serde_yaml::from_str(yaml_str)?;
    export.validate().map_err(FinanceError::Export)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::sample_session;

    #[test]
    fn test_yaml_export() {
        let mut yaml_output = Vec::new();
        export_session_yaml(&sample_session(), &mut yaml_output).unwrap();

        let yaml_string = String::from_utf8(yaml_output).unwrap();

        assert!(yaml_string.starts_with("# ContaCerta Session Export"));
        assert!(yaml_string.contains("Alimentação"));
        assert!(yaml_string.contains("Viagem"));
        assert!(yaml_string.contains("first_step"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut yaml_output = Vec::new();
        export_session_yaml(&sample_session(), &mut yaml_output).unwrap();
        let yaml_string = String::from_utf8(yaml_output).unwrap();

        // Comments are valid YAML, no need to strip them
        let imported = import_from_yaml(&yaml_string).unwrap();

        assert_eq!(imported.goals.len(), 1);
        assert_eq!(imported.goals[0].name, "Viagem");
        assert_eq!(imported.progression.level, 1);
    }
}
