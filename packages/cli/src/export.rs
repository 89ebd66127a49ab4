//! Ledger and report export.

use std::io::Write;
use std::path::Path;

use residency_audit::LedgerEntry;

use crate::PipelineError;
use crate::pipeline::AuditReport;

/// Writes the ledger as CSV with `DATE,STATUS` columns.
///
/// # Errors
///
/// Returns [`PipelineError::Csv`] if a row cannot be written.
pub fn write_ledger_csv<W: Write>(writer: W, entries: &[LedgerEntry]) -> Result<(), PipelineError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if entries.is_empty() {
        csv_writer.write_record(["DATE", "STATUS"])?;
    }
    for entry in entries {
        csv_writer.serialize(entry)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes the ledger CSV to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`PipelineError`] if the file cannot be created or written.
pub fn write_ledger_file(path: &Path, entries: &[LedgerEntry]) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let file = std::fs::File::create(path).map_err(|e| PipelineError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    write_ledger_csv(file, entries)?;

    log::info!("Wrote {} ledger rows to {}", entries.len(), path.display());
    Ok(())
}

/// Serializes the full report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`PipelineError::Json`] if serialization fails.
pub fn report_json(report: &AuditReport) -> Result<String, PipelineError> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use residency_audit::DayStatus;

    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let entries = vec![
            LedgerEntry {
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                status: DayStatus::Inside,
            },
            LedgerEntry {
                date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                status: DayStatus::International,
            },
        ];
        let mut buf = Vec::new();
        write_ledger_csv(&mut buf, &entries).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "DATE,STATUS\n2024-03-01,INSIDE\n2024-03-02,INTERNATIONAL\n"
        );
    }

    #[test]
    fn empty_ledger_still_has_header() {
        let mut buf = Vec::new();
        write_ledger_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "DATE,STATUS\n");
    }
}
