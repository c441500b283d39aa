use crate::error::ExportError;
use crate::sum::SumSession;
use std::fs::File;
use std::path::Path;

/// Writes one row per summary, values formatted at the session's rounding.
pub fn export_csv<P: AsRef<Path>>(session: &SumSession, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(["Parameter", "Sum", "Unit", "Ratio", "Coefficient"])?;

    let ratio = session.ratio().to_string();
    for summary in session.summaries() {
        writer.write_record([
            summary.name.as_str(),
            session.format_sum(summary).as_str(),
            summary.unit_label.as_str(),
            ratio.as_str(),
            session.format_coefficient(summary).as_str(),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}
