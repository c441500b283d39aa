use crate::error::ExportError;
use crate::sum::{ParameterSummary, SumSession};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Summary table with the settings it was computed at.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport<'a> {
    pub source: &'a str,
    pub element_ids: &'a [u64],
    pub selected_ratio: f64,
    pub value_rounding: i32,
    pub parameters: &'a [ParameterSummary],
}

impl<'a> SummaryReport<'a> {
    #[must_use]
    pub fn new(source: &'a str, element_ids: &'a [u64], session: &'a SumSession) -> Self {
        Self {
            source,
            element_ids,
            selected_ratio: session.ratio(),
            value_rounding: session.rounding(),
            parameters: session.summaries(),
        }
    }
}

pub fn export_json<P: AsRef<Path>>(report: &SummaryReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let json = serde_json::to_string_pretty(report)?;

    let mut file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}
