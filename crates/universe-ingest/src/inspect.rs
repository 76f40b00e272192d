//! Single-pass inspection of an uploaded source.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::reader::{IngestOptions, RowReader, open_file};

/// What one pass over a source reveals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Header row, verbatim and in file order.
    pub headers: Vec<String>,
    /// Number of data rows.
    pub record_count: usize,
    /// Distinct non-empty values per header, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_values: Option<BTreeMap<String, BTreeSet<String>>>,
    pub bytes_read: u64,
    /// Lowercase hex SHA-256 of the source bytes.
    pub fingerprint: String,
}

impl IngestSummary {
    /// Distinct values seen for a header.
    pub fn values_for(&self, header: &str) -> Option<&BTreeSet<String>> {
        self.column_values.as_ref()?.get(header)
    }
}

/// Inspects a source without materializing it.
pub fn inspect_reader<R: Read>(reader: R, options: &IngestOptions) -> Result<IngestSummary> {
    summarize(RowReader::new(reader, options)?, options)
}

/// Like [`inspect_reader`], reporting the byte offset consumed so far.
pub fn inspect_reader_with_progress<'a, R: Read>(
    reader: R,
    options: &IngestOptions,
    progress: impl FnMut(u64) + 'a,
) -> Result<IngestSummary> {
    summarize(RowReader::with_progress(reader, options, progress)?, options)
}

/// Inspects a file on disk.
pub fn inspect_path(path: &Path, options: &IngestOptions) -> Result<IngestSummary> {
    let summary = inspect_reader(open_file(path)?, options)?;
    log_inspected(path, &summary);
    Ok(summary)
}

/// Like [`inspect_path`], reporting the byte offset consumed so far.
pub fn inspect_path_with_progress<'a>(
    path: &Path,
    options: &IngestOptions,
    progress: impl FnMut(u64) + 'a,
) -> Result<IngestSummary> {
    let summary = inspect_reader_with_progress(open_file(path)?, options, progress)?;
    log_inspected(path, &summary);
    Ok(summary)
}

fn log_inspected(path: &Path, summary: &IngestSummary) {
    tracing::info!(
        path = %path.display(),
        columns = summary.headers.len(),
        records = summary.record_count,
        bytes = summary.bytes_read,
        "inspected source"
    );
}

fn summarize<R: Read>(mut rows: RowReader<'_, R>, options: &IngestOptions) -> Result<IngestSummary> {
    let headers = rows.headers().to_vec();
    let mut column_values: Option<BTreeMap<String, BTreeSet<String>>> =
        options.collect_values.then(|| {
            headers
                .iter()
                .map(|header| (header.clone(), BTreeSet::new()))
                .collect()
        });

    for row in rows.by_ref() {
        let row = row?;
        if let Some(values) = column_values.as_mut() {
            for (header, set) in values.iter_mut() {
                if let Some(value) = row.get(header) {
                    if !set.contains(value) {
                        set.insert(value.to_string());
                    }
                }
            }
        }
    }

    let digest = rows.digest();
    Ok(IngestSummary {
        headers,
        record_count: rows.rows_read(),
        column_values,
        bytes_read: digest.bytes_read,
        fingerprint: digest.fingerprint,
    })
}
