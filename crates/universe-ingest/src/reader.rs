//! Record-by-record reader over a headerful delimited source.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use universe_model::RawRow;

use crate::error::{IngestError, Result};
use crate::source::{SourceDigest, TrackingReader, open_buffered};

/// Parsing options shared by inspection and re-streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Collect per-column distinct values while inspecting.
    pub collect_values: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            collect_values: false,
        }
    }
}

impl IngestOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_values(mut self, collect_values: bool) -> Self {
        self.collect_values = collect_values;
        self
    }
}

/// Streams [`RawRow`]s from a source, one record at a time.
///
/// The first record is the header row. Empty lines are skipped; a line of
/// delimiters or whitespace is still a record. Short rows yield absent cells,
/// extra cells beyond the header count are ignored, and empty cells are
/// absent rather than the empty string. After the first error the iterator is exhausted.
pub struct RowReader<'a, R: Read> {
    reader: csv::Reader<TrackingReader<'a, BufReader<R>>>,
    headers: Vec<String>,
    record: StringRecord,
    rows_read: usize,
    done: bool,
}

impl<R: Read> std::fmt::Debug for RowReader<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowReader")
            .field("headers", &self.headers)
            .field("rows_read", &self.rows_read)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<R: Read> RowReader<'static, R> {
    /// Opens a reader and consumes the header row.
    pub fn new(reader: R, options: &IngestOptions) -> Result<Self> {
        Self::build(reader, options, None)
    }
}

impl<'a, R: Read> RowReader<'a, R> {
    /// Opens a reader that reports the byte offset consumed so far.
    pub fn with_progress(
        reader: R,
        options: &IngestOptions,
        progress: impl FnMut(u64) + 'a,
    ) -> Result<Self> {
        Self::build(reader, options, Some(Box::new(progress)))
    }

    fn build(
        reader: R,
        options: &IngestOptions,
        progress: Option<Box<dyn FnMut(u64) + 'a>>,
    ) -> Result<Self> {
        let source = TrackingReader::new(open_buffered(reader)?, progress);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.delimiter)
            .from_reader(source);

        let mut record = StringRecord::new();
        if !reader.read_record(&mut record)? {
            return Err(IngestError::MissingHeader);
        }
        let headers: Vec<String> = record
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let raw = if idx == 0 {
                    raw.trim_start_matches('\u{feff}')
                } else {
                    raw
                };
                raw.to_string()
            })
            .collect();
        if headers.iter().all(|header| header.trim().is_empty()) {
            return Err(IngestError::MissingHeader);
        }
        tracing::debug!(columns = headers.len(), "read header row");

        Ok(Self {
            reader,
            headers,
            record,
            rows_read: 0,
            done: false,
        })
    }

    /// Header row, verbatim.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows yielded so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn bytes_read(&self) -> u64 {
        self.reader.get_ref().bytes_read()
    }

    /// Digest of the bytes consumed so far; covers the whole source once the
    /// iterator is exhausted.
    pub fn digest(&self) -> SourceDigest {
        self.reader.get_ref().digest()
    }

    fn next_row(&mut self) -> Result<Option<RawRow>> {
        loop {
            if !self.reader.read_record(&mut self.record)? {
                return Ok(None);
            }
            if is_empty_line(&self.record) {
                continue;
            }
            let mut row = RawRow::new();
            for (idx, header) in self.headers.iter().enumerate() {
                row.push(header.clone(), self.record.get(idx).map(str::to_string));
            }
            return Ok(Some(row));
        }
    }
}

impl<R: Read> Iterator for RowReader<'_, R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_row() {
            Ok(Some(row)) => {
                self.rows_read += 1;
                Some(Ok(row))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn is_empty_line(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

/// Opens a file for record-by-record reading.
pub fn open_rows(path: &Path, options: &IngestOptions) -> Result<RowReader<'static, File>> {
    RowReader::new(open_file(path)?, options)
}

pub(crate) fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::Io { source: e }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(input: &str) -> Vec<RawRow> {
        RowReader::new(input.as_bytes(), &IngestOptions::default())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn empty_cells_are_absent() {
        let rows = rows("Name,City\nAda,\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Name"), Some("Ada"));
        assert_eq!(rows[0].get("City"), None);
        assert!(rows[0].contains_header("City"));
    }

    #[test]
    fn only_empty_lines_are_skipped() {
        let rows = rows("Name,City\n\n,\n  ,\t\nAda,London\n");
        assert_eq!(rows.len(), 3);

        assert!(rows[0].contains_header("Name"));
        assert_eq!(rows[0].get("Name"), None);
        assert_eq!(rows[0].get("City"), None);

        assert_eq!(rows[1].get("Name"), Some("  "));
        assert_eq!(rows[1].get("City"), Some("\t"));

        assert_eq!(rows[2].get("City"), Some("London"));
    }

    #[test]
    fn empty_line_check_needs_a_single_empty_field() {
        assert!(is_empty_line(&StringRecord::from(vec![""])));
        assert!(!is_empty_line(&StringRecord::from(vec!["", ""])));
        assert!(!is_empty_line(&StringRecord::from(vec![" "])));
    }

    #[test]
    fn short_and_long_rows() {
        let rows = rows("A,B,C\n1\n1,2,3,4\n");
        assert_eq!(rows[0].get("A"), Some("1"));
        assert_eq!(rows[0].get("B"), None);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].get("C"), Some("3"));
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn header_bom_is_stripped() {
        let reader =
            RowReader::new("\u{feff}Name,City\n".as_bytes(), &IngestOptions::default()).unwrap();
        assert_eq!(reader.headers(), &["Name".to_string(), "City".to_string()]);
    }

    #[test]
    fn blank_header_is_missing() {
        let err = RowReader::new(" , \n1,2\n".as_bytes(), &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::MissingHeader));
        let err = RowReader::new("".as_bytes(), &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::MissingHeader));
    }

    #[test]
    fn custom_delimiter() {
        let options = IngestOptions::default().with_delimiter(b';');
        let reader = RowReader::new("Name;City\nAda;London\n".as_bytes(), &options).unwrap();
        let rows: Vec<RawRow> = reader.map(|row| row.unwrap()).collect();
        assert_eq!(rows[0].get("City"), Some("London"));
    }

    #[test]
    fn stops_after_error() {
        let mut input = b"Name\nAda\n".to_vec();
        input.extend_from_slice(&[0xFF, 0xFE, b'\n']);
        input.extend_from_slice(b"Bob\n");
        let mut reader = RowReader::new(&input[..], &IngestOptions::default()).unwrap();

        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, IngestError::Parse { line: 3, .. }));
        assert!(reader.next().is_none());
    }
}
