use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use csv::{ByteRecord, ReaderBuilder};
use tracing::debug;

use crate::importer::application::domain::entities::{CsvRow, RowReadError, TopicCsvRecord};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where the input file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvSource {
    File(PathBuf),
    /// The newest `.csv` file in the directory is used.
    Directory(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum CsvReaderError {
    #[error("No CSV file found at {0}")]
    NotFound(PathBuf),

    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid CSV header in {path}: {source}")]
    Header {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> CsvReaderError + '_ {
    move |source| CsvReaderError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub fn locate_csv(source: &CsvSource) -> Result<PathBuf, CsvReaderError> {
    match source {
        CsvSource::File(path) => {
            if path.is_file() {
                Ok(path.clone())
            } else {
                Err(CsvReaderError::NotFound(path.clone()))
            }
        }
        CsvSource::Directory(dir) => {
            let mut newest: Option<(SystemTime, PathBuf)> = None;

            for entry in fs::read_dir(dir).map_err(io_err(dir))? {
                let entry = entry.map_err(io_err(dir))?;
                let path = entry.path();
                let is_csv = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
                if !is_csv || !path.is_file() {
                    continue;
                }

                let modified = entry
                    .metadata()
                    .and_then(|m| m.modified())
                    .map_err(io_err(&path))?;
                if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
                    newest = Some((modified, path));
                }
            }

            let (_, path) = newest.ok_or_else(|| CsvReaderError::NotFound(dir.clone()))?;
            debug!("Using newest CSV file {}", path.display());
            Ok(path)
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>, CsvReaderError> {
    let mut reader = BufReader::new(File::open(path).map_err(io_err(path))?);
    if reader.fill_buf().map_err(io_err(path))?.starts_with(UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
    }
    Ok(reader)
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}

/// Number of data rows, header excluded. Malformed rows and blank lines
/// between rows count too, so the total matches the last row number.
pub fn count_rows(path: &Path) -> Result<usize, CsvReaderError> {
    Ok(rows(path)?.count())
}

/// Streams the data rows of `path`, numbered from 2. A row that does not
/// decode becomes an error item and reading goes on.
pub fn rows(path: &Path) -> Result<CsvRows, CsvReaderError> {
    let mut reader = reader_builder().from_reader(open(path)?);
    let headers = reader
        .byte_headers()
        .map_err(|source| CsvReaderError::Header {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    Ok(CsvRows {
        reader,
        headers,
        record: ByteRecord::new(),
        last_row: 1,
        blank_rows: 0,
        pending: None,
        done: false,
    })
}

/// Row iterator returned by [`rows`].
///
/// The csv parser drops blank lines. Each one still takes a row number and
/// comes out as an empty record, so later rows keep their file position.
/// Blank lines after the last row are ignored.
pub struct CsvRows {
    reader: csv::Reader<BufReader<File>>,
    headers: ByteRecord,
    record: ByteRecord,
    last_row: usize,
    blank_rows: usize,
    pending: Option<Result<CsvRow, RowReadError>>,
    done: bool,
}

impl CsvRows {
    fn read_next(&mut self) {
        let line_before = self.reader.position().line();

        match self.reader.read_byte_record(&mut self.record) {
            Ok(false) => self.done = true,
            Ok(true) => {
                // Newlines inside quoted cells are not blank lines.
                let embedded = self
                    .record
                    .iter()
                    .flat_map(|field| field.iter())
                    .filter(|b| **b == b'\n')
                    .count() as u64;
                let consumed = self.reader.position().line().saturating_sub(line_before);
                self.blank_rows = consumed.saturating_sub(1 + embedded) as usize;

                let number = self.last_row + self.blank_rows + 1;
                let decoded = self
                    .record
                    .deserialize::<TopicCsvRecord>(Some(&self.headers))
                    .map(|record| CsvRow { number, record })
                    .map_err(|e| RowReadError {
                        row_number: number,
                        message: e.to_string(),
                    });
                self.pending = Some(decoded);
            }
            Err(e) => {
                if e.is_io_error() {
                    self.done = true;
                }
                self.blank_rows = 0;
                self.pending = Some(Err(RowReadError {
                    row_number: self.last_row + 1,
                    message: e.to_string(),
                }));
            }
        }
    }
}

impl Iterator for CsvRows {
    type Item = Result<CsvRow, RowReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending.is_none() && !self.done {
            self.read_next();
        }

        if self.blank_rows > 0 {
            self.blank_rows -= 1;
            self.last_row += 1;
            return Some(Ok(CsvRow {
                number: self.last_row,
                record: TopicCsvRecord::default(),
            }));
        }

        let item = self.pending.take()?;
        self.last_row += 1;
        Some(item)
    }
}
