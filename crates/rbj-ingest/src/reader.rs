//! Streaming reader for semicolon-separated rule tables.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use tracing::{debug, warn};

use rbj_model::{ColumnPolicy, Result, RuleError};

use crate::columns::Column;

/// Cell count correction applied to a row under [`ColumnPolicy::Lenient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthAdjustment {
    pub expected: usize,
    pub found: usize,
}

/// A data row keyed by header names, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the source table.
    pub line: u64,
    /// (header name, cell value) pairs in header order.
    pub cells: Vec<(String, String)>,
    /// Set when the row was padded or truncated to the header width.
    pub adjustment: Option<WidthAdjustment>,
}

impl RawRow {
    /// Value of the cell under an exact header name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(header, _)| header == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a recognized column under any of its accepted names.
    pub fn field(&self, column: Column) -> Option<&str> {
        self.cells
            .iter()
            .find(|(header, _)| column.matches(header))
            .map(|(_, value)| value.as_str())
    }

    /// Non-empty value of a recognized column.
    pub fn non_empty(&self, column: Column) -> Option<&str> {
        self.field(column).filter(|value| !value.is_empty())
    }
}

/// Header of a rule table and the columns it binds.
#[derive(Debug, Clone)]
pub struct Header {
    pub line: u64,
    pub names: Vec<String>,
    pub columns: BTreeMap<Column, usize>,
}

impl Header {
    fn parse(record: &StringRecord) -> Result<Self> {
        let line = record_line(record);
        let names: Vec<String> = record.iter().map(normalize_cell).collect();
        let mut columns = BTreeMap::new();
        for (idx, name) in names.iter().enumerate() {
            let Some(column) = Column::from_header(name) else {
                if !name.is_empty() {
                    debug!(line, header = %name, "ignoring unrecognized column");
                }
                continue;
            };
            if let Some(previous) = columns.insert(column, idx) {
                return Err(RuleError::MalformedRow {
                    line,
                    message: format!(
                        "column `{name}` binds {column} a second time (already bound by `{}`)",
                        names[previous]
                    ),
                });
            }
        }
        if !columns.contains_key(&Column::CheckKind) {
            return Err(RuleError::MalformedRow {
                line,
                message: format!(
                    "header has no check kind column (expected one of: {})",
                    Column::CheckKind.names().join(", ")
                ),
            });
        }
        Ok(Self {
            line,
            names,
            columns,
        })
    }

    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn binds(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }
}

/// Lazy, single-pass reader yielding one [`RawRow`] per data line.
///
/// The first non-blank line is the header. Lines whose first cell is empty
/// are comments and are skipped.
pub struct RuleTableReader<R: Read> {
    header: Option<Header>,
    records: StringRecordsIntoIter<R>,
    policy: ColumnPolicy,
}

impl RuleTableReader<File> {
    pub fn from_path(path: &Path, policy: ColumnPolicy) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, policy)
    }
}

impl<R: Read> RuleTableReader<R> {
    /// Create a reader and consume the header line.
    pub fn from_reader(reader: R, policy: ColumnPolicy) -> Result<Self> {
        let mut records = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader)
            .into_records();
        let mut header = None;
        for record in records.by_ref() {
            let record = record.map_err(map_csv_error)?;
            if is_blank(&record) {
                continue;
            }
            header = Some(Header::parse(&record)?);
            break;
        }
        Ok(Self {
            header,
            records,
            policy,
        })
    }

    /// Header of the table; `None` for an empty table.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    fn build_row(&self, header: &Header, record: &StringRecord) -> Result<RawRow> {
        let line = record_line(record);
        let mut values: Vec<String> = record.iter().map(normalize_cell).collect();
        let mut adjustment = None;
        if values.len() != header.width() {
            let found = values.len();
            match self.policy {
                ColumnPolicy::Strict => {
                    return Err(RuleError::MalformedRow {
                        line,
                        message: format!(
                            "expected {} cells as in the header, found {found}",
                            header.width()
                        ),
                    });
                }
                ColumnPolicy::Lenient => {
                    warn!(
                        line,
                        expected = header.width(),
                        found,
                        "row width differs from header, adjusting"
                    );
                    values.resize(header.width(), String::new());
                    adjustment = Some(WidthAdjustment {
                        expected: header.width(),
                        found,
                    });
                }
            }
        }
        let cells = header.names.iter().cloned().zip(values).collect();
        Ok(RawRow {
            line,
            cells,
            adjustment,
        })
    }
}

impl<R: Read> Iterator for RuleTableReader<R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.header.clone()?;
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(err) => return Some(Err(map_csv_error(err))),
            };
            if is_comment(&record) {
                continue;
            }
            return Some(self.build_row(&header, &record));
        }
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|cell| normalize_cell(cell).is_empty())
}

fn is_comment(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(|cell| normalize_cell(cell).is_empty())
        .unwrap_or(true)
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map(csv::Position::line).unwrap_or(0)
}

fn map_csv_error(err: csv::Error) -> RuleError {
    let line = err.position().map(csv::Position::line).unwrap_or(0);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => RuleError::Io(source),
        _ => RuleError::MalformedRow { line, message },
    }
}
