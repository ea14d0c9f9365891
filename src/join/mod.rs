// src/join/mod.rs
pub mod record;
pub mod write;

use std::{
    collections::{HashMap, HashSet},
    fmt,
    io::Read,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
pub use record::{Record, RecordReader};
pub use write::write_atomic;

/// Keys in reference order plus the values collected for each key.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Table {
    /// Order of first appearance in the reference file. Duplicates are kept.
    keys: Vec<String>,
    rows: HashMap<String, Vec<String>>,
    /// Reference file included.
    files: usize,
}

impl Table {
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn row(&self, key: &str) -> Option<&[String]> {
        self.rows.get(key).map(Vec::as_slice)
    }

    pub fn files_processed(&self) -> usize {
        self.files
    }

    /// Number of output rows, duplicate reference keys counted twice.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A tolerated inconsistency between an additional file and the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Key in an additional file that the reference never defined; its value was dropped.
    UnknownKey { file: PathBuf, line: u64, key: String },
    /// Reference key that an additional file did not contain.
    MissingKey { file: PathBuf, key: String },
    /// Key seen twice in one additional file; the later value replaced the earlier one.
    RepeatedKey { file: PathBuf, line: u64, key: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownKey { file, line, key } => write!(
                f,
                "{}:{}: key {:?} not found in reference, value dropped",
                file.display(),
                line,
                key
            ),
            Diagnostic::MissingKey { file, key } => {
                write!(f, "{}: reference key {:?} missing", file.display(), key)
            }
            Diagnostic::RepeatedKey { file, line, key } => write!(
                f,
                "{}:{}: key {:?} repeated, later value kept",
                file.display(),
                line,
                key
            ),
        }
    }
}

/// Builds a [`Table`] from one reference file and any number of additional files.
#[derive(Debug, Default)]
pub struct TableJoiner {
    table: Table,
    diagnostics: Vec<Diagnostic>,
}

impl TableJoiner {
    /// Read the reference file; it fixes row order and the set of known keys.
    #[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_reference<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("reading reference file");
        Self::from_reference(RecordReader::open(path)?)
    }

    pub fn from_reference<R: Read>(records: RecordReader<R>) -> Result<Self> {
        let mut table = Table {
            files: 1,
            ..Table::default()
        };
        for rec in records {
            let rec = rec?;
            // a repeated key overwrites the row but is still listed twice
            table.keys.push(rec.key.clone());
            table.rows.insert(rec.key, vec![rec.value]);
        }
        debug!(keys = table.keys.len(), "reference loaded");
        Ok(Self {
            table,
            diagnostics: Vec::new(),
        })
    }

    /// Append the value of every known key in `path` as the next column.
    #[instrument(level = "info", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn append_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        info!("reading additional file");
        self.append_records(RecordReader::open(path)?)
    }

    pub fn append_records<R: Read>(&mut self, records: RecordReader<R>) -> Result<()> {
        let file = records.path().to_path_buf();
        let mut matched: HashSet<String> = HashSet::with_capacity(self.table.rows.len());

        for rec in records {
            let rec = rec?;
            match self.table.rows.get_mut(&rec.key) {
                // a repeat overwrites this file's value, mirroring the reference rule
                Some(values) if matched.contains(&rec.key) => {
                    if let Some(last) = values.last_mut() {
                        *last = rec.value;
                    }
                    debug!(file = %file.display(), line = rec.line, key = %rec.key, "repeated key, later value kept");
                    self.diagnostics.push(Diagnostic::RepeatedKey {
                        file: file.clone(),
                        line: rec.line,
                        key: rec.key,
                    });
                }
                Some(values) => {
                    values.push(rec.value);
                    matched.insert(rec.key);
                }
                None => {
                    warn!(file = %file.display(), line = rec.line, key = %rec.key, "key not found in reference");
                    self.diagnostics.push(Diagnostic::UnknownKey {
                        file: file.clone(),
                        line: rec.line,
                        key: rec.key,
                    });
                }
            }
        }
        self.table.files += 1;

        let mut reported: HashSet<&str> = HashSet::new();
        for key in &self.table.keys {
            if !matched.contains(key) && reported.insert(key.as_str()) {
                warn!(file = %file.display(), key = %key, "reference key missing");
                self.diagnostics.push(Diagnostic::MissingKey {
                    file: file.clone(),
                    key: key.clone(),
                });
            }
        }
        debug!(matched = matched.len(), "additional file merged");
        Ok(())
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (Table, Vec<Diagnostic>) {
        (self.table, self.diagnostics)
    }
}

/// What to do with a row whose value count differs from the column count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RowPolicy {
    /// Fail with [`Error::RowWidth`].
    #[default]
    Strict,
    /// Fill short rows with this value. Long rows still fail.
    Pad(String),
}

/// Render `table` as tab-separated text.
///
/// The column count is `headers.len()`, which must equal the number of files
/// the table was built from. Every row carries exactly that many values.
pub fn render(table: &Table, headers: &[String], policy: &RowPolicy) -> Result<String> {
    let columns = headers.len();
    if columns != table.files_processed() {
        return Err(Error::Config(format!(
            "{} header names for {} processed files",
            columns,
            table.files_processed()
        )));
    }

    let mut out = String::with_capacity(table.len() * (columns + 1) * 8);
    for name in headers {
        out.push('\t');
        out.push_str(name);
    }
    out.push('\n');

    for key in table.keys() {
        let values = table.row(key).unwrap_or_default();
        let pad = match (values.len().cmp(&columns), policy) {
            (std::cmp::Ordering::Equal, _) => None,
            (std::cmp::Ordering::Less, RowPolicy::Pad(fill)) => Some(fill.as_str()),
            _ => {
                return Err(Error::RowWidth {
                    key: key.clone(),
                    expected: columns,
                    found: values.len(),
                })
            }
        };

        out.push_str(key);
        for v in values {
            out.push('\t');
            out.push_str(v);
        }
        if let Some(fill) = pad {
            for _ in values.len()..columns {
                out.push('\t');
                out.push_str(fill);
            }
        }
        out.push('\n');
    }
    Ok(out)
}
