// src/join/record.rs
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// One `<key>\t<value>` line. Fields past the second are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number in the source file.
    pub line: u64,
    pub key: String,
    pub value: String,
}

/// Iterates the records of a tab-separated coverage table.
///
/// Every physical line must hold at least two tab-separated fields; a blank
/// line is malformed like any other. Quotes are not interpreted.
pub struct RecordReader<R: Read> {
    path: PathBuf,
    inner: BufReader<R>,
    buf: Vec<u8>,
    line: u64,
}

impl RecordReader<File> {
    /// Open `path` for reading, mapping any I/O failure to `Error::FileAccess`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file_access(path, e))?;
        Ok(Self::new(path, file))
    }
}

impl<R: Read> RecordReader<R> {
    /// Wrap an arbitrary reader; `path` is only used in error messages.
    pub fn new(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            path: path.into(),
            inner: BufReader::new(reader),
            buf: Vec::new(),
            line: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn malformed(&self, reason: impl Into<String>) -> Error {
        Error::MalformedLine {
            path: self.path.clone(),
            line: self.line,
            reason: reason.into(),
        }
    }

    fn read_next(&mut self) -> Result<Option<Record>> {
        self.buf.clear();
        let n = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| Error::file_access(&self.path, e))?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;

        // only the terminator is stripped; `\r\n` endings are accepted too
        let mut raw = self.buf.as_slice();
        raw = raw.strip_suffix(b"\n").unwrap_or(raw);
        raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let text = std::str::from_utf8(raw).map_err(|e| self.malformed(e.to_string()))?;
        if text.is_empty() {
            return Err(self.malformed("blank line"));
        }

        let mut fields = text.splitn(3, '\t');
        match (fields.next(), fields.next()) {
            (Some(key), Some(value)) => Ok(Some(Record {
                line: self.line,
                key: key.to_string(),
                value: value.to_string(),
            })),
            _ => Err(self.malformed("expected at least 2 tab-separated fields, found 1")),
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}
