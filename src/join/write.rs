// src/join/write.rs
use std::{io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// Write `contents` to `path` atomically.
///
/// The text goes to a temp file in the destination directory first and is
/// renamed over `path` only once fully written, so a failure never leaves a
/// truncated table behind.
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::file_access(dir, e))?;
    let tmp_path = tmp.path().to_path_buf();
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|e| Error::file_access(&tmp_path, e))?;

    tmp.persist(path).map_err(|e| Error::file_access(path, e.error))?;
    debug!(path = %path.display(), bytes = contents.len(), "table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_overwrite() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("combined.txt");

        write_atomic(&out, "\ta\nk\t1\n").unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "\ta\nk\t1\n");

        write_atomic(&out, "\tb\n").unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "\tb\n");

        // no temp files left next to the output
        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_directory() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("no_such_dir").join("combined.txt");
        let err = write_atomic(&out, "x").unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
        assert!(!out.exists());
    }
}
