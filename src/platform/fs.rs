// BugReportCleaner - platform/fs.rs
//
// Opening report inputs and cleaned outputs with path-carrying errors.

use crate::util::error::CleanerError;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// How an existing output file is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Keep existing content and add to the end. Re-running against the same
    /// output accumulates results.
    #[default]
    Append,
    /// Discard existing content first.
    Truncate,
}

impl WriteMode {
    pub fn from_truncate_flag(truncate: bool) -> Self {
        if truncate {
            Self::Truncate
        } else {
            Self::Append
        }
    }
}

/// Open a report for buffered sequential reading.
pub fn open_input(path: &Path) -> Result<BufReader<File>, CleanerError> {
    let file = File::open(path).map_err(|e| CleanerError::Io {
        path: path.to_path_buf(),
        operation: "open input",
        source: e,
    })?;
    Ok(BufReader::new(file))
}

/// Open (creating if needed) an output file for buffered writing.
pub fn open_output(path: &Path, mode: WriteMode) -> Result<BufWriter<File>, CleanerError> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Append => options.append(true),
        WriteMode::Truncate => options.write(true).truncate(true),
    };
    let file = options.open(path).map_err(|e| CleanerError::Io {
        path: path.to_path_buf(),
        operation: "open output",
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// True if both paths name the same existing file.
pub fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old\n").unwrap();

        let mut w = open_output(&path, WriteMode::Append).unwrap();
        w.write_all(b"new\n").unwrap();
        drop(w);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_truncate_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old\n").unwrap();

        let mut w = open_output(&path, WriteMode::Truncate).unwrap();
        w.write_all(b"new\n").unwrap();
        drop(w);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_open_missing_input_carries_path() {
        let err = open_input(Path::new("/nonexistent/bugreport.txt")).unwrap_err();
        assert!(matches!(err, CleanerError::Io { operation: "open input", .. }));
        assert!(err.to_string().contains("/nonexistent/bugreport.txt"));
    }

    #[test]
    fn test_same_file_through_dot_segment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bugreport.txt");
        std::fs::write(&path, "x").unwrap();
        let dotted = dir.path().join(".").join("bugreport.txt");
        assert!(same_file(&path, &dotted));
        assert!(!same_file(&path, &dir.path().join("other.txt")));
    }
}
