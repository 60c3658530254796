//! File sink implementation

use crate::core::{LoggerError, Result, Severity, Sink};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends lines to a text file.
///
/// The file is opened, written and closed for every line, so no handle
/// outlives a single delivery and reconfiguring paths mid-run is safe.
pub struct FileSink {
    path: PathBuf,
    name: String,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // One write per line keeps appends from different deliveries whole
        file.write_all(line.as_bytes())
    }
}

impl Sink for FileSink {
    fn write_line(&mut self, _severity: Severity, line: &str) -> Result<()> {
        self.append(line)
            .map_err(|e| LoggerError::file_sink(self.path.display().to_string(), e))
    }

    fn flush(&mut self) -> Result<()> {
        // Nothing is buffered between lines
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
