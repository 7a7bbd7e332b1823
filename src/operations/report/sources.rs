//! Data sources written into a problem report

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::domain::StatusRecord;
use crate::error::{Result, file_read_failed, io_error};

/// A single named piece of report data
pub trait DataSource {
    /// File name inside the target folder
    fn name(&self) -> &str;

    /// Write the full content into `out`
    fn write_to(&mut self, out: &mut dyn Write) -> Result<()>;
}

/// In-memory content
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    content: Vec<u8>,
}

impl TextSource {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

impl DataSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_to(&mut self, out: &mut dyn Write) -> Result<()> {
        out.write_all(&self.content)
            .map_err(|e| io_error(format!("writing '{}': {e}", self.name)))
    }
}

/// Content of a file on disk, read when written
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    /// Source named after the file itself
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().into_owned());
        Self { name, path }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_to(&mut self, out: &mut dyn Write) -> Result<()> {
        let mut file = File::open(&self.path)
            .map_err(|e| file_read_failed(self.path.display().to_string(), e.to_string()))?;
        io::copy(&mut file, out)
            .map_err(|e| file_read_failed(self.path.display().to_string(), e.to_string()))?;
        Ok(())
    }
}

/// A status record rendered as text
#[derive(Debug, Clone)]
pub struct StatusSource {
    name: String,
    record: StatusRecord,
}

impl StatusSource {
    pub fn new(record: StatusRecord, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record,
        }
    }
}

impl DataSource for StatusSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_to(&mut self, out: &mut dyn Write) -> Result<()> {
        out.write_all(self.record.render().as_bytes())
            .map_err(|e| io_error(format!("writing '{}': {e}", self.name)))
    }
}
