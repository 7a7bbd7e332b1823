//! Report targets

use std::io::{Seek, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Result, archive_failed};
use crate::operations::report::sources::DataSource;

/// Receives report data, one folder-scoped source at a time
pub trait DataTarget {
    fn consume(&mut self, folder: &str, source: &mut dyn DataSource) -> Result<()>;
}

/// Join a folder and a file name into an archive entry name
pub fn entry_name(folder: &str, name: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

/// Writes every consumed source as a zip entry
pub struct ArchiveTarget<W: Write + Seek> {
    writer: ZipWriter<W>,
    options: SimpleFileOptions,
    entries: Vec<String>,
}

impl<W: Write + Seek> ArchiveTarget<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: ZipWriter::new(inner),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
            entries: Vec::new(),
        }
    }

    /// Entry names written so far
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Write the central directory and hand back the underlying writer
    pub fn finish(self) -> Result<W> {
        self.writer
            .finish()
            .map_err(|e| archive_failed("archive", e.to_string()))
    }
}

impl<W: Write + Seek> DataTarget for ArchiveTarget<W> {
    fn consume(&mut self, folder: &str, source: &mut dyn DataSource) -> Result<()> {
        let entry = entry_name(folder, source.name());
        self.writer
            .start_file(entry.as_str(), self.options)
            .map_err(|e| archive_failed(&entry, e.to_string()))?;
        source.write_to(&mut self.writer)?;
        self.entries.push(entry);
        Ok(())
    }
}
