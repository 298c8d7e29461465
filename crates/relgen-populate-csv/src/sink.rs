//! CSV output sink.

use crate::chunk::RowChunk;
use crate::error::PopulateError;
use crate::foreign::CSV_DELIMITER;
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default buffer size for CSV writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// What to do with an output file left by an earlier run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Remove the stale file before the first write
    #[default]
    Replace,
    /// Append to the existing file, without writing a header
    Append,
}

/// Output path of a table inside an output directory.
pub fn table_output_path(output_dir: &Path, table: &str) -> PathBuf {
    output_dir.join(format!("{table}.csv"))
}

/// Apply the output mode to a table's file before a job writes to it.
pub fn prepare_output(path: &Path, mode: OutputMode) -> Result<(), PopulateError> {
    if mode == OutputMode::Replace && path.exists() {
        debug!("Removing stale output '{}'", path.display());
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Appends assembled chunks to one table's CSV file.
///
/// The file is opened on the first write. The header is written only when
/// that write creates the file.
pub struct CsvSink {
    path: PathBuf,
    header: Vec<String>,
    writer: Option<Writer<BufWriter<File>>>,
    rows_written: u64,
    chunks_written: u64,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, header: Vec<String>) -> Self {
        Self {
            path: path.into(),
            header,
            writer: None,
            rows_written: 0,
            chunks_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn chunks_written(&self) -> u64 {
        self.chunks_written
    }

    /// Append a chunk and flush it to disk.
    pub fn write_chunk(&mut self, chunk: &RowChunk) -> Result<(), PopulateError> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => self.open()?,
        };
        let writer = self.writer.insert(writer);

        for record in chunk.records() {
            writer.write_record(&record)?;
        }
        writer.flush()?;

        self.rows_written += chunk.len() as u64;
        self.chunks_written += 1;
        Ok(())
    }

    /// Flush and close the file, returning its size in bytes.
    ///
    /// A file is created, header only, if nothing was written.
    pub fn finish(mut self) -> Result<u64, PopulateError> {
        let mut writer = match self.writer.take() {
            Some(writer) => writer,
            None => self.open()?,
        };
        writer.flush()?;
        drop(writer);

        Ok(std::fs::metadata(&self.path)?.len())
    }

    fn open(&self) -> Result<Writer<BufWriter<File>>, PopulateError> {
        let created = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut writer = WriterBuilder::new()
            .delimiter(CSV_DELIMITER)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(buf_writer);

        if created {
            writer.write_record(&self.header)?;
        }
        Ok(writer)
    }
}
