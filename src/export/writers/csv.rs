//! CSV writer for export rows
//!
//! Rows are staged in a uniquely named file next to the output and renamed
//! over it on [`RowWriter::finalize`]. A run that fails part-way leaves the
//! previous file untouched and removes the staging file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::{OutputError, Result};

use super::super::row::{ExportRow, HEADERS};
use super::{RowWriter, create_staging, validate_path};

/// Line terminator, CRLF as spreadsheet tools expect
const LINE_END: &[u8] = b"\r\n";

/// Writer for the fixed-column order CSV
pub struct CsvWriter {
    /// Buffered writer on the staging file
    writer: BufWriter<File>,
    /// Final output path
    path: PathBuf,
    /// Staging file, `None` once moved into place
    staging: Option<TempPath>,
    /// Whether the header row has been written
    headers_written: bool,
    /// Number of rows written
    written: usize,
}

impl CsvWriter {
    /// Create a new CSV writer for `path`
    pub async fn new(path: &Path) -> Result<Self> {
        validate_path(path)?;
        let (writer, staging) = create_staging(path)?;

        debug!(
            "Created CSV writer for: {} (staging in {})",
            path.display(),
            staging.display()
        );

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            staging: Some(staging),
            headers_written: false,
            written: 0,
        })
    }

    /// Join already-escaped cells into one line
    fn format_line<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
        cells
            .into_iter()
            .map(Self::escape_csv_value)
            .collect::<Vec<_>>()
            .join(",")
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(OutputError::WriteFailed)?;
        self.writer
            .write_all(LINE_END)
            .await
            .map_err(OutputError::WriteFailed)?;
        Ok(())
    }

    async fn write_headers(&mut self) -> Result<()> {
        let line = Self::format_line(HEADERS);
        self.write_line(&line).await?;
        self.headers_written = true;
        debug!("Wrote CSV headers: {} fields", HEADERS.len());
        Ok(())
    }

    /// Escape a CSV value if necessary
    ///
    /// Values containing a comma, quote, CR or LF are wrapped in quotes with
    /// inner quotes doubled.
    fn escape_csv_value(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
        {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

#[async_trait]
impl RowWriter for CsvWriter {
    async fn write_rows(&mut self, rows: &[ExportRow]) -> Result<usize> {
        if !self.headers_written {
            self.write_headers().await?;
        }

        for row in rows {
            let line = Self::format_line(row.fields());
            self.write_line(&line).await?;
        }

        self.written += rows.len();
        debug!("Wrote {} rows to CSV (total: {})", rows.len(), self.written);

        Ok(rows.len())
    }

    async fn finalize(&mut self) -> Result<()> {
        if self.staging.is_none() {
            return Ok(());
        }
        if !self.headers_written {
            self.write_headers().await?;
        }

        let path = self.path.display().to_string();
        let finalize_err = |source: std::io::Error| OutputError::FinalizeFailed {
            path: path.clone(),
            source,
        };

        self.writer.flush().await.map_err(finalize_err)?;
        self.writer.get_mut().sync_all().await.map_err(finalize_err)?;
        if let Some(staging) = self.staging.take() {
            // On failure the returned TempPath is dropped and removes the file
            staging
                .persist(&self.path)
                .map_err(|e| finalize_err(e.error))?;
        }

        debug!(
            "Finalized CSV file: {} ({} rows)",
            self.path.display(),
            self.written
        );
        Ok(())
    }

    async fn file_size(&self) -> Result<u64> {
        let target: &Path = match &self.staging {
            Some(staging) => staging,
            None => &self.path,
        };
        let metadata = tokio::fs::metadata(target).await?;
        Ok(metadata.len())
    }
}

impl Drop for CsvWriter {
    fn drop(&mut self) {
        if let Some(staging) = self.staging.take() {
            debug!("Discarding unfinished export {}", staging.display());
            if let Err(e) = staging.close() {
                debug!("Could not remove staging file: {}", e);
            }
        }
    }
}
