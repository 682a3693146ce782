//! Row writers for export output

use std::path::Path;

use async_trait::async_trait;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::BufWriter;

use crate::error::{OutputError, Result};

use super::row::ExportRow;

pub mod csv;

pub use csv::CsvWriter;

/// Trait for writing export rows to an output
#[async_trait]
pub trait RowWriter: Send {
    /// Write a batch of rows, returning how many were written
    ///
    /// The header goes out before the first row.
    async fn write_rows(&mut self, rows: &[ExportRow]) -> Result<usize>;

    /// Finish the output, writing the header if no row ever was
    async fn finalize(&mut self) -> Result<()>;

    /// Size in bytes of the finished output
    async fn file_size(&self) -> Result<u64>;
}

/// Create a uniquely named staging file next to `path`
///
/// The file is `.<name>.<random>.tmp` in the output's directory, so the
/// final rename never crosses filesystems and never reuses an existing file.
/// Dropping the returned [`TempPath`] deletes the staging file.
pub(crate) fn create_staging(path: &Path) -> Result<(BufWriter<File>, TempPath)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    );

    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same mode a plain create would get, still subject to the umask
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let staged = builder
        .tempfile_in(dir)
        .map_err(|source| OutputError::CreateFailed {
            path: path.display().to_string(),
            source,
        })?;
    let (file, staging) = staged.into_parts();

    Ok((
        BufWriter::with_capacity(1024 * 1024, File::from_std(file)),
        staging,
    ))
}

/// Check that the parent directory of `path` exists
pub fn validate_path(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(OutputError::DirectoryMissing(parent.display().to_string()).into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;

    #[test]
    fn test_validate_path_missing_directory() {
        let err = validate_path(Path::new("/definitely/not/here/out.csv")).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Output(OutputError::DirectoryMissing(_))
        ));
    }

    #[test]
    fn test_validate_path_bare_filename() {
        assert!(validate_path(Path::new("extract_data.csv")).is_ok());
    }

    #[tokio::test]
    async fn test_staging_file_is_unique_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extract_data.csv");
        std::fs::write(dir.path().join("extract_data.csv.tmp"), "keep me").unwrap();

        let (_first_writer, first) = create_staging(&path).unwrap();
        let (_second_writer, second) = create_staging(&path).unwrap();

        assert_ne!(first.to_path_buf(), second.to_path_buf());
        for staged in [&first, &second] {
            assert_eq!(staged.parent(), Some(dir.path()));
            let name = staged.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with(".extract_data.csv."));
            assert!(name.ends_with(".tmp"));
        }
        assert_eq!(
            std::fs::read_to_string(dir.path().join("extract_data.csv.tmp")).unwrap(),
            "keep me"
        );
    }

    #[tokio::test]
    async fn test_dropping_staging_removes_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extract_data.csv");

        let (writer, staging) = create_staging(&path).unwrap();
        let staged = staging.to_path_buf();
        assert!(staged.exists());

        drop(writer);
        drop(staging);
        assert!(!staged.exists());
    }
}
