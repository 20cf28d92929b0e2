//! Attachment resolution

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::error;

/// A file to attach, found on disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    path: PathBuf,
}

impl Attachment {
    /// Creates an attachment named after the final segment of `path`
    pub fn from_path(path: &Path) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            filename,
            path: path.to_path_buf(),
        }
    }

    /// The name shown to the recipient
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Where the content is read from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolves attachment paths, keeping the ones that exist.
///
/// Missing paths are logged and skipped; they never fail the send.
pub async fn resolve_attachments(paths: &[PathBuf]) -> Vec<Attachment> {
    let mut attachments = Vec::with_capacity(paths.len());

    for path in paths {
        if matches!(fs::try_exists(path).await, Ok(true)) {
            attachments.push(Attachment::from_path(path));
        } else {
            error!(path = %path.display(), "attachment not found");
        }
    }

    attachments
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Write},
        sync::{Arc, Mutex},
    };

    use tempfile::{tempdir, NamedTempFile};
    use testresult::TestResult;

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_filename_is_final_segment() {
        let attachment = Attachment::from_path(Path::new("/var/reports/monthly.pdf"));

        assert_eq!(attachment.filename(), "monthly.pdf");
        assert_eq!(attachment.path(), Path::new("/var/reports/monthly.pdf"));
    }

    #[tokio::test]
    async fn test_existing_files_are_kept_in_order() -> TestResult {
        let mut first = NamedTempFile::new()?;
        let mut second = NamedTempFile::new()?;
        writeln!(first, "first")?;
        writeln!(second, "second")?;

        let paths = vec![second.path().to_path_buf(), first.path().to_path_buf()];
        let attachments = resolve_attachments(&paths).await;

        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].path(), second.path());
        assert_eq!(attachments[1].path(), first.path());

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_files_are_skipped() -> TestResult {
        let dir = tempdir()?;
        let existing = dir.path().join("present.txt");
        std::fs::write(&existing, "content")?;
        let missing = dir.path().join("absent.txt");

        let attachments = resolve_attachments(&[missing, existing.clone()]).await;

        assert_eq!(attachments, vec![Attachment::from_path(&existing)]);
        assert_eq!(attachments[0].filename(), "present.txt");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_logged_as_error() -> TestResult {
        let dir = tempdir()?;
        let missing = dir.path().join("absent.txt");

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        resolve_attachments(&[missing.clone()]).await;

        let output = logs.contents();

        assert!(output.contains("ERROR"));
        assert!(output.contains("attachment not found"));
        assert!(output.contains(&missing.display().to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_all_missing_yields_nothing() {
        let attachments =
            resolve_attachments(&[PathBuf::from("/definitely/not/here.bin")]).await;

        assert!(attachments.is_empty());
    }

    #[tokio::test]
    async fn test_no_paths() {
        assert!(resolve_attachments(&[]).await.is_empty());
    }
}
