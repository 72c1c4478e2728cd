//! Where an image submission comes from.
//!
//! Uploads arrive as in-memory bytes; CLI and test harnesses hand us paths.
//! Both strategies unify into one byte buffer before the shared
//! validate/decode/encode path — the validator never knows the difference.

use std::path::{Path, PathBuf};

use super::IngestError;

/// A single image submission, before validation.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Raw bytes already in memory (multipart upload body).
    Bytes(Vec<u8>),
    /// A file on disk, read lazily.
    Path(PathBuf),
}

impl ImageSource {
    /// Read the submission into memory.
    ///
    /// Filesystem failures surface as `IngestError::Io`; the bytes variant
    /// cannot fail.
    pub fn read(self) -> Result<Vec<u8>, IngestError> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Path(path) => Ok(std::fs::read(&path)?),
        }
    }

    /// Declared filename, if the source carries one.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Bytes(_) => None,
            Self::Path(path) => path.file_name().and_then(|n| n.to_str()),
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_source_reads_back_verbatim() {
        let source = ImageSource::from(vec![1u8, 2, 3]);
        assert_eq!(source.read().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn path_source_reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let source = ImageSource::from(path.as_path());
        assert_eq!(source.filename(), Some("upload.jpg"));
        assert_eq!(source.read().unwrap(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn missing_path_is_io_error() {
        let source = ImageSource::Path(PathBuf::from("/nonexistent/upload.png"));
        assert!(matches!(source.read(), Err(IngestError::Io(_))));
    }

    #[test]
    fn bytes_source_has_no_filename() {
        assert_eq!(ImageSource::Bytes(vec![]).filename(), None);
    }
}
