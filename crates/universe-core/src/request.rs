//! Upload request validation.
//!
//! Runs before any byte of the source is parsed.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default upload ceiling (50 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Errors raised while validating an upload request.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("universe name is required")]
    MissingName,

    #[error("universe type is required")]
    MissingKind,

    #[error("a source file is required")]
    MissingFile,

    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read source metadata {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source is larger than the configured ceiling.
    #[error("source file is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge { size: u64, max_size: u64 },
}

/// Limits applied to uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_size: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl UploadLimits {
    /// Ceiling expressed in whole mebibytes.
    pub fn from_megabytes(megabytes: u64) -> Self {
        Self {
            max_file_size: megabytes.saturating_mul(1024 * 1024),
        }
    }
}

/// A request to create a universe from one uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniverseRequest {
    pub name: String,
    /// Free-form type label.
    pub kind: String,
    pub source: Option<PathBuf>,
}

impl UniverseRequest {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Checks required fields and the size ceiling.
    ///
    /// Fields are checked in form order: name, type, file, size.
    pub fn validate(&self, limits: &UploadLimits) -> Result<ValidatedRequest, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.kind.trim().is_empty() {
            return Err(ValidationError::MissingKind);
        }
        let source = self.source.as_deref().ok_or(ValidationError::MissingFile)?;
        let size = file_size(source)?;
        if size > limits.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max_size: limits.max_file_size,
            });
        }

        Ok(ValidatedRequest {
            name: self.name.clone(),
            kind: self.kind.clone(),
            source: source.to_path_buf(),
            size,
        })
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub name: String,
    pub kind: String,
    pub source: PathBuf,
    /// Source size in bytes at validation time.
    pub size: u64,
}

fn file_size(path: &Path) -> Result<u64, ValidationError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ValidationError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ValidationError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn source(bytes: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![b'a'; bytes]).unwrap();
        file
    }

    #[test]
    fn name_is_checked_first() {
        let err = UniverseRequest::new("  ", "").validate(&UploadLimits::default()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingName));
    }

    #[test]
    fn kind_and_file_are_required() {
        let err = UniverseRequest::new("Leads", "").validate(&UploadLimits::default()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingKind));

        let err = UniverseRequest::new("Leads", "B2B")
            .validate(&UploadLimits::default())
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingFile));
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let file = source(10);
        let request = UniverseRequest::new("Leads", "B2B").with_source(file.path());

        let limits = UploadLimits { max_file_size: 10 };
        let validated = request.validate(&limits).unwrap();
        assert_eq!(validated.size, 10);

        let limits = UploadLimits { max_file_size: 9 };
        let err = request.validate(&limits).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::FileTooLarge {
                size: 10,
                max_size: 9
            }
        ));
    }

    #[test]
    fn missing_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let request = UniverseRequest::new("Leads", "B2B").with_source(dir.path().join("gone.csv"));
        let err = request.validate(&UploadLimits::default()).unwrap_err();
        assert!(matches!(err, ValidationError::FileNotFound { .. }));
    }

    #[test]
    fn default_ceiling_is_fifty_megabytes() {
        assert_eq!(UploadLimits::default().max_file_size, 52_428_800);
        assert_eq!(UploadLimits::from_megabytes(50), UploadLimits::default());
    }
}
