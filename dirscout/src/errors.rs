use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for enumeration operations
pub type WalkResult<T> = Result<T, WalkError>;

/// Errors that can surface from a directory enumeration.
///
/// Recoverable native conditions (a missing or inaccessible directory) are
/// absorbed inside the state machine and never appear here; what remains is
/// fatal by construction. A fatal I/O error always names the directory the
/// native call was operating on.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Canonicalize the path and strip UNC prefixes so that
/// comparisons on Windows are consistent.
pub fn unify_path(original: &Path) -> PathBuf {
    let canonical = original
        .canonicalize()
        .unwrap_or_else(|_| original.to_path_buf());
    strip_unc_prefix(&canonical)
}

/// Strips the Windows UNC prefix (\\?\) from a path if present
fn strip_unc_prefix(p: &Path) -> PathBuf {
    let s = p.display().to_string();
    if let Some(stripped) = s.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        p.to_path_buf()
    }
}

impl WalkError {
    pub fn invalid_pattern(pattern: impl Into<String>) -> Self {
        Self::InvalidPattern(pattern.into())
    }

    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// The directory a fatal native error was reported against, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The raw OS error code attached to a fatal native error, if any.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Self::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let err = WalkError::invalid_pattern("bad|pattern");
        assert!(matches!(err, WalkError::InvalidPattern(_)));

        let err = WalkError::io_at("some/dir", io::Error::from(io::ErrorKind::Other));
        assert!(matches!(err, WalkError::Io { .. }));

        let err = WalkError::config_error("missing field");
        assert!(matches!(err, WalkError::ConfigError(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = WalkError::invalid_pattern("a<b");
        assert_eq!(err.to_string(), "Invalid pattern: a<b");

        let err = WalkError::config_error("bad scope");
        assert_eq!(err.to_string(), "Configuration error: bad scope");

        let err = WalkError::io_at(
            "some/dir",
            io::Error::new(io::ErrorKind::Other, "device failure"),
        );
        assert_eq!(err.to_string(), "IO error at some/dir: device failure");
    }

    #[test]
    fn test_error_accessors() {
        let err = WalkError::io_at("frame/dir", io::Error::from_raw_os_error(5));
        assert_eq!(err.path(), Some(Path::new("frame/dir")));
        assert_eq!(err.os_code(), Some(5));

        let err = WalkError::invalid_pattern("x");
        assert_eq!(err.path(), None);
        assert_eq!(err.os_code(), None);
    }

    #[test]
    fn test_unify_path_falls_back_on_missing() {
        let missing = Path::new("definitely/not/a/real/path");
        assert_eq!(unify_path(missing), missing.to_path_buf());
    }
}
