use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Whether a yielded entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// A matching filesystem entry yielded by an enumeration.
///
/// `path` mirrors what the caller typed for the root (plus any descent),
/// while `absolute_path` is the resolved path used for native calls. Only
/// path correctness and the file/directory distinction are guaranteed;
/// richer metadata is for the consumer to populate lazily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundEntry {
    /// Caller-facing path.
    pub path: PathBuf,
    /// Absolute path.
    pub absolute_path: PathBuf,
    pub kind: EntryKind,
}

impl FoundEntry {
    pub fn new(path: PathBuf, absolute_path: PathBuf, kind: EntryKind) -> Self {
        Self {
            path,
            absolute_path,
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Final component of the entry path.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

impl AsRef<Path> for FoundEntry {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
