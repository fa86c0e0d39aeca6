//! Result handler strategies.
//!
//! A handler decides whether a raw native entry qualifies for output and,
//! if so, builds the typed result from it. The enumeration state machine is
//! generic over the handler, so new output shapes plug in without touching
//! the traversal itself. The stock variants cover files-only,
//! directories-only, and files-and-directories; [`Custom`] takes arbitrary
//! predicate and builder closures.

use std::path::PathBuf;
use std::sync::Arc;

use crate::lister::{EntryAttributes, RawEntry};
use crate::results::{EntryKind, FoundEntry};

/// A raw entry that qualified for output, with both path views resolved
/// against the frame it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    /// Absolute path of the matched entry.
    pub absolute_path: PathBuf,
    /// Caller-facing path of the matched entry.
    pub display_path: PathBuf,
    pub attributes: EntryAttributes,
}

impl RawMatch {
    fn kind(&self) -> EntryKind {
        if self.attributes.is_dir {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }

    fn into_found_entry(self) -> FoundEntry {
        let kind = self.kind();
        FoundEntry::new(self.display_path, self.absolute_path, kind)
    }
}

/// Filter-and-construct strategy converting raw native entries into typed
/// output.
///
/// `construct` is only invoked for entries that passed `includes`, and must
/// not issue further native calls. The `.` and `..` pseudo-entries are
/// filtered before this contract and never reach `includes`.
pub trait ResultHandler {
    type Output;

    /// Whether the raw entry qualifies for output.
    fn includes(&self, entry: &RawEntry) -> bool;

    /// Build the typed result for a qualifying entry.
    fn construct(&self, matched: RawMatch) -> Self::Output;
}

/// Yields regular files only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesOnly;

impl ResultHandler for FilesOnly {
    type Output = FoundEntry;

    fn includes(&self, entry: &RawEntry) -> bool {
        !entry.attributes.is_dir
    }

    fn construct(&self, matched: RawMatch) -> FoundEntry {
        matched.into_found_entry()
    }
}

/// Yields directories only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoriesOnly;

impl ResultHandler for DirectoriesOnly {
    type Output = FoundEntry;

    fn includes(&self, entry: &RawEntry) -> bool {
        entry.attributes.is_dir
    }

    fn construct(&self, matched: RawMatch) -> FoundEntry {
        matched.into_found_entry()
    }
}

/// Yields both files and directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllEntries;

impl ResultHandler for AllEntries {
    type Output = FoundEntry;

    fn includes(&self, _entry: &RawEntry) -> bool {
        true
    }

    fn construct(&self, matched: RawMatch) -> FoundEntry {
        matched.into_found_entry()
    }
}

/// Arbitrary predicate and builder closures for callers that need an output
/// shape the stock handlers don't cover.
pub struct Custom<T> {
    predicate: Arc<dyn Fn(&RawEntry) -> bool + Send + Sync>,
    builder: Arc<dyn Fn(RawMatch) -> T + Send + Sync>,
}

impl<T> Custom<T> {
    pub fn new(
        predicate: impl Fn(&RawEntry) -> bool + Send + Sync + 'static,
        builder: impl Fn(RawMatch) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            predicate: Arc::new(predicate),
            builder: Arc::new(builder),
        }
    }
}

impl<T> Clone for Custom<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            builder: Arc::clone(&self.builder),
        }
    }
}

impl<T> std::fmt::Debug for Custom<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Custom").finish_non_exhaustive()
    }
}

impl<T> ResultHandler for Custom<T> {
    type Output = T;

    fn includes(&self, entry: &RawEntry) -> bool {
        (self.predicate)(entry)
    }

    fn construct(&self, matched: RawMatch) -> T {
        (self.builder)(matched)
    }
}
