//! The native directory-listing boundary.
//!
//! The enumeration state machine never touches the filesystem directly; it
//! drives a [`DirectoryLister`], a minimal open-first / find-next / close
//! contract over one directory listing at a time. [`OsLister`] is the
//! production implementation on top of `std::fs::read_dir`; tests substitute
//! in-memory listers that implement the same trait.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::trace;

use crate::pattern;

/// Attributes reported for a raw directory entry.
///
/// Only the directory bit is guaranteed; richer metadata (timestamps, size)
/// is the consumer's business and is deliberately not populated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryAttributes {
    pub is_dir: bool,
}

/// A single raw entry reported by a native listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Entry name (file or directory name, not a full path).
    pub name: String,
    pub attributes: EntryAttributes,
}

impl RawEntry {
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            attributes: EntryAttributes { is_dir },
        }
    }

    /// True for the `.` and `..` pseudo-entries, which never reach a
    /// result handler.
    pub fn is_dot_entry(&self) -> bool {
        self.name == "." || self.name == ".."
    }
}

/// Errors reported across the native-listing boundary.
///
/// `NotFound` and `Unavailable` are the recoverable conditions: the state
/// machine treats the affected frame as having zero entries. Everything
/// else is fatal and aborts the enumeration.
#[derive(Debug, Error)]
pub enum ListerError {
    #[error("not found")]
    NotFound,
    #[error("unavailable")]
    Unavailable,
    #[error("io error: {0}")]
    Io(io::Error),
}

impl ListerError {
    /// Classify an OS error into the boundary taxonomy.
    pub fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::Unavailable,
            _ => Self::Io(err),
        }
    }

    /// True when the condition means "this frame has no entries" rather
    /// than "abort the enumeration".
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound | Self::Unavailable)
    }

    /// Convert into the `io::Error` attached to a fatal enumeration error.
    pub fn into_io(self) -> io::Error {
        match self {
            Self::NotFound => io::Error::from(io::ErrorKind::NotFound),
            Self::Unavailable => io::Error::from(io::ErrorKind::PermissionDenied),
            Self::Io(err) => err,
        }
    }
}

/// Minimal native listing contract: open a pattern-filtered listing of one
/// directory, pull entries from it one at a time, close it.
///
/// The probe handed to [`open_first`](Self::open_first) is the directory
/// path joined with the name pattern as its final component, and the
/// implementation filters by that component. A missing directory and a
/// directory with zero matching entries both report
/// [`ListerError::NotFound`].
///
/// A handle is bound to exactly one open listing and is consumed by
/// [`close`](Self::close); closing never fails observably.
pub trait DirectoryLister {
    type Handle;

    /// Open a listing for the probe and return the handle together with
    /// the first matching entry.
    fn open_first(&self, probe: &Path) -> Result<(Self::Handle, RawEntry), ListerError>;

    /// Advance the listing. `Ok(None)` signals exhaustion.
    fn find_next(&self, handle: &mut Self::Handle) -> Result<Option<RawEntry>, ListerError>;

    /// Release the listing's native resources.
    fn close(&self, handle: Self::Handle) {
        drop(handle);
    }
}

/// Production lister over `std::fs::read_dir`.
///
/// The pattern component of the probe is compiled through the process-wide
/// pattern cache and applied to entry names as they stream out of the OS.
/// Entry names that are not valid UTF-8 cannot be matched against a textual
/// pattern and are skipped.
///
/// Symbolic links are reported with the attributes of the link itself, so a
/// link to a directory is listed but never descended into.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsLister;

/// One open OS-level listing: the lazy `ReadDir` stream plus the compiled
/// name filter.
#[derive(Debug)]
pub struct OsHandle {
    entries: fs::ReadDir,
    filter: glob::Pattern,
}

impl OsLister {
    fn scan(handle: &mut OsHandle) -> Result<Option<RawEntry>, ListerError> {
        for entry in handle.entries.by_ref() {
            let entry = entry.map_err(ListerError::from_io)?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                trace!("Skipping non-UTF-8 entry name: {:?}", name);
                continue;
            };
            if !handle.filter.matches(name) {
                continue;
            }
            let file_type = entry.file_type().map_err(ListerError::from_io)?;
            return Ok(Some(RawEntry::new(name, file_type.is_dir())));
        }
        Ok(None)
    }
}

impl DirectoryLister for OsLister {
    type Handle = OsHandle;

    fn open_first(&self, probe: &Path) -> Result<(OsHandle, RawEntry), ListerError> {
        let dir = probe.parent().ok_or(ListerError::NotFound)?;
        let filter = probe
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(ListerError::NotFound)?;
        let filter = pattern::compile(filter)
            .map_err(|e| ListerError::Io(io::Error::new(io::ErrorKind::InvalidInput, e)))?;

        let entries = fs::read_dir(dir).map_err(ListerError::from_io)?;
        let mut handle = OsHandle { entries, filter };
        match Self::scan(&mut handle)? {
            Some(first) => Ok((handle, first)),
            None => Err(ListerError::NotFound),
        }
    }

    fn find_next(&self, handle: &mut OsHandle) -> Result<Option<RawEntry>, ListerError> {
        Self::scan(handle)
    }
}
