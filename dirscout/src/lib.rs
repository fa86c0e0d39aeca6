pub mod config;
pub mod errors;
pub mod frame;
pub mod handler;
pub mod lister;
pub mod pattern;
pub mod results;
pub mod walk;

pub use config::{EntryFilter, WalkConfig};
pub use errors::{WalkError, WalkResult};
pub use frame::{RecursionScope, SearchFrame, Worklist};
pub use handler::{AllEntries, Custom, DirectoriesOnly, FilesOnly, RawMatch, ResultHandler};
pub use lister::{DirectoryLister, EntryAttributes, ListerError, OsLister, RawEntry};
pub use results::{EntryKind, FoundEntry};
pub use walk::{collect_entries, find_dirs, find_entries, find_files, TreeEnumerator};
