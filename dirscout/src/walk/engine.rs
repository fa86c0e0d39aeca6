use tracing::{debug, info};

use super::enumerator::TreeEnumerator;
use crate::config::{EntryFilter, WalkConfig};
use crate::errors::WalkResult;
use crate::handler::{AllEntries, DirectoriesOnly, FilesOnly, ResultHandler};
use crate::lister::{DirectoryLister, OsLister};
use crate::results::FoundEntry;

/// Lazily enumerate files matching the configured pattern.
pub fn find_files(config: &WalkConfig) -> WalkResult<TreeEnumerator<OsLister, FilesOnly>> {
    info!(
        "Starting file enumeration: root={} pattern={:?} scope={:?}",
        config.root_path.display(),
        config.pattern,
        config.scope
    );
    TreeEnumerator::new(
        OsLister,
        FilesOnly,
        &config.root_path,
        &config.pattern,
        config.scope,
    )
}

/// Lazily enumerate directories matching the configured pattern.
pub fn find_dirs(config: &WalkConfig) -> WalkResult<TreeEnumerator<OsLister, DirectoriesOnly>> {
    info!(
        "Starting directory enumeration: root={} pattern={:?} scope={:?}",
        config.root_path.display(),
        config.pattern,
        config.scope
    );
    TreeEnumerator::new(
        OsLister,
        DirectoriesOnly,
        &config.root_path,
        &config.pattern,
        config.scope,
    )
}

/// Lazily enumerate both files and directories matching the configured
/// pattern.
pub fn find_entries(config: &WalkConfig) -> WalkResult<TreeEnumerator<OsLister, AllEntries>> {
    info!(
        "Starting enumeration: root={} pattern={:?} scope={:?}",
        config.root_path.display(),
        config.pattern,
        config.scope
    );
    TreeEnumerator::new(
        OsLister,
        AllEntries,
        &config.root_path,
        &config.pattern,
        config.scope,
    )
}

/// Drain a full enumeration into memory, honoring the configured entry
/// filter. For callers that don't need the laziness.
pub fn collect_entries(config: &WalkConfig) -> WalkResult<Vec<FoundEntry>> {
    let entries = match config.entry_filter {
        EntryFilter::Files => drain(find_files(config)?),
        EntryFilter::Directories => drain(find_dirs(config)?),
        EntryFilter::All => drain(find_entries(config)?),
    }?;
    debug!("Enumeration complete: {} entries", entries.len());
    Ok(entries)
}

fn drain<L, H>(enumerator: TreeEnumerator<L, H>) -> WalkResult<Vec<H::Output>>
where
    L: DirectoryLister,
    H: ResultHandler,
{
    let mut out = Vec::new();
    for item in enumerator {
        out.push(item?);
    }
    Ok(out)
}
