//! The enumeration state machine.
//!
//! [`TreeEnumerator`] turns the stateful native listing API into a
//! pull-based iterator: one [`advance`](TreeEnumerator::advance) call runs
//! exactly until the next qualifying entry is found (or the traversal is
//! exhausted) and suspends there. Recursion is driven by an explicit
//! worklist rather than the call stack, so native-stack usage is bounded
//! regardless of tree depth.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{unify_path, WalkError, WalkResult};
use crate::frame::{RecursionScope, SearchFrame, Worklist};
use crate::handler::{RawMatch, ResultHandler};
use crate::lister::{DirectoryLister, ListerError, RawEntry};
use crate::pattern::{self, MATCH_ALL};

/// Where the machine is suspended between pulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    ExpandNextDirectory,
    DrainCurrentDirectory,
    Done,
}

/// The frame currently being drained and its open native handle.
///
/// The handle is exclusively owned here for the duration of one frame's
/// scan and is never held across frames.
struct ActiveScan<Hd> {
    frame: SearchFrame,
    handle: Hd,
}

/// Outcome of one fetch from the current listing, captured so the borrow of
/// the active scan ends before the machine mutates itself.
enum Fetched<T> {
    Yield(T),
    Exhausted,
    Fatal(PathBuf, ListerError),
}

/// Lazy, resumable, depth-first enumerator of directory entries matching a
/// glob pattern.
///
/// Pulls run synchronously; the enumerator suspends only at the point of
/// yielding one qualifying entry. It is not safe for concurrent pulls, but
/// independent [`restart`](TreeEnumerator::restart)s, each with their own
/// worklist and handle, may run concurrently.
///
/// Dropping the enumerator mid-traversal releases the currently held
/// native handle; advancing afterwards yields nothing and raises no error.
pub struct TreeEnumerator<L: DirectoryLister, H: ResultHandler> {
    lister: L,
    handler: H,
    /// Absolute directory the scan starts in.
    search_dir: PathBuf,
    /// Caller-facing equivalent of `search_dir`.
    display_dir: PathBuf,
    /// Separator-free name pattern; empty means "match nothing".
    file_pattern: String,
    scope: RecursionScope,
    phase: Phase,
    worklist: Worklist,
    current: Option<ActiveScan<L::Handle>>,
    /// Entry buffered by the open call, yielded before the first find-next.
    pending: Option<RawEntry>,
}

impl<L: DirectoryLister, H: ResultHandler> TreeEnumerator<L, H> {
    /// Build an enumerator over `lister` rooted at `root`.
    ///
    /// The pattern is normalized and compiled here, so a malformed pattern
    /// fails at construction rather than mid-traversal. The pattern may
    /// carry a directory prefix (`logs/*.txt`), which shifts the search
    /// root down without changing how results echo the caller's path.
    pub fn new(
        lister: L,
        handler: H,
        root: impl AsRef<Path>,
        raw_pattern: &str,
        scope: RecursionScope,
    ) -> WalkResult<Self> {
        let root = root.as_ref();
        let normalized = pattern::normalize(raw_pattern)?;

        let abs_root = unify_path(root);
        let (search_dir, display_dir, file_pattern) = if normalized.is_empty() {
            (abs_root, root.to_path_buf(), String::new())
        } else {
            let rel = Path::new(&normalized);
            let file_pattern = rel
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_owned)
                .ok_or_else(|| WalkError::invalid_pattern(normalized.clone()))?;
            pattern::compile(&file_pattern)?;

            let dir_part = rel.parent().unwrap_or_else(|| Path::new(""));
            if dir_part.as_os_str().is_empty() {
                (abs_root, root.to_path_buf(), file_pattern)
            } else {
                (abs_root.join(dir_part), root.join(dir_part), file_pattern)
            }
        };

        debug!(
            "New enumerator: dir={} pattern={:?} scope={:?}",
            search_dir.display(),
            file_pattern,
            scope
        );

        Ok(Self {
            lister,
            handler,
            search_dir,
            display_dir,
            file_pattern,
            scope,
            phase: Phase::Init,
            worklist: Worklist::new(),
            current: None,
            pending: None,
        })
    }

    /// Advance to the next qualifying entry.
    ///
    /// Returns `Ok(None)` on exhaustion (and on every call after it).
    /// Recoverable native conditions are absorbed here; a fatal one closes
    /// everything, puts the machine in its terminal state, and surfaces
    /// once with the offending path attached.
    pub fn advance(&mut self) -> WalkResult<Option<H::Output>> {
        loop {
            match self.phase {
                Phase::Done => return Ok(None),
                Phase::Init => {
                    if self.file_pattern.is_empty() {
                        trace!("Pattern matches nothing, finishing without native calls");
                        self.phase = Phase::Done;
                        return Ok(None);
                    }
                    let frame = SearchFrame::new(
                        self.search_dir.clone(),
                        self.display_dir.clone(),
                        self.scope,
                    );
                    match self.scope {
                        RecursionScope::TopOnly => {
                            if self.open_frame(frame)? {
                                self.phase = Phase::DrainCurrentDirectory;
                            } else {
                                self.phase = Phase::Done;
                                return Ok(None);
                            }
                        }
                        RecursionScope::AllDirectories => {
                            self.worklist.push_back(frame);
                            self.phase = Phase::ExpandNextDirectory;
                        }
                    }
                }
                Phase::ExpandNextDirectory => {
                    let Some(frame) = self.worklist.pop_front() else {
                        self.phase = Phase::Done;
                        return Ok(None);
                    };
                    trace!("Expanding directory: {}", frame.native_path.display());
                    self.discover_subdirectories(&frame)?;
                    if self.open_frame(frame)? {
                        self.phase = Phase::DrainCurrentDirectory;
                    }
                    // Frame had zero entries: stay here and take the next one.
                }
                Phase::DrainCurrentDirectory => {
                    if let Some(output) = self.drain_current()? {
                        return Ok(Some(output));
                    }
                    match self.scope {
                        RecursionScope::TopOnly => {
                            self.phase = Phase::Done;
                            return Ok(None);
                        }
                        RecursionScope::AllDirectories => {
                            self.phase = Phase::ExpandNextDirectory;
                        }
                    }
                }
            }
        }
    }

    /// Release the held native handle and put the machine in its terminal
    /// state. Safe to call at any point; later pulls yield nothing.
    pub fn close(&mut self) {
        if let Some(scan) = self.current.take() {
            self.lister.close(scan.handle);
        }
        self.pending = None;
        self.worklist.clear();
        self.phase = Phase::Done;
    }

    /// Open the pattern-filtered content listing for `frame`.
    ///
    /// On success the first entry is buffered and the frame becomes
    /// current. Returns `Ok(false)` when the frame has zero entries
    /// (recoverable conditions included).
    fn open_frame(&mut self, frame: SearchFrame) -> WalkResult<bool> {
        let probe = frame.native_path.join(&self.file_pattern);
        match self.lister.open_first(&probe) {
            Ok((handle, first)) => {
                self.pending = Some(first);
                self.current = Some(ActiveScan { frame, handle });
                Ok(true)
            }
            Err(err) if err.is_recoverable() => {
                debug!(
                    "Treating {} as empty: {}",
                    frame.native_path.display(),
                    err
                );
                Ok(false)
            }
            Err(err) => Err(self.fail(frame.native_path.clone(), err)),
        }
    }

    /// Scan `frame`'s direct subdirectories with a short-lived match-all
    /// listing and prepend them to the worklist in discovery order.
    ///
    /// A subdirectory that vanished or became unreadable since discovery
    /// contributes nothing; sibling branches are unaffected.
    fn discover_subdirectories(&mut self, frame: &SearchFrame) -> WalkResult<()> {
        let probe = frame.native_path.join(MATCH_ALL);
        let (mut handle, first) = match self.lister.open_first(&probe) {
            Ok(opened) => opened,
            Err(err) if err.is_recoverable() => {
                debug!(
                    "Skipping subdirectory scan of {}: {}",
                    frame.native_path.display(),
                    err
                );
                return Ok(());
            }
            Err(err) => return Err(self.fail(frame.native_path.clone(), err)),
        };

        let mut discovered = Vec::new();
        let mut next = Some(first);
        while let Some(entry) = next.take() {
            if entry.attributes.is_dir && !entry.is_dot_entry() {
                discovered.push(frame.child(&entry.name));
            }
            next = match self.lister.find_next(&mut handle) {
                Ok(n) => n,
                Err(err) if err.is_recoverable() => None,
                Err(err) => {
                    self.lister.close(handle);
                    return Err(self.fail(frame.native_path.clone(), err));
                }
            };
        }
        self.lister.close(handle);

        trace!(
            "Discovered {} subdirectories under {}",
            discovered.len(),
            frame.native_path.display()
        );
        self.worklist.prepend(discovered);
        Ok(())
    }

    /// Pull from the current listing until an entry passes the handler.
    ///
    /// Returns `Ok(None)` once the listing is exhausted (the handle is
    /// closed at that point).
    fn drain_current(&mut self) -> WalkResult<Option<H::Output>> {
        loop {
            let fetched = {
                let Some(scan) = self.current.as_mut() else {
                    return Ok(None);
                };
                let next = match self.pending.take() {
                    Some(entry) => Ok(Some(entry)),
                    None => self.lister.find_next(&mut scan.handle),
                };
                match next {
                    Ok(Some(entry)) if entry.is_dot_entry() => continue,
                    Ok(Some(entry)) if !self.handler.includes(&entry) => continue,
                    Ok(Some(entry)) => Fetched::Yield(RawMatch {
                        absolute_path: scan.frame.native_path.join(&entry.name),
                        display_path: scan.frame.display_path.join(&entry.name),
                        attributes: entry.attributes,
                    }),
                    Ok(None) => Fetched::Exhausted,
                    Err(err) if err.is_recoverable() => Fetched::Exhausted,
                    Err(err) => Fetched::Fatal(scan.frame.native_path.clone(), err),
                }
            };
            match fetched {
                Fetched::Yield(matched) => return Ok(Some(self.handler.construct(matched))),
                Fetched::Exhausted => {
                    if let Some(scan) = self.current.take() {
                        self.lister.close(scan.handle);
                    }
                    return Ok(None);
                }
                Fetched::Fatal(path, err) => return Err(self.fail(path, err)),
            }
        }
    }

    /// Fatal-error path: run cleanup first, then build the error carrying
    /// the offending path and native code.
    fn fail(&mut self, path: PathBuf, err: ListerError) -> WalkError {
        debug!("Fatal native error at {}: {}", path.display(), err);
        self.close();
        WalkError::io_at(path, err.into_io())
    }
}

impl<L: DirectoryLister + Clone, H: ResultHandler + Clone> TreeEnumerator<L, H> {
    /// A fresh enumerator with this one's configuration, unaffected by how
    /// far this one has progressed.
    pub fn restart(&self) -> Self {
        Self {
            lister: self.lister.clone(),
            handler: self.handler.clone(),
            search_dir: self.search_dir.clone(),
            display_dir: self.display_dir.clone(),
            file_pattern: self.file_pattern.clone(),
            scope: self.scope,
            phase: Phase::Init,
            worklist: Worklist::new(),
            current: None,
            pending: None,
        }
    }
}

/// A clone is always a fresh traversal: it starts from the configuration
/// the original was built with, never from its progress. Handles are owned
/// exclusively by one enumerator and are never shared into a clone.
impl<L: DirectoryLister + Clone, H: ResultHandler + Clone> Clone for TreeEnumerator<L, H> {
    fn clone(&self) -> Self {
        self.restart()
    }
}

impl<L: DirectoryLister, H: ResultHandler> Iterator for TreeEnumerator<L, H> {
    type Item = WalkResult<H::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().transpose()
    }
}

impl<L: DirectoryLister, H: ResultHandler> Drop for TreeEnumerator<L, H> {
    fn drop(&mut self) {
        self.close();
    }
}
