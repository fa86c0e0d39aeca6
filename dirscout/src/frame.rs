//! Search frames and the traversal worklist.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::PathBuf;

/// How far below the root an enumeration descends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecursionScope {
    /// Immediate children of the root only.
    #[default]
    TopOnly,
    /// The full subtree.
    AllDirectories,
}

/// One directory's pending-or-in-progress listing task.
///
/// Two path fields are tracked because the path the caller typed (possibly
/// relative) must be echoed back in results, while the absolute path is
/// used for native calls. Both descend in lock-step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFrame {
    /// Absolute path used for native calls.
    pub native_path: PathBuf,
    /// Caller-facing path echoed back in results.
    pub display_path: PathBuf,
    /// Recursion mode in effect for this frame.
    pub scope: RecursionScope,
}

impl SearchFrame {
    pub fn new(native_path: PathBuf, display_path: PathBuf, scope: RecursionScope) -> Self {
        Self {
            native_path,
            display_path,
            scope,
        }
    }

    /// Frame for a subdirectory discovered while scanning this one.
    pub fn child(&self, name: &str) -> Self {
        Self {
            native_path: self.native_path.join(name),
            display_path: self.display_path.join(name),
            scope: self.scope,
        }
    }
}

/// Ordered collection of pending frames driving depth-first expansion.
///
/// Frames are consumed strictly from the front. Subdirectories discovered
/// while expanding a frame are prepended ahead of any previously queued
/// siblings, preserving their discovery order, which yields pre-order
/// depth-first output.
#[derive(Debug, Default)]
pub struct Worklist {
    frames: VecDeque<SearchFrame>,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, frame: SearchFrame) {
        self.frames.push_back(frame);
    }

    pub fn pop_front(&mut self) -> Option<SearchFrame> {
        self.frames.pop_front()
    }

    /// Insert the frames at the front, keeping their given order.
    pub fn prepend(&mut self, frames: impl IntoIterator<Item = SearchFrame>) {
        let batch: Vec<SearchFrame> = frames.into_iter().collect();
        for frame in batch.into_iter().rev() {
            self.frames.push_front(frame);
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
