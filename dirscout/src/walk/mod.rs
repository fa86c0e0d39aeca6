//! Directory-tree enumeration.
//!
//! [`enumerator`] holds the pull-based state machine; [`engine`] wires it
//! to the OS-backed lister and the stock result handlers from a
//! [`WalkConfig`](crate::config::WalkConfig).

pub mod engine;
pub mod enumerator;

pub use engine::{collect_entries, find_dirs, find_entries, find_files};
pub use enumerator::TreeEnumerator;
