//! Pattern normalization and compilation.
//!
//! The user-supplied match pattern is validated and canonicalized once, at
//! construction time, before any native call is issued. Compiled patterns
//! are cached process-wide so repeated enumerations with the same pattern
//! (and the per-frame match-all discovery probe) compile only once.

use dashmap::DashMap;
use glob::Pattern;
use once_cell::sync::Lazy;
use std::path::{Component, Path};

use crate::errors::{WalkError, WalkResult};

/// Pattern that matches every entry name.
pub const MATCH_ALL: &str = "*";

/// Characters that are never valid in a match pattern.
const FORBIDDEN_CHARS: &[char] = &['<', '>', '|', '"'];

static PATTERN_CACHE: Lazy<DashMap<String, Pattern>> = Lazy::new(DashMap::new);

/// Canonicalizes a user-supplied match pattern.
///
/// A trailing run of path separators and whitespace is stripped, and the
/// single-character pattern `.` is rewritten to the match-all pattern. The
/// returned string may be empty: an empty pattern means "match nothing" and
/// callers short-circuit to an empty enumeration without touching the
/// filesystem.
///
/// Fails with `InvalidPattern` if the pattern contains a forbidden
/// character, a `..` component, or is rooted (a pattern must not navigate
/// outside the search root).
pub fn normalize(pattern: &str) -> WalkResult<String> {
    if pattern
        .chars()
        .any(|c| c.is_control() || FORBIDDEN_CHARS.contains(&c))
    {
        return Err(WalkError::invalid_pattern(format!(
            "{pattern}: contains a character not allowed in paths"
        )));
    }

    let trimmed = pattern.trim_end_matches(|c: char| c == '/' || c == '\\' || c.is_whitespace());
    if trimmed == "." {
        return Ok(MATCH_ALL.to_string());
    }

    let as_path = Path::new(trimmed);
    if as_path.is_absolute() {
        return Err(WalkError::invalid_pattern(format!(
            "{pattern}: must be relative to the search root"
        )));
    }
    if as_path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(WalkError::invalid_pattern(format!(
            "{pattern}: must not navigate above the search root"
        )));
    }

    Ok(trimmed.to_string())
}

/// Compiles a glob pattern, consulting the process-wide cache first.
pub fn compile(pattern: &str) -> WalkResult<Pattern> {
    if let Some(entry) = PATTERN_CACHE.get(pattern) {
        return Ok(entry.clone());
    }

    let compiled = Pattern::new(pattern)
        .map_err(|e| WalkError::invalid_pattern(format!("{pattern}: {e}")))?;
    PATTERN_CACHE.insert(pattern.to_string(), compiled.clone());
    Ok(compiled)
}
