//! Module-source-path computation
//!
//! The compiler wants, per unit, a path pattern whose expansion names that
//! unit's source folders. When the unit name appears as a path segment the
//! folder collapses into a `*` pattern shared by all units with the same
//! shape; otherwise a `unit=path` specific form is emitted.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::PATH_LIST_SEPARATOR;

/// Compute the minimal set of source-path entries for the given units.
///
/// Pattern forms are deduplicated across units; units whose folders cannot
/// be expressed as a pattern fall back to one specific form each. Order is
/// deterministic: sorted patterns first, then specific forms in unit order.
pub fn compute(units: &BTreeMap<String, Vec<PathBuf>>) -> Vec<String> {
    let mut patterns = BTreeSet::new();
    let mut specifics = Vec::new();
    for (unit, paths) in units {
        let forms: Option<Vec<String>> = paths
            .iter()
            .map(|path| to_pattern_form(path, unit))
            .collect();
        match forms {
            Some(forms) => patterns.extend(forms),
            None => specifics.push(to_specific_form(unit, paths)),
        }
    }
    patterns.into_iter().chain(specifics).collect()
}

/// Express `path` as a pattern by replacing the unit-name segment with `*`.
///
/// Returns `None` when the unit name is not a segment of the path.
pub fn to_pattern_form(path: &Path, unit: &str) -> Option<String> {
    let segments: Vec<&str> = path
        .iter()
        .map(|segment| segment.to_str().unwrap_or_default())
        .collect();
    let position = segments.iter().position(|segment| *segment == unit)?;

    let mut pattern: Vec<&str> = segments.clone();
    pattern[position] = "*";
    while pattern.last() == Some(&"*") {
        pattern.pop();
    }
    if pattern.is_empty() {
        return Some(".".to_string());
    }
    let mut joined = pattern.join(&MAIN_SEPARATOR.to_string());
    if joined.starts_with('*') {
        joined.insert(0, MAIN_SEPARATOR);
        joined.insert(0, '.');
    }
    Some(joined)
}

/// Express a unit's folders as an explicit `unit=path[:path...]` entry.
pub fn to_specific_form(unit: &str, paths: &[PathBuf]) -> String {
    let joined = paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(&PATH_LIST_SEPARATOR.to_string());
    format!("{unit}={joined}")
}
