//! Structural validation of a project
//!
//! Every invariant here is checked before any tool is invoked; a violation
//! is fatal for the whole build.

use crate::error::{InvalidProjectError, ProjectResult};
use crate::project::Project;
use crate::schedule::SpaceGraph;
use crate::space::Space;
use crate::LOWEST_RELEASE;
use std::collections::HashSet;

/// Validate a project against the given toolchain feature release.
pub fn validate(project: &Project, feature: u16) -> ProjectResult<()> {
    let mut seen_spaces = HashSet::new();
    for space in &project.spaces {
        if !seen_spaces.insert(space.name.as_str()) {
            return Err(InvalidProjectError::DuplicateSpace(space.name.clone()));
        }
        validate_space(space, feature)?;
    }

    let graph = SpaceGraph::of(project);
    graph.validate()?;
    graph.compute_order()?;
    Ok(())
}

fn validate_space(space: &Space, feature: u16) -> ProjectResult<()> {
    if space.name.trim().is_empty() {
        return Err(InvalidProjectError::BlankSpaceName);
    }
    if space.release != 0 && !(LOWEST_RELEASE..=feature).contains(&space.release) {
        return Err(InvalidProjectError::ReleaseOutOfRange {
            space: space.name.clone(),
            release: space.release,
            low: LOWEST_RELEASE,
            high: feature,
        });
    }

    let mut seen_units = HashSet::new();
    for unit in &space.units {
        if !seen_units.insert(unit.name()) {
            return Err(InvalidProjectError::duplicate_unit(&space.name, unit.name()));
        }
        if unit.is_empty() {
            return Err(InvalidProjectError::empty_unit(&space.name, unit.name()));
        }
        if let Some(release) = unit.targeted.keys().next() {
            if *release == 0 {
                return Err(InvalidProjectError::ZeroTargetedRelease {
                    unit: unit.name().to_string(),
                });
            }
        }
    }

    for launcher in &space.launchers {
        let Some((unit, entry)) = launcher.split_once('/') else {
            return Err(InvalidProjectError::MalformedLauncher {
                space: space.name.clone(),
                launcher: launcher.clone(),
            });
        };
        if unit.is_empty() || entry.is_empty() {
            return Err(InvalidProjectError::MalformedLauncher {
                space: space.name.clone(),
                launcher: launcher.clone(),
            });
        }
        if space.units.find(unit).is_none() {
            return Err(InvalidProjectError::LauncherUnitUndeclared {
                space: space.name.clone(),
                launcher: launcher.clone(),
                unit: unit.to_string(),
            });
        }
    }
    Ok(())
}
