//! Command implementations

pub mod build;
pub mod info;
pub mod resolve;

use crate::manifest::Manifest;
use anyhow::Result;
use kiln_project::{Layout, Project};
use std::path::{Path, PathBuf};

/// Load the manifest and assemble the project plus its layout.
///
/// The layout is rooted at the manifest's directory, so relative unit
/// paths and output directories agree no matter where the command runs.
pub(crate) fn load_project(manifest: &Path) -> Result<(Project, Layout)> {
    let root = manifest
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let project = Manifest::load(manifest)?.to_project(&root)?;
    Ok((project, Layout::new(root)))
}
