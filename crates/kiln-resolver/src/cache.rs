//! Directory-backed cache of resolved external components
//!
//! One artifact per component, named `<component>.jar` or
//! `<component>@<version>.jar`. Append-only during a resolution run;
//! a re-fetch of a present entry is a cache hit, not an error.

use crate::{ResolveError, ResolveResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ResolutionCache {
    directory: PathBuf,
}

impl ResolutionCache {
    /// Open (and create if needed) a cache at the given directory
    pub fn open(directory: impl Into<PathBuf>) -> ResolveResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)
            .map_err(|e| ResolveError::cache(&directory, e))?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path an entry would occupy
    pub fn entry_path(&self, name: &str, version: Option<&str>) -> PathBuf {
        let file = match version {
            Some(version) => format!("{name}@{version}.jar"),
            None => format!("{name}.jar"),
        };
        self.directory.join(file)
    }

    /// Find the artifact cached for a component name, any version
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let exact = self.directory.join(format!("{name}.jar"));
        if exact.is_file() {
            return Some(exact);
        }
        let prefix = format!("{name}@");
        let entries = fs::read_dir(&self.directory).ok()?;
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .find(|path| {
                path.file_name()
                    .and_then(|f| f.to_str())
                    .is_some_and(|f| f.starts_with(&prefix) && f.ends_with(".jar"))
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Names of all cached components, sorted
    pub fn names(&self) -> ResolveResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.directory)
            .map_err(|e| ResolveError::cache(&self.directory, e))?
        {
            let entry = entry.map_err(|e| ResolveError::cache(&self.directory, e))?;
            let file = entry.file_name();
            let Some(file) = file.to_str() else { continue };
            let Some(stem) = file.strip_suffix(".jar") else {
                continue;
            };
            let name = stem.split_once('@').map_or(stem, |(name, _)| name);
            names.push(name.to_string());
        }
        names.sort_unstable();
        Ok(names)
    }

    /// Temp-file path a concurrent writer should stage into before
    /// renaming onto the entry path.
    pub fn staging_path(&self, name: &str, version: Option<&str>) -> PathBuf {
        let entry = self.entry_path(name, version);
        entry.with_extension("jar.part")
    }

    /// Commit a fully written staging file as the entry for `name`.
    pub fn commit(&self, name: &str, version: Option<&str>) -> ResolveResult<PathBuf> {
        let staging = self.staging_path(name, version);
        let entry = self.entry_path(name, version);
        fs::rename(&staging, &entry).map_err(|e| ResolveError::cache(&staging, e))?;
        Ok(entry)
    }
}
