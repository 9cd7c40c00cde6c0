//! Build spaces and their declared-unit collections

use crate::layout::Layout;
use crate::source_path;
use crate::unit::DeclaredUnit;
use crate::PATH_LIST_SEPARATOR;
use std::collections::BTreeMap;

/// An ordered collection of declared units, keyed by name.
///
/// Insertion order is preserved for diagnostics; name lookups scan the
/// list, which is short in practice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredUnits {
    list: Vec<DeclaredUnit>,
}

impl DeclaredUnits {
    pub fn new(units: impl IntoIterator<Item = DeclaredUnit>) -> Self {
        Self {
            list: units.into_iter().collect(),
        }
    }

    pub fn list(&self) -> &[DeclaredUnit] {
        &self.list
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeclaredUnit> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&DeclaredUnit> {
        self.list.iter().find(|unit| unit.name() == name)
    }

    /// Unit names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.list.iter().map(DeclaredUnit::name).collect();
        names.sort_unstable();
        names
    }

    pub fn names_joined(&self, delimiter: &str) -> String {
        self.names().join(delimiter)
    }

    /// Source-path entries covering every unit's base source folders
    pub fn to_module_source_paths(&self) -> Vec<String> {
        let mut map = BTreeMap::new();
        for unit in &self.list {
            map.insert(unit.name().to_string(), unit.base.sources.clone());
        }
        source_path::compute(&map)
    }
}

impl<'a> IntoIterator for &'a DeclaredUnits {
    type Item = &'a DeclaredUnit;
    type IntoIter = std::slice::Iter<'a, DeclaredUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

/// A named build realm grouping units that share a target platform release.
///
/// `requires` names the spaces whose compiled output this one may read;
/// their declaration order is the module-path order (first-listed wins on
/// shadowing), so it is kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    pub name: String,
    pub requires: Vec<String>,
    /// Target platform release; 0 means the current one
    pub release: u16,
    /// Launch entry points, each `"unit/qualified-entry-point"`
    pub launchers: Vec<String>,
    pub units: DeclaredUnits,
    /// Extra arguments appended to a named tool's calls within this space
    pub tweaks: BTreeMap<String, Vec<String>>,
}

impl Space {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            release: 0,
            launchers: Vec::new(),
            units: DeclaredUnits::default(),
            tweaks: BTreeMap::new(),
        }
    }

    pub fn with_requires(mut self, space: impl Into<String>) -> Self {
        self.requires.push(space.into());
        self
    }

    pub fn with_release(mut self, release: u16) -> Self {
        self.release = release;
        self
    }

    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        self.launchers.push(launcher.into());
        self
    }

    pub fn with_unit(mut self, unit: DeclaredUnit) -> Self {
        self.units.list.push(unit);
        self
    }

    pub fn with_tweak(mut self, tool: impl Into<String>, args: Vec<String>) -> Self {
        self.tweaks.insert(tool.into(), args);
        self
    }

    /// The targeted release, or `None` when building for the current one
    pub fn targets(&self) -> Option<u16> {
        (self.release != 0).then_some(self.release)
    }

    /// The release directory key, falling back to the toolchain feature
    pub fn effective_release(&self, feature: u16) -> u16 {
        self.targets().unwrap_or(feature)
    }

    /// Launcher entry point for a unit, if one targets it
    pub fn launcher_for(&self, unit: &str) -> Option<&str> {
        self.launchers
            .iter()
            .find_map(|launcher| launcher.strip_prefix(&format!("{unit}/")))
    }

    /// Compose the module path for compiling against this space.
    ///
    /// Elements are the `modules` directories of every required space in
    /// declaration order, then the externals directory, filtered to
    /// directories that exist. Returns `None` when no element exists.
    pub fn module_path(&self, layout: &Layout) -> Option<String> {
        let required = self.requires.iter().map(|space| layout.modules(space));
        let elements: Vec<String> = required
            .chain([layout.externals().to_path_buf()])
            .filter(|path| path.is_dir())
            .map(|path| path.display().to_string())
            .collect();
        if elements.is_empty() {
            return None;
        }
        Some(elements.join(&PATH_LIST_SEPARATOR.to_string()))
    }

    /// A synthetic space for computing a path to *run* this realm.
    ///
    /// Its requires list starts with this space itself, so the realm's own
    /// packaged units shadow anything it reads from elsewhere.
    pub fn to_runtime_space(&self) -> Space {
        let mut requires = vec![self.name.clone()];
        requires.extend(self.requires.iter().cloned());
        Space {
            name: "runtime".to_string(),
            requires,
            release: 0,
            launchers: Vec::new(),
            units: DeclaredUnits::default(),
            tweaks: BTreeMap::new(),
        }
    }
}
