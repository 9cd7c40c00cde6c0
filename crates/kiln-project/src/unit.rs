//! Declared units and their source/resource folders

use crate::descriptor::UnitDescriptor;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A collection of source and resource directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folders {
    pub sources: Vec<PathBuf>,
    pub resources: Vec<PathBuf>,
}

impl Folders {
    /// Create folders from source directories only
    pub fn of_sources(sources: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            resources: Vec::new(),
        }
    }

    /// Add a resource directory
    pub fn with_resources(mut self, resources: impl Into<PathBuf>) -> Self {
        self.resources.push(resources.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.resources.is_empty()
    }
}

/// A named buildable component declared by a space.
///
/// The unit name comes from its descriptor. `base` folders apply to every
/// build; `targeted` folders are release-scoped overlays layered on top of
/// the base at package time, keyed by platform release number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredUnit {
    /// Content root of the entire unit
    pub content: PathBuf,
    pub descriptor: UnitDescriptor,
    pub base: Folders,
    pub targeted: BTreeMap<u16, Folders>,
}

impl DeclaredUnit {
    /// Create a unit rooted at `content` whose base sources are `content` itself
    pub fn new(content: impl Into<PathBuf>, descriptor: UnitDescriptor) -> Self {
        let content = content.into();
        let base = Folders::of_sources([content.clone()]);
        Self {
            content,
            descriptor,
            base,
            targeted: BTreeMap::new(),
        }
    }

    pub fn with_base(mut self, base: Folders) -> Self {
        self.base = base;
        self
    }

    /// Add a release-targeted folder overlay
    pub fn with_targeted(mut self, release: u16, folders: Folders) -> Self {
        self.targeted.insert(release, folders);
        self
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Whether the unit declares nothing to compile or package
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.targeted.values().all(Folders::is_empty)
    }
}

/// Load a unit from a content directory holding a `unit.toml` descriptor
impl DeclaredUnit {
    pub fn from_content_dir(content: &Path) -> crate::ProjectResult<Self> {
        let descriptor = UnitDescriptor::from_file(&content.join("unit.toml"))?;
        Ok(Self::new(content, descriptor))
    }
}
