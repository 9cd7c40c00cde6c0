//! Output-directory conventions consumed and produced by a build
//!
//! ```text
//! <root>/
//! ├── .kiln/out/<space>/classes/java-<release>/<unit>/   # compiled classes
//! ├── .kiln/out/<space>/modules/<unit>.jar               # packaged units
//! └── .kiln/external/                                    # resolved externals
//! ```

use std::path::{Path, PathBuf};

/// Well-known paths of a project checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    out: PathBuf,
    externals: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let out = root.join(".kiln").join("out");
        let externals = root.join(".kiln").join("external");
        Self {
            root,
            out,
            externals,
        }
    }

    pub fn with_out(mut self, out: impl Into<PathBuf>) -> Self {
        self.out = out.into();
        self
    }

    pub fn with_externals(mut self, externals: impl Into<PathBuf>) -> Self {
        self.externals = externals.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding resolved external components
    pub fn externals(&self) -> &Path {
        &self.externals
    }

    /// Output directory of a space
    pub fn out(&self, space: &str) -> PathBuf {
        self.out.join(space)
    }

    /// Compiled-classes directory of a space for a release
    pub fn classes(&self, space: &str, release: u16) -> PathBuf {
        self.out(space).join("classes").join(format!("java-{release}"))
    }

    /// Compiled-classes directory of one unit
    pub fn unit_classes(&self, space: &str, release: u16, unit: &str) -> PathBuf {
        self.classes(space, release).join(unit)
    }

    /// Directory holding a space's packaged unit archives
    pub fn modules(&self, space: &str) -> PathBuf {
        self.out(space).join("modules")
    }

    /// Archive path of one packaged unit
    pub fn jar(&self, space: &str, unit: &str) -> PathBuf {
        self.modules(space).join(format!("{unit}.jar"))
    }
}
