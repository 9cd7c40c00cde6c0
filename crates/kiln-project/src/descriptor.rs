//! Unit descriptor parsing and types (unit.toml)

use crate::error::{InvalidProjectError, ProjectResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Descriptor of a declared unit (unit.toml)
///
/// Declares the unit's name, the component names it requires, and the
/// capabilities it exports or provides. The build workflow additionally
/// reads the optional main entry point when assembling archiver calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct UnitDescriptor {
    pub name: String,
    #[serde(default)]
    pub requires: BTreeSet<String>,
    #[serde(default)]
    pub exports: Vec<String>,
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default)]
    pub main_entry_point: Option<String>,
}

impl UnitDescriptor {
    /// Create a descriptor with a name and no requirements
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: BTreeSet::new(),
            exports: Vec::new(),
            provides: Vec::new(),
            main_entry_point: None,
        }
    }

    /// Add a required component name
    pub fn with_requires(mut self, name: impl Into<String>) -> Self {
        self.requires.insert(name.into());
        self
    }

    /// Set the main entry point (`qualified.EntryPoint`)
    pub fn with_main_entry_point(mut self, entry: impl Into<String>) -> Self {
        self.main_entry_point = Some(entry.into());
        self
    }

    /// Parse a descriptor from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a descriptor from a unit.toml file
    pub fn from_file(path: &Path) -> ProjectResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| InvalidProjectError::DescriptorRead {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;
        Self::from_str(&content).map_err(|e| InvalidProjectError::DescriptorParse {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_descriptor() {
        let descriptor = UnitDescriptor::from_str(r#"name = "com.example.app""#).unwrap();
        assert_eq!(descriptor.name, "com.example.app");
        assert!(descriptor.requires.is_empty());
        assert!(descriptor.main_entry_point.is_none());
    }

    #[test]
    fn parses_full_descriptor() {
        let descriptor = UnitDescriptor::from_str(
            r#"
            name = "com.example.app"
            requires = ["com.example.lib", "org.junit"]
            exports = ["com.example.app.api"]
            provides = ["com.example.spi.Service=com.example.app.ServiceImpl"]
            main-entry-point = "com.example.app.Main"
            "#,
        )
        .unwrap();
        assert_eq!(descriptor.requires.len(), 2);
        assert!(descriptor.requires.contains("org.junit"));
        assert_eq!(descriptor.exports, vec!["com.example.app.api"]);
        assert_eq!(
            descriptor.main_entry_point.as_deref(),
            Some("com.example.app.Main")
        );
    }

    #[test]
    fn builder_accumulates_requires() {
        let descriptor = UnitDescriptor::named("a")
            .with_requires("b")
            .with_requires("c")
            .with_requires("b");
        assert_eq!(descriptor.requires.len(), 2);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let result = UnitDescriptor::from_file(Path::new("does/not/exist/unit.toml"));
        assert!(matches!(
            result,
            Err(InvalidProjectError::DescriptorRead { .. })
        ));
    }
}
