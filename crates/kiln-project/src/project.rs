//! Top-level project model

use crate::error::{InvalidProjectError, ProjectResult};
use crate::externals::Externals;
use crate::space::Space;
use crate::unit::DeclaredUnit;
use chrono::{DateTime, Utc};

/// A non-blank project name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(value: impl Into<String>) -> ProjectResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(InvalidProjectError::BlankProjectName);
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A project version: a value string plus the build timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub value: String,
    pub timestamp: DateTime<Utc>,
}

impl Version {
    pub fn new(value: impl Into<String>) -> ProjectResult<Self> {
        Self::at(value, Utc::now())
    }

    pub fn at(value: impl Into<String>, timestamp: DateTime<Utc>) -> ProjectResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(InvalidProjectError::BlankVersion);
        }
        Ok(Self { value, timestamp })
    }
}

/// The ordered list of a project's spaces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spaces {
    list: Vec<Space>,
}

impl Spaces {
    pub fn new(spaces: impl IntoIterator<Item = Space>) -> Self {
        Self {
            list: spaces.into_iter().collect(),
        }
    }

    pub fn list(&self) -> &[Space] {
        &self.list
    }

    pub fn iter(&self) -> impl Iterator<Item = &Space> {
        self.list.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.list.iter().map(|space| space.name.as_str()).collect()
    }

    pub fn space(&self, name: &str) -> ProjectResult<&Space> {
        self.list
            .iter()
            .find(|space| space.name == name)
            .ok_or_else(|| InvalidProjectError::NoSuchSpace(name.to_string()))
    }
}

impl<'a> IntoIterator for &'a Spaces {
    type Item = &'a Space;
    type IntoIter = std::slice::Iter<'a, Space>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

/// Modular project model.
///
/// Constructed once per build invocation and immutable thereafter; the
/// `with_*` transforms return modified copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: ProjectName,
    pub version: Version,
    pub spaces: Spaces,
    pub externals: Externals,
}

impl Project {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> ProjectResult<Self> {
        Ok(Self {
            name: ProjectName::new(name)?,
            version: Version::new(version)?,
            spaces: Spaces::default(),
            externals: Externals::default(),
        })
    }

    pub fn with_space(mut self, space: Space) -> Self {
        self.spaces.list.push(space);
        self
    }

    pub fn with_externals(mut self, externals: Externals) -> Self {
        self.externals = externals;
        self
    }

    /// All units declared across all spaces
    pub fn units(&self) -> impl Iterator<Item = &DeclaredUnit> {
        self.spaces.iter().flat_map(|space| space.units.iter())
    }

    pub fn to_name_and_version(&self) -> String {
        format!("{} {}", self.name, self.version.value)
    }
}
