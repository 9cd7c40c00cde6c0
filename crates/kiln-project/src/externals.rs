//! External component requirements and lookup strategies

use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// A retrievable location of an external component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub address: String,
    pub version: Option<String>,
}

impl Location {
    pub fn of(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// A strategy mapping a component name to a retrievable location.
///
/// Locating is a pure string computation; fetching what the address names
/// is the resolver's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Component name -> opaque address
    Direct(BTreeMap<String, String>),
    /// Address template with `{name}` / `{version}` substitution points
    Templated {
        template: String,
        versions: BTreeMap<String, String>,
    },
    /// Repository base plus `group:artifact:version[:classifier]` coordinates
    Coordinate {
        repository: String,
        coordinates: BTreeMap<String, String>,
    },
}

impl Locator {
    pub fn direct(entries: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self::Direct(
            entries
                .into_iter()
                .map(|(name, address)| (name.into(), address.into()))
                .collect(),
        )
    }

    pub fn locate(&self, name: &str) -> Option<Location> {
        match self {
            Self::Direct(addresses) => addresses.get(name).cloned().map(Location::of),
            Self::Templated { template, versions } => {
                let version = versions.get(name)?;
                let address = template.replace("{name}", name).replace("{version}", version);
                Some(Location::of(address).with_version(version))
            }
            Self::Coordinate {
                repository,
                coordinates,
            } => {
                let coordinate = coordinates.get(name)?;
                Some(join_coordinate(repository, coordinate))
            }
        }
    }
}

/// Join a repository base and a Maven-style coordinate into an address.
///
/// A coordinate with fewer than three segments is taken as a literal
/// address.
fn join_coordinate(repository: &str, coordinate: &str) -> Location {
    let split: Vec<&str> = coordinate.split(':').collect();
    if split.len() < 3 {
        return Location::of(coordinate);
    }
    let (group, artifact, version) = (split[0], split[1], split[2]);
    let classifier = split.get(3).filter(|c| !c.is_empty());
    let file = match classifier {
        Some(classifier) => format!("{artifact}-{version}-{classifier}.jar"),
        None => format!("{artifact}-{version}.jar"),
    };
    let address = format!(
        "{}/{}/{artifact}/{version}/{file}",
        repository.trim_end_matches('/'),
        group.replace('.', "/"),
    );
    Location::of(address).with_version(version)
}

/// A priority-ordered chain of locators; the first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorChain {
    list: Vec<Locator>,
}

impl LocatorChain {
    pub fn new(locators: impl IntoIterator<Item = Locator>) -> Self {
        Self {
            list: locators.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn locate(&self, name: &str) -> Option<Location> {
        self.list.iter().find_map(|locator| locator.locate(name))
    }
}

impl From<Vec<Locator>> for LocatorChain {
    fn from(list: Vec<Locator>) -> Self {
        Self { list }
    }
}

/// External component names a project requires beyond its declared units,
/// plus the locator chain that maps names to locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Externals {
    pub requires: BTreeSet<String>,
    pub locators: LocatorChain,
}

impl Externals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requires(mut self, name: impl Into<String>) -> Self {
        self.requires.insert(name.into());
        self
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locators.list.push(locator);
        self
    }
}
