//! Project manifest (`kiln.toml`) loading
//!
//! The manifest is the declarative front door: project name and version,
//! one `[[space]]` table per space, and an optional `[externals]` section
//! naming required components and the locators that map names to
//! addresses. Each unit entry points at a content directory holding a
//! `unit.toml` descriptor; an entry may override the folder layout
//! in place.

use anyhow::{Context, Result};
use kiln_project::{
    DeclaredUnit, Externals, Folders, Locator, Project, Space, UnitDescriptor,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const MANIFEST_FILE: &str = "kiln.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub project: ProjectSection,
    #[serde(default, rename = "space")]
    pub spaces: Vec<SpaceSection>,
    pub externals: Option<ExternalsSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpaceSection {
    pub name: String,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub release: u16,
    #[serde(default)]
    pub launchers: Vec<String>,
    #[serde(default)]
    pub units: Vec<UnitEntry>,
    #[serde(default)]
    pub tweaks: BTreeMap<String, Vec<String>>,
}

/// Either a bare content directory or a directory with folder overrides
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UnitEntry {
    Dir(String),
    Detailed {
        content: String,
        #[serde(default)]
        sources: Vec<String>,
        #[serde(default)]
        resources: Vec<String>,
        #[serde(default)]
        targeted: BTreeMap<String, FoldersSection>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoldersSection {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalsSection {
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default, rename = "locator")]
    pub locators: Vec<LocatorSection>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum LocatorSection {
    Direct {
        entries: BTreeMap<String, String>,
    },
    Templated {
        template: String,
        #[serde(default)]
        versions: BTreeMap<String, String>,
    },
    Coordinate {
        repository: String,
        #[serde(default)]
        coordinates: BTreeMap<String, String>,
    },
}

impl Manifest {
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse project manifest")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Assemble the immutable project model, reading each unit's
    /// `unit.toml` descriptor relative to `root`.
    pub fn to_project(&self, root: &Path) -> Result<Project> {
        let mut project = Project::new(&self.project.name, &self.project.version)?;
        for section in &self.spaces {
            let mut space = Space::new(&section.name).with_release(section.release);
            for requires in &section.requires {
                space = space.with_requires(requires);
            }
            for launcher in &section.launchers {
                space = space.with_launcher(launcher);
            }
            for (tool, args) in &section.tweaks {
                space = space.with_tweak(tool, args.clone());
            }
            for entry in &section.units {
                space = space.with_unit(entry.to_unit(root)?);
            }
            project = project.with_space(space);
        }
        if let Some(section) = &self.externals {
            let mut externals = Externals::new();
            for requires in &section.requires {
                externals = externals.with_requires(requires);
            }
            for locator in &section.locators {
                externals = externals.with_locator(locator.to_locator());
            }
            project = project.with_externals(externals);
        }
        Ok(project)
    }
}

impl UnitEntry {
    fn to_unit(&self, root: &Path) -> Result<DeclaredUnit> {
        match self {
            Self::Dir(content) => {
                let dir = root.join(content);
                DeclaredUnit::from_content_dir(&dir)
                    .with_context(|| format!("Failed to load unit from {}", dir.display()))
            }
            Self::Detailed {
                content,
                sources,
                resources,
                targeted,
            } => {
                let dir = root.join(content);
                let descriptor = UnitDescriptor::from_file(&dir.join("unit.toml"))
                    .with_context(|| format!("Failed to load unit from {}", dir.display()))?;
                let mut unit = DeclaredUnit::new(&dir, descriptor);
                if !sources.is_empty() || !resources.is_empty() {
                    unit = unit.with_base(folders(root, sources, resources));
                }
                for (release, section) in targeted {
                    let release: u16 = release
                        .parse()
                        .with_context(|| format!("Invalid targeted release '{release}'"))?;
                    unit = unit.with_targeted(
                        release,
                        folders(root, &section.sources, &section.resources),
                    );
                }
                Ok(unit)
            }
        }
    }
}

fn folders(root: &Path, sources: &[String], resources: &[String]) -> Folders {
    let mut folders = Folders::of_sources(sources.iter().map(|s| root.join(s)));
    for resource in resources {
        folders = folders.with_resources(root.join(resource));
    }
    folders
}

impl LocatorSection {
    fn to_locator(&self) -> Locator {
        match self {
            Self::Direct { entries } => Locator::Direct(entries.clone()),
            Self::Templated { template, versions } => Locator::Templated {
                template: template.clone(),
                versions: versions.clone(),
            },
            Self::Coordinate {
                repository,
                coordinates,
            } => Locator::Coordinate {
                repository: repository.clone(),
                coordinates: coordinates.clone(),
            },
        }
    }
}
