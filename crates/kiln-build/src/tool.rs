//! Runnable tools and the finder that locates them by name

use crate::error::{BuildError, BuildResult};

/// A runnable tool: a public name plus the command line that launches it.
///
/// For a host-provided tool the command is just the program name; a
/// cached external tool program carries its full launch command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    name: String,
    command: Vec<String>,
}

impl Tool {
    /// A tool launched by its own name
    pub fn of(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            command: vec![name.clone()],
            name,
        }
    }

    /// A tool launched by an explicit command line
    pub fn native(name: impl Into<String>, command: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            command: command.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }
}

/// A finder of tools across composed sources.
///
/// A composite queries its children in order; earlier sources shadow
/// later ones for unique lookups, while `find` surfaces every match.
#[derive(Debug, Clone)]
pub enum ToolFinder {
    Direct(Vec<Tool>),
    Compose(Vec<ToolFinder>),
}

impl ToolFinder {
    pub fn of(tools: impl IntoIterator<Item = Tool>) -> Self {
        Self::Direct(tools.into_iter().collect())
    }

    pub fn compose(finders: impl IntoIterator<Item = ToolFinder>) -> Self {
        Self::Compose(finders.into_iter().collect())
    }

    /// The host toolchain programs every build needs
    pub fn host_tools() -> Self {
        Self::of(["javac", "jar", "javadoc", "jlink", "java"].map(Tool::of))
    }

    pub fn find_all(&self) -> Vec<&Tool> {
        match self {
            Self::Direct(tools) => tools.iter().collect(),
            Self::Compose(finders) => finders.iter().flat_map(ToolFinder::find_all).collect(),
        }
    }

    /// All tools matching a name, in composition order
    pub fn find(&self, name: &str) -> Vec<&Tool> {
        self.find_all()
            .into_iter()
            .filter(|tool| tool.name() == name)
            .collect()
    }

    /// The single tool matching a name
    pub fn find_unique(&self, name: &str) -> BuildResult<&Tool> {
        let mut matches = self.find(name);
        match matches.len() {
            0 => Err(BuildError::ToolNotFound(name.to_string())),
            1 => Ok(matches.remove(0)),
            n => Err(BuildError::ToolNotUnique {
                tool: name.to_string(),
                matches: n,
            }),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_finder_filters_by_name() {
        let finder = ToolFinder::of([Tool::of("javac"), Tool::of("jar")]);
        assert_eq!(finder.find("jar").len(), 1);
        assert!(finder.find("jlink").is_empty());
    }

    #[test]
    fn composite_queries_children_in_order() {
        let local = Tool::native("jar", ["/project/bin/jar"]);
        let host = Tool::of("jar");
        let finder = ToolFinder::compose([
            ToolFinder::of([local.clone()]),
            ToolFinder::of([host]),
        ]);
        let matches = finder.find("jar");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0], &local);
    }

    #[test]
    fn unique_lookup_fails_on_empty_and_ambiguous() {
        let finder = ToolFinder::compose([
            ToolFinder::of([Tool::of("jar")]),
            ToolFinder::of([Tool::of("jar")]),
        ]);
        assert!(matches!(
            finder.find_unique("javac"),
            Err(BuildError::ToolNotFound(_))
        ));
        assert!(matches!(
            finder.find_unique("jar"),
            Err(BuildError::ToolNotUnique { matches: 2, .. })
        ));
    }

    #[test]
    fn host_tools_cover_the_toolchain() {
        let finder = ToolFinder::host_tools();
        for name in ["javac", "jar", "javadoc", "jlink", "java"] {
            assert!(finder.find_unique(name).is_ok(), "missing {name}");
        }
    }
}
