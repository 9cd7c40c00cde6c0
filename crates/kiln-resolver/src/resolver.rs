//! Fixed-point resolution of missing external components

use crate::cache::ResolutionCache;
use crate::fetch::Fetcher;
use crate::inspect::ArtifactInspector;
use crate::{is_platform_component, ResolveError, ResolveResult};
use kiln_project::{Layout, Location, Project};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Print one line per resolved component
    pub verbose: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { verbose: false }
    }
}

/// Fetches all transitively required external components into the cache.
///
/// The loop is a fixed point over a monotonically growing required-set:
/// each pass fetches the currently missing names, unions the fetched
/// artifacts' own requirements into the required-set, and repeats until an
/// iteration discovers nothing new. Unresolvable names are collected and
/// reported together once no further progress is possible.
pub struct Resolver<'a> {
    fetcher: &'a dyn Fetcher,
    inspector: &'a dyn ArtifactInspector,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, inspector: &'a dyn ArtifactInspector) -> Self {
        Self {
            fetcher,
            inspector,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve all missing external components of a project.
    ///
    /// Idempotent and safe to re-run: cached entries are never re-fetched.
    pub fn resolve(&self, project: &Project, layout: &Layout) -> ResolveResult<ResolutionCache> {
        let cache = ResolutionCache::open(layout.externals())?;

        let declared: BTreeSet<String> = project
            .units()
            .map(|unit| unit.name().to_string())
            .collect();
        let mut required: BTreeSet<String> = project
            .units()
            .flat_map(|unit| unit.descriptor.requires.iter().cloned())
            .chain(project.externals.requires.iter().cloned())
            .filter(|name| !is_platform_component(name))
            .collect();

        // Names that failed to locate or fetch in an earlier pass. Kept
        // out of later passes so one bad name cannot stall the loop.
        let mut unresolvable: BTreeSet<String> = BTreeSet::new();

        let mut iterations = 0usize;
        loop {
            let missing: Vec<String> = required
                .iter()
                .filter(|name| !declared.contains(*name))
                .filter(|name| !unresolvable.contains(*name))
                .filter(|name| !cache.contains(name))
                .cloned()
                .collect();
            if missing.is_empty() {
                break;
            }

            // Every productive pass discovers at least one new name, so
            // more passes than distinct names means no progress.
            iterations += 1;
            if iterations > required.len() {
                break;
            }

            let mut located = Vec::new();
            for name in missing {
                match project.externals.locators.locate(&name) {
                    Some(location) => located.push((name, location)),
                    None => {
                        unresolvable.insert(name);
                    }
                }
            }

            let fetched: Vec<(String, ResolveResult<std::path::PathBuf>)> = located
                .into_par_iter()
                .map(|(name, location)| {
                    let result = self.fetch_into_cache(&cache, &name, &location);
                    (name, result)
                })
                .collect();

            let mut progressed = false;
            for (name, result) in fetched {
                match result {
                    Ok(artifact) => {
                        progressed = true;
                        if self.config.verbose {
                            println!("Resolved {name} -> {}", artifact.display());
                        }
                        let requires = self.inspector.requires_of(&artifact)?;
                        required.extend(
                            requires
                                .into_iter()
                                .filter(|name| !is_platform_component(name)),
                        );
                    }
                    Err(error) => {
                        if self.config.verbose {
                            println!("Failed to fetch {name}: {error}");
                        }
                        unresolvable.insert(name);
                    }
                }
            }
            if !progressed {
                break;
            }
        }

        // Recompute the final missing set before declaring failure: the
        // required-set is authoritative, not the per-pass bookkeeping.
        let missing: Vec<&String> = required
            .iter()
            .filter(|name| !declared.contains(*name))
            .filter(|name| !cache.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(ResolveError::unresolved(missing));
        }
        Ok(cache)
    }

    fn fetch_into_cache(
        &self,
        cache: &ResolutionCache,
        name: &str,
        location: &Location,
    ) -> ResolveResult<std::path::PathBuf> {
        let version = location.version.as_deref();
        let staging = cache.staging_path(name, version);
        self.fetcher
            .fetch(&location.address, &staging)
            .map_err(|error| match error {
                ResolveError::FetchFailed { reason, .. } => ResolveError::FetchFailed {
                    name: name.to_string(),
                    address: location.address.clone(),
                    reason,
                },
                other => other,
            })?;
        let artifact = cache.commit(name, version)?;
        self.fetch_sidecar(&location.address, &artifact);
        Ok(artifact)
    }

    /// Best-effort fetch of a `.toml` descriptor sidecar next to the
    /// artifact; backends without sidecars simply fail here, silently.
    fn fetch_sidecar(&self, address: &str, artifact: &std::path::Path) {
        let Some(stem) = address.strip_suffix(".jar") else {
            return;
        };
        let sidecar_address = format!("{stem}.toml");
        let sidecar = artifact.with_extension("toml");
        let _ = self.fetcher.fetch(&sidecar_address, &sidecar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::HttpFetcher;
    use crate::inspect::SidecarInspector;
    use kiln_project::{
        DeclaredUnit, Externals, Locator, Space, UnitDescriptor,
    };
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    fn write_artifact(dir: &Path, name: &str) -> String {
        let path = dir.join(format!("{name}.jar"));
        fs::write(&path, b"jar").unwrap();
        path.display().to_string()
    }

    fn write_sidecar(dir: &Path, name: &str, requires: &[&str]) {
        let list = requires
            .iter()
            .map(|r| format!("\"{r}\""))
            .collect::<Vec<_>>()
            .join(", ");
        fs::write(
            dir.join(format!("{name}.toml")),
            format!("name = \"{name}\"\nrequires = [{list}]\n"),
        )
        .unwrap();
    }

    fn resolver_parts() -> (HttpFetcher, SidecarInspector) {
        (
            HttpFetcher::new(Duration::from_secs(5)).unwrap(),
            SidecarInspector,
        )
    }

    #[test]
    fn nothing_missing_terminates_immediately() {
        let temp = tempfile::tempdir().unwrap();
        let layout = Layout::new(temp.path());
        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_space(
                Space::new("main")
                    .with_unit(DeclaredUnit::new("a", UnitDescriptor::named("a"))),
            );
        let (fetcher, inspector) = resolver_parts();
        let cache = Resolver::new(&fetcher, &inspector)
            .resolve(&project, &layout)
            .unwrap();
        assert!(cache.names().unwrap().is_empty());
    }

    #[test]
    fn platform_requirements_are_ignored() {
        let temp = tempfile::tempdir().unwrap();
        let layout = Layout::new(temp.path());
        let descriptor = UnitDescriptor::named("a")
            .with_requires("java.base")
            .with_requires("jdk.httpserver");
        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_space(Space::new("main").with_unit(DeclaredUnit::new("a", descriptor)));
        let (fetcher, inspector) = resolver_parts();
        let cache = Resolver::new(&fetcher, &inspector)
            .resolve(&project, &layout)
            .unwrap();
        assert!(cache.names().unwrap().is_empty());
    }

    #[test]
    fn transitive_requirements_resolve_in_two_passes() {
        let temp = tempfile::tempdir().unwrap();
        let remote = temp.path().join("remote");
        fs::create_dir_all(&remote).unwrap();
        let addr_x = write_artifact(&remote, "x");
        write_sidecar(&remote, "x", &["y"]);
        let addr_y = write_artifact(&remote, "y");
        write_sidecar(&remote, "y", &[]);

        let layout = Layout::new(temp.path().join("project"));
        let externals = Externals::new()
            .with_requires("x")
            .with_locator(Locator::direct([("x", addr_x)]))
            .with_locator(Locator::direct([("y", addr_y)]));
        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_externals(externals);

        let (fetcher, inspector) = resolver_parts();
        let cache = Resolver::new(&fetcher, &inspector)
            .resolve(&project, &layout)
            .unwrap();
        assert_eq!(cache.names().unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn unlocatable_name_reports_aggregated_error() {
        let temp = tempfile::tempdir().unwrap();
        let layout = Layout::new(temp.path());
        let externals = Externals::new().with_requires("ghost").with_requires("wraith");
        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_externals(externals);

        let (fetcher, inspector) = resolver_parts();
        let error = Resolver::new(&fetcher, &inspector)
            .resolve(&project, &layout)
            .unwrap_err();
        match error {
            ResolveError::UnresolvedComponents { names } => {
                assert_eq!(names, vec!["ghost", "wraith"]);
            }
            other => panic!("expected UnresolvedComponents, got {other:?}"),
        }
    }

    #[test]
    fn resolve_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let remote = temp.path().join("remote");
        fs::create_dir_all(&remote).unwrap();
        let addr_x = write_artifact(&remote, "x");

        let layout = Layout::new(temp.path().join("project"));
        let externals = Externals::new()
            .with_requires("x")
            .with_locator(Locator::direct([("x", addr_x.clone())]));
        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_externals(externals);

        let (fetcher, inspector) = resolver_parts();
        let resolver = Resolver::new(&fetcher, &inspector);
        let first = resolver.resolve(&project, &layout).unwrap();
        // Second run sees the cache hit and fetches nothing.
        fs::remove_file(remote.join("x.jar")).unwrap();
        let second = resolver.resolve(&project, &layout).unwrap();
        assert_eq!(first.names().unwrap(), second.names().unwrap());
    }

    #[test]
    fn fresh_runs_yield_the_same_cache_key_set() {
        let temp = tempfile::tempdir().unwrap();
        let remote = temp.path().join("remote");
        fs::create_dir_all(&remote).unwrap();

        // Enough names to keep the parallel fetches of one pass busy,
        // plus one transitive requirement discovered in a second pass.
        let mut externals = Externals::new();
        for name in ["a", "b", "c", "d", "e"] {
            let address = write_artifact(&remote, name);
            externals = externals
                .with_requires(name)
                .with_locator(Locator::direct([(name, address)]));
        }
        write_sidecar(&remote, "a", &["f"]);
        let addr_f = write_artifact(&remote, "f");
        externals = externals.with_locator(Locator::direct([("f", addr_f)]));
        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_externals(externals);

        let (fetcher, inspector) = resolver_parts();
        let resolver = Resolver::new(&fetcher, &inspector);
        let first = resolver
            .resolve(&project, &Layout::new(temp.path().join("one")))
            .unwrap();
        let second = resolver
            .resolve(&project, &Layout::new(temp.path().join("two")))
            .unwrap();
        assert_eq!(first.names().unwrap(), vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(first.names().unwrap(), second.names().unwrap());
    }

    #[test]
    fn self_requiring_artifact_terminates() {
        let temp = tempfile::tempdir().unwrap();
        let remote = temp.path().join("remote");
        fs::create_dir_all(&remote).unwrap();
        let addr_x = write_artifact(&remote, "x");
        write_sidecar(&remote, "x", &["x"]);

        let layout = Layout::new(temp.path().join("project"));
        let externals = Externals::new()
            .with_requires("x")
            .with_locator(Locator::direct([("x", addr_x)]));
        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_externals(externals);

        let (fetcher, inspector) = resolver_parts();
        let cache = Resolver::new(&fetcher, &inspector)
            .resolve(&project, &layout)
            .unwrap();
        assert_eq!(cache.names().unwrap(), vec!["x"]);
    }
}
