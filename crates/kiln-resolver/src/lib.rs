//! External component resolution for the kiln build orchestrator
//!
//! Computes the set of required-but-undeclared component names of a
//! project, fetches each through the project's locator chain into a
//! directory-backed cache, inspects fetched artifacts for further
//! requirements, and iterates to a fixed point.

pub mod cache;
pub mod fetch;
pub mod inspect;
pub mod resolver;

pub use cache::ResolutionCache;
pub use fetch::{Fetcher, HttpFetcher};
pub use inspect::{ArtifactInspector, SidecarInspector};
pub use resolver::{Resolver, ResolverConfig};

use std::path::PathBuf;
use thiserror::Error;

pub type ResolveResult<T> = Result<T, ResolveError>;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// One or more names could not be located after exhausting all
    /// locators and all iterations. Reported once, as a batch.
    #[error("Unresolved external components: {}", names.join(", "))]
    UnresolvedComponents { names: Vec<String> },

    #[error("Fetch of '{name}' from {address} failed: {reason}")]
    FetchFailed {
        name: String,
        address: String,
        reason: String,
    },

    #[error("Cache error at {path}: {error}")]
    Cache { path: PathBuf, error: String },

    #[error("Failed to inspect artifact {path}: {error}")]
    Inspect { path: PathBuf, error: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolveError {
    pub fn unresolved(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort_unstable();
        Self::UnresolvedComponents { names }
    }

    pub fn cache(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::Cache {
            path: path.into(),
            error: error.to_string(),
        }
    }
}

/// Whether a component name is mandated by the platform itself and thus
/// never resolved externally.
pub fn is_platform_component(name: &str) -> bool {
    name == "java" || name.starts_with("java.") || name.starts_with("jdk.")
}
