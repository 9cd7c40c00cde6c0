//! Descriptor inspection of fetched artifacts

use crate::{ResolveError, ResolveResult};
use kiln_project::UnitDescriptor;
use std::collections::BTreeSet;
use std::path::Path;

/// Reads the requirements a fetched artifact declares for itself.
///
/// How a descriptor is stored inside (or next to) an artifact is a
/// backend concern; the resolver only needs the `requires` names.
pub trait ArtifactInspector: Send + Sync {
    fn requires_of(&self, artifact: &Path) -> ResolveResult<BTreeSet<String>>;
}

/// Reads a `<artifact-stem>.toml` descriptor next to the artifact.
///
/// An absent sidecar means the artifact declares no further requirements.
#[derive(Debug, Default)]
pub struct SidecarInspector;

impl ArtifactInspector for SidecarInspector {
    fn requires_of(&self, artifact: &Path) -> ResolveResult<BTreeSet<String>> {
        let sidecar = artifact.with_extension("toml");
        if !sidecar.is_file() {
            return Ok(BTreeSet::new());
        }
        let content = std::fs::read_to_string(&sidecar)?;
        let descriptor: UnitDescriptor =
            toml::from_str(&content).map_err(|e| ResolveError::Inspect {
                path: sidecar.clone(),
                error: e.to_string(),
            })?;
        Ok(descriptor.requires)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn absent_sidecar_means_no_requirements() {
        let temp = tempfile::tempdir().unwrap();
        let artifact = temp.path().join("x.jar");
        fs::write(&artifact, b"jar").unwrap();
        assert!(SidecarInspector.requires_of(&artifact).unwrap().is_empty());
    }

    #[test]
    fn sidecar_requires_are_read() {
        let temp = tempfile::tempdir().unwrap();
        let artifact = temp.path().join("x.jar");
        fs::write(&artifact, b"jar").unwrap();
        fs::write(
            temp.path().join("x.toml"),
            r#"
            name = "x"
            requires = ["y", "z"]
            "#,
        )
        .unwrap();
        let requires = SidecarInspector.requires_of(&artifact).unwrap();
        assert_eq!(requires, BTreeSet::from(["y".to_string(), "z".to_string()]));
    }

    #[test]
    fn malformed_sidecar_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let artifact = temp.path().join("x.jar");
        fs::write(&artifact, b"jar").unwrap();
        fs::write(temp.path().join("x.toml"), "not toml [").unwrap();
        assert!(matches!(
            SidecarInspector.requires_of(&artifact),
            Err(ResolveError::Inspect { .. })
        ));
    }
}
