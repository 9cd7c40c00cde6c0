/// Structural project error types
use thiserror::Error;

pub type ProjectResult<T> = Result<T, InvalidProjectError>;

/// A structural invariant of the project model was violated.
///
/// All variants are detected before any tool is invoked.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidProjectError {
    #[error("Project name must not be blank")]
    BlankProjectName,

    #[error("Version value must not be blank")]
    BlankVersion,

    #[error("Space name must not be blank")]
    BlankSpaceName,

    #[error("Duplicate space name: {0}")]
    DuplicateSpace(String),

    #[error("No such space: {0}")]
    NoSuchSpace(String),

    #[error("Duplicate unit '{unit}' in space '{space}'")]
    DuplicateUnit { space: String, unit: String },

    #[error("Space '{space}' requires itself")]
    SelfRequires { space: String },

    #[error("Space '{space}' requires unknown space '{requires}'")]
    UnknownRequires { space: String, requires: String },

    #[error("Cyclic space requires: {0}")]
    CyclicRequires(String),

    #[error("Release {release} of space '{space}' not in range of {low}..={high}")]
    ReleaseOutOfRange {
        space: String,
        release: u16,
        low: u16,
        high: u16,
    },

    #[error("Targeted folders of unit '{unit}' keyed by release 0")]
    ZeroTargetedRelease { unit: String },

    #[error("Unit '{unit}' in space '{space}' has no source or resource folders")]
    EmptyUnit { space: String, unit: String },

    #[error("Launcher '{launcher}' of space '{space}' is not of the form unit/entry-point")]
    MalformedLauncher { space: String, launcher: String },

    #[error("Launcher '{launcher}' of space '{space}' names undeclared unit '{unit}'")]
    LauncherUnitUndeclared {
        space: String,
        launcher: String,
        unit: String,
    },

    #[error("Failed to read descriptor at {path}: {error}")]
    DescriptorRead { path: String, error: String },

    #[error("Failed to parse descriptor at {path}: {error}")]
    DescriptorParse { path: String, error: String },
}

impl InvalidProjectError {
    pub fn duplicate_unit(space: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::DuplicateUnit {
            space: space.into(),
            unit: unit.into(),
        }
    }

    pub fn unknown_requires(space: impl Into<String>, requires: impl Into<String>) -> Self {
        Self::UnknownRequires {
            space: space.into(),
            requires: requires.into(),
        }
    }

    pub fn empty_unit(space: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::EmptyUnit {
            space: space.into(),
            unit: unit.into(),
        }
    }
}
