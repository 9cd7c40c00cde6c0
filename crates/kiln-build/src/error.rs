/// Build workflow error types
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Project(#[from] kiln_project::InvalidProjectError),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool '{tool}' not unique: {matches} matches")]
    ToolNotUnique { tool: String, matches: usize },

    /// A tool process exited non-zero. Not retried: build-tool failures
    /// are assumed deterministic given identical inputs.
    #[error("Tool '{tool}' failed with exit code {code}: {stderr}")]
    ToolInvocation {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("Failed to launch tool '{tool}': {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {error}")]
    Io {
        path: std::path::PathBuf,
        error: std::io::Error,
    },
}

impl BuildError {
    pub fn invocation(tool: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        Self::ToolInvocation {
            tool: tool.into(),
            code,
            stderr: stderr.into(),
        }
    }

    pub fn io(path: impl Into<std::path::PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }
}
