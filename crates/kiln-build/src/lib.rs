//! Build workflow for the kiln build orchestrator
//!
//! Reads an immutable project plus the externals cache and drives the
//! external toolchain (compiler, archiver, launcher) through composed
//! tool calls: one compiler call per space, one archiver call per unit,
//! nested release-scoped compiler calls for targeted overlays, and launch
//! calls per declared entry point.

pub mod compile;
pub mod package;
pub mod runner;
pub mod tool;
pub mod tool_call;
pub mod tweak;
pub mod workflow;

mod error;

pub use error::{BuildError, BuildResult};
pub use package::UnitPackage;
pub use runner::{ProcessRunner, ToolRun, ToolRunner};
pub use tool::{Tool, ToolFinder};
pub use tool_call::{InvalidCallError, ToolCall};
pub use tweak::Tweaks;
pub use workflow::{BuildConfig, BuildReport, Workflow};
