//! Project model for the kiln build orchestrator
//!
//! A project is a set of named build spaces, each grouping declared units
//! that share a target platform release. This crate holds the immutable
//! data model, its structural validation, the output-directory layout
//! conventions, and the space scheduling used by the build workflow.

pub mod descriptor;
pub mod externals;
pub mod layout;
pub mod project;
pub mod schedule;
pub mod source_path;
pub mod space;
pub mod unit;
pub mod validate;

mod error;

pub use descriptor::UnitDescriptor;
pub use error::{InvalidProjectError, ProjectResult};
pub use externals::{Externals, Location, Locator, LocatorChain};
pub use layout::Layout;
pub use project::{Project, ProjectName, Spaces, Version};
pub use schedule::SpaceGraph;
pub use space::{DeclaredUnits, Space};
pub use unit::{DeclaredUnit, Folders};
pub use validate::validate;

/// Lowest platform release a space may target.
pub const LOWEST_RELEASE: u16 = 9;

/// Separator between entries of a tool path list (`:` or `;`).
pub const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };
