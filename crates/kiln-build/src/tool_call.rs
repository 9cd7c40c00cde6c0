//! A command composed of a tool name and its ordered arguments

use thiserror::Error;

/// Constructing a tool call from an empty command list.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("A tool call needs at least a tool name")]
pub struct InvalidCallError;

/// An immutable "name + ordered arguments" value.
///
/// Every composition method returns a new call and leaves the receiver
/// untouched, so partially composed calls can be shared and forked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    name: String,
    arguments: Vec<String>,
}

impl ToolCall {
    pub fn of(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Build a call from a full command line, name first
    pub fn from_command(command: &[String]) -> Result<Self, InvalidCallError> {
        let (name, arguments) = command.split_first().ok_or(InvalidCallError)?;
        Ok(Self {
            name: name.clone(),
            arguments: arguments.to_vec(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Append one argument
    pub fn with(&self, argument: impl ToString) -> Self {
        self.with_all([argument])
    }

    /// Append a key and its value
    pub fn with_pair(&self, key: impl ToString, value: impl ToString) -> Self {
        self.with_all([key.to_string(), value.to_string()])
    }

    /// Append any number of arguments
    pub fn with_all(&self, arguments: impl IntoIterator<Item = impl ToString>) -> Self {
        let mut next = self.clone();
        next.arguments
            .extend(arguments.into_iter().map(|a| a.to_string()));
        next
    }

    /// Render for diagnostics only; no quoting is attempted
    pub fn to_command_line(&self) -> String {
        let mut line = self.name.clone();
        for argument in &self.arguments {
            line.push(' ');
            line.push_str(argument);
        }
        line
    }
}
