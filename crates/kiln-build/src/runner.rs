//! The narrow boundary between composed calls and the operating system

use crate::error::{BuildError, BuildResult};
use crate::tool::ToolFinder;
use crate::tool_call::ToolCall;
use std::process::Command;

/// The outcome of one tool invocation.
///
/// The workflow inspects only the exit code; stdout and stderr are
/// captured verbatim for diagnostics and never parsed.
#[derive(Debug, Clone)]
pub struct ToolRun {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolRun {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Executes an assembled tool call.
pub trait ToolRunner: Send + Sync {
    fn run(&self, call: &ToolCall) -> BuildResult<ToolRun>;
}

/// Runs tools as operating-system processes, located through a finder.
pub struct ProcessRunner {
    finder: ToolFinder,
}

impl ProcessRunner {
    pub fn new(finder: ToolFinder) -> Self {
        Self { finder }
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, call: &ToolCall) -> BuildResult<ToolRun> {
        let tool = self.finder.find_unique(call.name())?;
        let (program, leading) = tool
            .command()
            .split_first()
            .ok_or_else(|| BuildError::ToolNotFound(call.name().to_string()))?;
        let output = Command::new(program)
            .args(leading)
            .args(call.arguments())
            .output()
            .map_err(|source| BuildError::ToolLaunch {
                tool: call.name().to_string(),
                source,
            })?;
        Ok(ToolRun {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run a call and convert a non-zero exit into a build error.
pub fn run_checked(runner: &dyn ToolRunner, call: &ToolCall) -> BuildResult<ToolRun> {
    let run = runner.run(call)?;
    if !run.is_success() {
        return Err(BuildError::invocation(call.name(), run.code, run.stderr));
    }
    Ok(run)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every call instead of executing anything.
    #[derive(Default)]
    pub struct RecordingRunner {
        pub calls: Mutex<Vec<ToolCall>>,
        /// Tool names that should report a non-zero exit
        pub failing: Vec<String>,
    }

    impl RecordingRunner {
        pub fn failing(tools: impl IntoIterator<Item = impl Into<String>>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: tools.into_iter().map(Into::into).collect(),
            }
        }

        pub fn recorded(&self) -> Vec<ToolCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn recorded_named(&self, name: &str) -> Vec<ToolCall> {
            self.recorded()
                .into_iter()
                .filter(|call| call.name() == name)
                .collect()
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, call: &ToolCall) -> BuildResult<ToolRun> {
            self.calls.lock().unwrap().push(call.clone());
            let code = if self.failing.iter().any(|f| f == call.name()) {
                1
            } else {
                0
            };
            Ok(ToolRun {
                code,
                stdout: String::new(),
                stderr: if code == 0 {
                    String::new()
                } else {
                    "boom".to_string()
                },
            })
        }
    }
}
