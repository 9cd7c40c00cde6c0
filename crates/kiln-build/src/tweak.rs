//! Identifier-keyed adjustments of assembled tool calls

use crate::tool_call::ToolCall;
use std::collections::HashMap;

type TweakFn = Box<dyn Fn(ToolCall) -> ToolCall + Send + Sync>;

/// A registry of pure `ToolCall -> ToolCall` functions, keyed by
/// identifier and applied by exact-match lookup after the default
/// arguments are assembled but before execution.
///
/// This is the sole supported extension point for altering tool arguments
/// without modifying the workflow logic itself.
#[derive(Default)]
pub struct Tweaks {
    map: HashMap<String, TweakFn>,
}

impl Tweaks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        identifier: impl Into<String>,
        tweak: impl Fn(ToolCall) -> ToolCall + Send + Sync + 'static,
    ) -> Self {
        self.map.insert(identifier.into(), Box::new(tweak));
        self
    }

    /// Apply the tweak registered for `identifier`, if any
    pub fn apply(&self, identifier: &str, call: ToolCall) -> ToolCall {
        match self.map.get(identifier) {
            Some(tweak) => tweak(call),
            None => call,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for Tweaks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut identifiers: Vec<&str> = self.map.keys().map(String::as_str).collect();
        identifiers.sort_unstable();
        f.debug_struct("Tweaks").field("identifiers", &identifiers).finish()
    }
}
