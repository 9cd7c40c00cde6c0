//! Build orchestration across spaces
//!
//! Drives compile, package, and launch phases per space in dependency
//! order. Spaces with no path between them build concurrently; a failed
//! space aborts its own remaining phases and marks every transitive
//! dependent skipped, while unrelated spaces still run to completion.

use crate::compile::compile_classes;
use crate::error::{BuildError, BuildResult};
use crate::package::{package_unit, UnitPackage};
use crate::runner::{run_checked, ToolRunner};
use crate::tool_call::ToolCall;
use crate::tweak::Tweaks;
use kiln_project::{validate, Layout, Project, Space, SpaceGraph};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;

/// Build configuration
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Feature release of the host toolchain; the effective release of
    /// every space with release 0
    pub feature: u16,
    /// Stamp archives with the project version timestamp
    pub date_stamp: bool,
    /// Build independent spaces and unit archives concurrently
    pub parallel: bool,
    /// Print one line per phase
    pub verbose: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            feature: 21,
            date_stamp: true,
            parallel: true,
            verbose: false,
        }
    }
}

/// Per-space outcome of one build run
#[derive(Debug)]
pub struct BuildReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, BuildError)>,
    pub skipped: Vec<String>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// One-pass summary of the whole run
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for name in &self.succeeded {
            lines.push(format!("ok      {name}"));
        }
        for (name, error) in &self.failed {
            lines.push(format!("failed  {name}: {error}"));
        }
        for name in &self.skipped {
            lines.push(format!("skipped {name}"));
        }
        lines.join("\n")
    }
}

/// Orchestrates one build run over an immutable project.
pub struct Workflow<'a> {
    project: &'a Project,
    layout: Layout,
    runner: &'a dyn ToolRunner,
    tweaks: Tweaks,
    config: BuildConfig,
}

impl<'a> Workflow<'a> {
    pub fn new(project: &'a Project, layout: Layout, runner: &'a dyn ToolRunner) -> Self {
        Self {
            project,
            layout,
            runner,
            tweaks: Tweaks::new(),
            config: BuildConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_tweaks(mut self, tweaks: Tweaks) -> Self {
        self.tweaks = tweaks;
        self
    }

    /// The compiler call for a space, tweaked and ready to run
    pub fn compile_call(&self, space: &Space) -> ToolCall {
        let javac = compile_classes(self.project, space, &self.layout, self.config.feature);
        self.adjusted(space, javac)
    }

    /// The package calls for every unit of a space
    pub fn package_calls(&self, space: &Space) -> Vec<UnitPackage> {
        space
            .units
            .iter()
            .map(|unit| {
                let package = package_unit(self.project, space, unit, &self.layout, &self.config);
                UnitPackage {
                    unit: package.unit,
                    compile_calls: package
                        .compile_calls
                        .into_iter()
                        .map(|call| self.adjusted(space, call))
                        .collect(),
                    archive_call: self.adjusted(space, package.archive_call),
                }
            })
            .collect()
    }

    /// The launch calls for a space's entry points, using the runtime path
    pub fn launch_calls(&self, space: &Space) -> Vec<ToolCall> {
        let runtime = space.to_runtime_space();
        let module_path = runtime.module_path(&self.layout);
        space
            .launchers
            .iter()
            .map(|launcher| {
                let mut java = ToolCall::of("java");
                if let Some(path) = &module_path {
                    java = java.with_pair("--module-path", path);
                }
                java = java.with_pair("--module", launcher);
                self.adjusted(space, java)
            })
            .collect()
    }

    /// Build every space of the project, in dependency order.
    pub fn build(&self) -> BuildResult<BuildReport> {
        validate(self.project, self.config.feature)?;
        let graph = SpaceGraph::of(self.project);
        let groups = graph.parallel_groups()?;

        let mut report = BuildReport {
            succeeded: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        };
        let mut broken: HashSet<String> = HashSet::new();

        for group in groups {
            let (runnable, skipped): (Vec<_>, Vec<_>) = group
                .into_iter()
                .partition(|name| !broken.contains(name));
            for name in skipped {
                report.skipped.push(name);
            }

            let results: Vec<(String, BuildResult<()>)> = if self.config.parallel {
                runnable
                    .into_par_iter()
                    .map(|name| {
                        let result = self.build_space_named(&name);
                        (name, result)
                    })
                    .collect()
            } else {
                runnable
                    .into_iter()
                    .map(|name| {
                        let result = self.build_space_named(&name);
                        (name, result)
                    })
                    .collect()
            };

            for (name, result) in results {
                match result {
                    Ok(()) => report.succeeded.push(name),
                    Err(error) => {
                        for dependent in graph.dependents_of(&name) {
                            broken.insert(dependent);
                        }
                        report.failed.push((name, error));
                    }
                }
            }
        }
        Ok(report)
    }

    fn build_space_named(&self, name: &str) -> BuildResult<()> {
        let space = self.project.spaces.space(name)?;
        self.build_space(space)
    }

    /// Compile, package, and launch phases for one space.
    pub fn build_space(&self, space: &Space) -> BuildResult<()> {
        if space.units.is_empty() {
            return Ok(());
        }
        if self.config.verbose {
            println!("Building space '{}' ({} units)", space.name, space.units.len());
        }

        let classes = self
            .layout
            .classes(&space.name, space.effective_release(self.config.feature));
        fs::create_dir_all(&classes).map_err(|e| BuildError::io(&classes, e))?;
        run_checked(self.runner, &self.compile_call(space))?;

        let modules = self.layout.modules(&space.name);
        fs::create_dir_all(&modules).map_err(|e| BuildError::io(&modules, e))?;
        let packages = self.package_calls(space);
        if self.config.parallel {
            packages
                .par_iter()
                .map(|package| self.run_package(package))
                .collect::<BuildResult<Vec<()>>>()?;
        } else {
            for package in &packages {
                self.run_package(package)?;
            }
        }

        for launch in self.launch_calls(space) {
            run_checked(self.runner, &launch)?;
        }
        Ok(())
    }

    /// Nested release-scoped compiles must finish before their archive.
    fn run_package(&self, package: &UnitPackage) -> BuildResult<()> {
        for compile in &package.compile_calls {
            run_checked(self.runner, compile)?;
        }
        run_checked(self.runner, &package.archive_call)?;
        Ok(())
    }

    /// Apply function tweaks then space-level argument tweaks.
    fn adjusted(&self, space: &Space, call: ToolCall) -> ToolCall {
        let tool = call.name().to_string();
        let call = self.tweaks.apply(&tool, call);
        match space.tweaks.get(&tool) {
            Some(arguments) => call.with_all(arguments),
            None => call,
        }
    }
}
