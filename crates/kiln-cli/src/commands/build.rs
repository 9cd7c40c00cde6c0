//! Build command: run the whole workflow, or print the composed calls

use anyhow::{bail, Result};
use kiln_build::{BuildConfig, ProcessRunner, ToolFinder, Workflow};
use std::path::PathBuf;

pub struct BuildArgs {
    /// Path to the project manifest
    pub manifest: PathBuf,
    /// Feature release of the host toolchain
    pub feature: u16,
    /// Build one space at a time
    pub sequential: bool,
    /// Skip the archive date stamp
    pub no_date: bool,
    /// Print composed tool calls instead of running them
    pub dry_run: bool,
    /// Verbose output
    pub verbose: bool,
}

pub fn run(args: BuildArgs) -> Result<()> {
    let (project, layout) = super::load_project(&args.manifest)?;
    let config = BuildConfig {
        feature: args.feature,
        date_stamp: !args.no_date,
        parallel: !args.sequential,
        verbose: args.verbose,
    };
    let runner = ProcessRunner::new(ToolFinder::host_tools());
    let workflow = Workflow::new(&project, layout, &runner).with_config(config);

    if args.dry_run {
        print_calls(&project, &workflow);
        return Ok(());
    }

    if args.verbose {
        println!("Building {}", project.to_name_and_version());
    }
    let report = workflow.build()?;
    let rendered = report.render();
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    if !report.is_success() {
        bail!("Build failed");
    }
    Ok(())
}

fn print_calls(project: &kiln_project::Project, workflow: &Workflow) {
    for space in &project.spaces {
        println!("{}", workflow.compile_call(space).to_command_line());
        for package in workflow.package_calls(space) {
            for compile in &package.compile_calls {
                println!("{}", compile.to_command_line());
            }
            println!("{}", package.archive_call.to_command_line());
        }
        for launch in workflow.launch_calls(space) {
            println!("{}", launch.to_command_line());
        }
    }
}
