//! Info command: print the assembled project structure

use anyhow::Result;
use kiln_project::SpaceGraph;
use std::path::PathBuf;

pub struct InfoArgs {
    /// Path to the project manifest
    pub manifest: PathBuf,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let (project, _layout) = super::load_project(&args.manifest)?;
    println!("{}", project.to_name_and_version());

    let order = SpaceGraph::of(&project).compute_order()?;
    for name in order {
        let space = project.spaces.space(&name)?;
        match space.targets() {
            Some(release) => println!("space {name} (release {release})"),
            None => println!("space {name}"),
        }
        if !space.requires.is_empty() {
            println!("  requires {}", space.requires.join(", "));
        }
        for unit in &space.units {
            match space.launcher_for(unit.name()) {
                Some(entry) => println!("  unit {} (launches {entry})", unit.name()),
                None => println!("  unit {}", unit.name()),
            }
        }
    }

    let externals = &project.externals;
    if !externals.requires.is_empty() {
        println!("externals");
        for name in &externals.requires {
            match externals.locators.locate(name) {
                Some(location) => println!("  {name} <- {}", location.address),
                None => println!("  {name} (no locator)"),
            }
        }
    }
    Ok(())
}
