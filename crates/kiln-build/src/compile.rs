//! Compiler call composition: one batched call per space

use crate::tool_call::ToolCall;
use kiln_project::{Layout, Project, Space, PATH_LIST_SEPARATOR};

/// Compose the single compiler call for a space.
///
/// Argument order is fixed: target-release flag, the unit names, one
/// source-path entry per unit group, the module path, one patch entry per
/// unit also declared by a required space, then the destination
/// directory. Callers depend on this order for diagnostics.
pub fn compile_classes(project: &Project, space: &Space, layout: &Layout, feature: u16) -> ToolCall {
    let mut javac = ToolCall::of("javac");
    if let Some(release) = space.targets() {
        javac = javac.with_pair("--release", release);
    }
    javac = javac.with_pair("--module", space.units.names_joined(","));
    for source_path in space.units.to_module_source_paths() {
        javac = javac.with_pair("--module-source-path", source_path);
    }
    if let Some(module_path) = space.module_path(layout) {
        javac = javac.with_pair("--module-path", &module_path);
        javac = javac.with_pair("--processor-module-path", &module_path);
    }
    javac = with_patched_units(javac, project, space, layout, feature);
    javac.with_pair(
        "-d",
        layout.classes(&space.name, space.effective_release(feature)).display(),
    )
}

/// A unit declared here *and* in a required space augments that space's
/// unit rather than shadowing it: its compiler call patches the required
/// space's compiled classes in.
fn with_patched_units(
    mut javac: ToolCall,
    project: &Project,
    space: &Space,
    layout: &Layout,
    feature: u16,
) -> ToolCall {
    for unit in &space.units {
        let mut patches = Vec::new();
        for requires in &space.requires {
            let Ok(required) = project.spaces.space(requires) else {
                continue;
            };
            if required.units.find(unit.name()).is_none() {
                continue;
            }
            let classes =
                layout.unit_classes(requires, required.effective_release(feature), unit.name());
            patches.push(classes.display().to_string());
        }
        if patches.is_empty() {
            continue;
        }
        let joined = patches.join(&PATH_LIST_SEPARATOR.to_string());
        javac = javac.with_pair("--patch-module", format!("{}={joined}", unit.name()));
    }
    javac
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_project::{DeclaredUnit, Folders, UnitDescriptor};
    use pretty_assertions::assert_eq;
    use std::fs;

    const FEATURE: u16 = 21;

    fn unit(name: &str) -> DeclaredUnit {
        DeclaredUnit::new(name, UnitDescriptor::named(name))
            .with_base(Folders::of_sources([format!("src/{name}/java")]))
    }

    fn argument_after<'a>(call: &'a ToolCall, key: &str) -> Option<&'a str> {
        let arguments = call.arguments();
        arguments
            .iter()
            .position(|a| a == key)
            .and_then(|i| arguments.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn single_space_call_names_units_and_destination() {
        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_space(Space::new("main").with_unit(unit("a")).with_unit(unit("b")));
        let layout = Layout::new(".");
        let space = project.spaces.space("main").unwrap();

        let javac = compile_classes(&project, space, &layout, FEATURE);
        assert_eq!(javac.name(), "javac");
        assert_eq!(argument_after(&javac, "--module"), Some("a,b"));
        assert_eq!(
            argument_after(&javac, "-d"),
            Some(layout.classes("main", FEATURE).display().to_string().as_str())
        );
        // Release 0 means no --release flag.
        assert!(!javac.arguments().iter().any(|a| a == "--release"));
    }

    #[test]
    fn targeted_release_leads_the_arguments() {
        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_space(Space::new("main").with_release(17).with_unit(unit("a")));
        let layout = Layout::new(".");
        let space = project.spaces.space("main").unwrap();

        let javac = compile_classes(&project, space, &layout, FEATURE);
        assert_eq!(javac.arguments()[0], "--release");
        assert_eq!(javac.arguments()[1], "17");
        assert_eq!(
            argument_after(&javac, "-d"),
            Some(layout.classes("main", 17).display().to_string().as_str())
        );
    }

    #[test]
    fn test_space_patches_same_named_unit_of_main() {
        let temp = tempfile::tempdir().unwrap();
        let layout = Layout::new(temp.path());
        fs::create_dir_all(layout.modules("main")).unwrap();

        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_space(Space::new("main").with_unit(unit("a")))
            .with_space(
                Space::new("test")
                    .with_requires("main")
                    .with_unit(unit("a"))
                    .with_unit(unit("b")),
            );
        let space = project.spaces.space("test").unwrap();

        let javac = compile_classes(&project, space, &layout, FEATURE);
        let expected = format!(
            "a={}",
            layout.unit_classes("main", FEATURE, "a").display()
        );
        assert_eq!(argument_after(&javac, "--patch-module"), Some(expected.as_str()));
        // Unit b exists only in test: no patch entry for it.
        let patches: Vec<&String> = javac
            .arguments()
            .iter()
            .filter(|a| a.starts_with("b="))
            .collect();
        assert!(patches.is_empty());
        // Module path points at main's module output directory.
        let module_path = argument_after(&javac, "--module-path").unwrap();
        assert!(module_path.contains(&layout.modules("main").display().to_string()));
    }

    #[test]
    fn no_patch_when_required_space_lacks_the_unit() {
        let project = kiln_project::Project::new("demo", "1")
            .unwrap()
            .with_space(Space::new("main").with_unit(unit("other")))
            .with_space(Space::new("test").with_requires("main").with_unit(unit("a")));
        let layout = Layout::new(".");
        let space = project.spaces.space("test").unwrap();

        let javac = compile_classes(&project, space, &layout, FEATURE);
        assert!(!javac.arguments().iter().any(|a| a == "--patch-module"));
    }
}
