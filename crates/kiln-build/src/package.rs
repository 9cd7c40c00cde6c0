//! Archiver call composition: one archive per unit
//!
//! Release-targeted overlays need their own compiler pass, so packaging a
//! unit may yield nested release-scoped compiler calls alongside the
//! archiver call. Nested calls must run before the archive is written;
//! packages of different units are independent of each other.

use crate::tool_call::ToolCall;
use crate::workflow::BuildConfig;
use chrono::SecondsFormat;
use kiln_project::{DeclaredUnit, Layout, Project, Space};
use std::path::Path;
use walkdir::WalkDir;

/// The calls that produce one unit's archive.
#[derive(Debug, Clone)]
pub struct UnitPackage {
    pub unit: String,
    /// Release-scoped compiler calls, to run before the archiver
    pub compile_calls: Vec<ToolCall>,
    pub archive_call: ToolCall,
}

/// Compose the archiver call (and any nested release-scoped compiler
/// calls) for one unit of a space.
pub fn package_unit(
    project: &Project,
    space: &Space,
    unit: &DeclaredUnit,
    layout: &Layout,
    config: &BuildConfig,
) -> UnitPackage {
    let release = space.effective_release(config.feature);
    let classes = layout.unit_classes(&space.name, release, unit.name());

    let mut jar = ToolCall::of("jar").with("--create");
    jar = jar.with_pair("--file", layout.jar(&space.name, unit.name()).display());
    jar = jar.with_pair("--module-version", &project.version.value);
    if config.date_stamp {
        let date = project
            .version
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        jar = jar.with_pair("--date", date);
    }
    let entry_point = space
        .launcher_for(unit.name())
        .or(unit.descriptor.main_entry_point.as_deref());
    if let Some(entry_point) = entry_point {
        jar = jar.with_pair("--main-class", entry_point);
    }

    jar = jar.with_all(["-C", &classes.display().to_string(), "."]);
    for resources in &unit.base.resources {
        jar = jar.with_all(["-C", &resources.display().to_string(), "."]);
    }
    jar = with_patched_classes(jar, project, space, unit, layout, config.feature);

    let mut compile_calls = Vec::new();
    jar = with_targeted_entries(jar, space, unit, layout, &classes, &mut compile_calls);

    UnitPackage {
        unit: unit.name().to_string(),
        compile_calls,
        archive_call: jar,
    }
}

/// Merge in the compiled classes of same-named units from required spaces,
/// the packaging counterpart of the compiler's patch arguments.
fn with_patched_classes(
    mut jar: ToolCall,
    project: &Project,
    space: &Space,
    unit: &DeclaredUnit,
    layout: &Layout,
    feature: u16,
) -> ToolCall {
    for requires in &space.requires {
        let Ok(required) = project.spaces.space(requires) else {
            continue;
        };
        if required.units.find(unit.name()).is_none() {
            continue;
        }
        let classes = layout.unit_classes(requires, required.effective_release(feature), unit.name());
        jar = jar.with_all(["-C", &classes.display().to_string(), "."]);
    }
    jar
}

/// Append the release-targeted overlay entries in ascending release order.
///
/// An overlay with sources queues exactly one release-scoped compiler
/// call covering all of its source folders, so classes of one overlay may
/// reference each other across folders; an overlay with resources but no
/// sources still emits the release marker so the archive records the
/// version boundary.
fn with_targeted_entries(
    mut jar: ToolCall,
    space: &Space,
    unit: &DeclaredUnit,
    layout: &Layout,
    base_classes: &Path,
    compile_calls: &mut Vec<ToolCall>,
) -> ToolCall {
    for (&release, folders) in &unit.targeted {
        let targeted_classes = layout.unit_classes(&space.name, release, unit.name());
        if !folders.sources.is_empty() {
            let mut javac = ToolCall::of("javac").with_pair("--release", release);
            if let Some(module_path) = space.module_path(layout) {
                javac = javac.with_pair("--module-path", &module_path);
                javac = javac.with_pair("--processor-module-path", &module_path);
            }
            javac = javac
                .with_pair("--class-path", base_classes.display())
                .with("-implicit:none")
                .with_pair("-d", targeted_classes.display());
            for sources in &folders.sources {
                javac = javac.with_all(find_source_files(sources));
            }
            compile_calls.push(javac);
            jar = jar
                .with_pair("--release", release)
                .with_all(["-C", &targeted_classes.display().to_string(), "."]);
        } else if !folders.resources.is_empty() {
            jar = jar.with_pair("--release", release);
        }
        for resources in &folders.resources {
            jar = jar.with_all(["-C", &resources.display().to_string(), "."]);
        }
    }
    jar
}

/// Enumerate the compiler input files under a source folder, sorted for
/// deterministic call assembly.
fn find_source_files(folder: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(folder)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|e| e == "java"))
        .map(|entry| entry.path().display().to_string())
        .collect();
    files.sort_unstable();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::BuildConfig;
    use kiln_project::{Folders, UnitDescriptor};
    use std::fs;

    fn config() -> BuildConfig {
        BuildConfig {
            date_stamp: false,
            ..BuildConfig::default()
        }
    }

    fn demo(space: Space) -> Project {
        kiln_project::Project::new("demo", "1.2.3")
            .unwrap()
            .with_space(space)
    }

    fn unit(name: &str) -> DeclaredUnit {
        DeclaredUnit::new(name, UnitDescriptor::named(name))
            .with_base(Folders::of_sources([format!("src/{name}/java")]))
    }

    #[test]
    fn archive_writes_to_modules_directory() {
        let project = demo(Space::new("main").with_unit(unit("a")));
        let layout = Layout::new(".");
        let space = project.spaces.space("main").unwrap();
        let package = package_unit(&project, space, &space.units.list()[0], &layout, &config());

        assert_eq!(package.archive_call.name(), "jar");
        let arguments = package.archive_call.arguments();
        assert_eq!(arguments[0], "--create");
        assert_eq!(arguments[1], "--file");
        assert_eq!(arguments[2], layout.jar("main", "a").display().to_string());
        assert!(arguments.contains(&"--module-version".to_string()));
        assert!(arguments.contains(&"1.2.3".to_string()));
        assert!(package.compile_calls.is_empty());
    }

    #[test]
    fn date_stamp_is_optional() {
        let project = demo(Space::new("main").with_unit(unit("a")));
        let layout = Layout::new(".");
        let space = project.spaces.space("main").unwrap();

        let without = package_unit(&project, space, &space.units.list()[0], &layout, &config());
        assert!(!without.archive_call.arguments().iter().any(|a| a == "--date"));

        let with_date = BuildConfig::default();
        let with = package_unit(&project, space, &space.units.list()[0], &layout, &with_date);
        assert!(with.archive_call.arguments().iter().any(|a| a == "--date"));
    }

    #[test]
    fn launcher_sets_main_class_only_for_its_unit() {
        let space = Space::new("main")
            .with_unit(unit("a"))
            .with_unit(unit("b"))
            .with_launcher("a/com.example.Main");
        let project = demo(space);
        let layout = Layout::new(".");
        let space = project.spaces.space("main").unwrap();

        let a = package_unit(&project, space, space.units.find("a").unwrap(), &layout, &config());
        assert!(a.archive_call.arguments().contains(&"--main-class".to_string()));
        assert!(a.archive_call.arguments().contains(&"com.example.Main".to_string()));

        let b = package_unit(&project, space, space.units.find("b").unwrap(), &layout, &config());
        assert!(!b.archive_call.arguments().contains(&"--main-class".to_string()));
    }

    #[test]
    fn patched_unit_merges_required_space_classes() {
        let project = kiln_project::Project::new("demo", "1.2.3")
            .unwrap()
            .with_space(Space::new("main").with_unit(unit("a")))
            .with_space(Space::new("test").with_requires("main").with_unit(unit("a")));
        let layout = Layout::new(".");
        let space = project.spaces.space("test").unwrap();

        let package = package_unit(&project, space, space.units.find("a").unwrap(), &layout, &config());
        let main_classes = layout
            .unit_classes("main", BuildConfig::default().feature, "a")
            .display()
            .to_string();
        assert!(package.archive_call.arguments().contains(&main_classes));
    }

    #[test]
    fn targeted_overlay_queues_release_scoped_compile() {
        let temp = tempfile::tempdir().unwrap();
        let sources = temp.path().join("a").join("java-17");
        fs::create_dir_all(&sources).unwrap();
        fs::write(sources.join("B.java"), "class B {}").unwrap();
        fs::write(sources.join("A.java"), "class A {}").unwrap();

        let targeted = unit("a").with_targeted(17, Folders::of_sources([sources.clone()]));
        let project = demo(Space::new("main").with_unit(targeted));
        let layout = Layout::new(temp.path());
        let space = project.spaces.space("main").unwrap();

        let package = package_unit(&project, space, &space.units.list()[0], &layout, &config());
        assert_eq!(package.compile_calls.len(), 1);
        let javac = &package.compile_calls[0];
        assert_eq!(javac.arguments()[0], "--release");
        assert_eq!(javac.arguments()[1], "17");
        assert!(javac.arguments().contains(&"-implicit:none".to_string()));
        // Source files appear sorted.
        let a_position = javac.arguments().iter().position(|x| x.ends_with("A.java"));
        let b_position = javac.arguments().iter().position(|x| x.ends_with("B.java"));
        assert!(a_position.unwrap() < b_position.unwrap());
        // The archive records the release boundary before its classes.
        let arguments = package.archive_call.arguments();
        let release = arguments.iter().position(|a| a == "--release").unwrap();
        assert_eq!(arguments[release + 1], "17");
    }

    #[test]
    fn descriptor_entry_point_is_the_fallback_main_class() {
        let described = DeclaredUnit::new(
            "src/a/java",
            UnitDescriptor::named("a").with_main_entry_point("com.example.Described"),
        );
        let project = demo(Space::new("main").with_unit(described));
        let layout = Layout::new(".");
        let space = project.spaces.space("main").unwrap();

        let package = package_unit(&project, space, &space.units.list()[0], &layout, &config());
        let arguments = package.archive_call.arguments();
        let main_class = arguments.iter().position(|a| a == "--main-class").unwrap();
        assert_eq!(arguments[main_class + 1], "com.example.Described");
    }

    #[test]
    fn launcher_overrides_descriptor_entry_point() {
        let described = DeclaredUnit::new(
            "src/a/java",
            UnitDescriptor::named("a").with_main_entry_point("com.example.Described"),
        );
        let project = demo(
            Space::new("main")
                .with_unit(described)
                .with_launcher("a/com.example.Launcher"),
        );
        let layout = Layout::new(".");
        let space = project.spaces.space("main").unwrap();

        let package = package_unit(&project, space, &space.units.list()[0], &layout, &config());
        let arguments = package.archive_call.arguments();
        let main_class = arguments.iter().position(|a| a == "--main-class").unwrap();
        assert_eq!(arguments[main_class + 1], "com.example.Launcher");
        assert!(!arguments.contains(&"com.example.Described".to_string()));
    }

    #[test]
    fn multi_folder_overlay_compiles_once_per_release() {
        let temp = tempfile::tempdir().unwrap();
        let primary = temp.path().join("a").join("java-17");
        let secondary = temp.path().join("a").join("java-17b");
        fs::create_dir_all(&primary).unwrap();
        fs::create_dir_all(&secondary).unwrap();
        fs::write(primary.join("A.java"), "class A {}").unwrap();
        fs::write(secondary.join("B.java"), "class B extends A {}").unwrap();

        let overlay = Folders::of_sources([primary, secondary]);
        let targeted = unit("a").with_targeted(17, overlay);
        let project = demo(Space::new("main").with_unit(targeted));
        let layout = Layout::new(temp.path());
        let space = project.spaces.space("main").unwrap();

        let package = package_unit(&project, space, &space.units.list()[0], &layout, &config());
        // One compiler call sees both folders' files, so they may
        // reference each other.
        assert_eq!(package.compile_calls.len(), 1);
        let javac = &package.compile_calls[0];
        assert!(javac.arguments().iter().any(|a| a.ends_with("A.java")));
        assert!(javac.arguments().iter().any(|a| a.ends_with("B.java")));

        let arguments = package.archive_call.arguments();
        let releases = arguments.iter().filter(|a| *a == "--release").count();
        assert_eq!(releases, 1);
        let classes = layout.unit_classes("main", 17, "a").display().to_string();
        let entries = arguments.iter().filter(|a| **a == classes).count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn resources_only_overlay_still_emits_release_marker() {
        let overlay = Folders::default().with_resources("a/resources-11");
        let targeted = unit("a").with_targeted(11, overlay);
        let project = demo(Space::new("main").with_unit(targeted));
        let layout = Layout::new(".");
        let space = project.spaces.space("main").unwrap();

        let package = package_unit(&project, space, &space.units.list()[0], &layout, &config());
        assert!(package.compile_calls.is_empty());
        let arguments = package.archive_call.arguments();
        let release = arguments.iter().position(|a| a == "--release").unwrap();
        assert_eq!(arguments[release + 1], "11");
        assert!(arguments.contains(&"a/resources-11".to_string()));
    }
}
