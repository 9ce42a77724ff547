#![allow(dead_code)]

use nestor_core::build::Settings;
use nestor_core::dependency::{DependencyDecl, DependencyScope};
use nestor_core::model::{BuildDescription, ConventionPlugin, ProjectDescription, ProjectModel};

pub const ROOT: &str = "/work/project";

pub fn script() -> ProjectDescription {
    ProjectDescription::default().with_build_script("build.gradle")
}

/// Root project applying `java` and a plugin class compiled by `buildSrc`.
pub fn plain_build_src(version: &str) -> ProjectModel {
    ProjectModel::new(version, ROOT)
        .with_build(
            "",
            BuildDescription::named("project").with_project(
                "",
                script().with_plugin("java").with_plugin("my.pack.TestPlugin"),
            ),
        )
        .with_build(
            "buildSrc",
            BuildDescription::default().with_project(
                "",
                ProjectDescription::default().with_source("src/main/java/my/pack/TestPlugin.java"),
            ),
        )
}

/// Same as [`plain_build_src`], with the root settings including `buildSrc` as a project.
pub fn build_src_as_subproject(version: &str) -> ProjectModel {
    let mut model = plain_build_src(version);
    if let Some(root) = model.builds.get_mut("") {
        root.settings = Some(Settings::default().with_include("buildSrc"));
    }
    model
}

/// `buildSrc` with a test-scoped coordinate dependency.
pub fn build_src_with_junit(version: &str) -> ProjectModel {
    ProjectModel::new(version, ROOT)
        .with_build("", BuildDescription::named("project").with_project("", script()))
        .with_build(
            "buildSrc",
            BuildDescription::default().with_project(
                "",
                script().with_dependency(DependencyDecl::coordinates(
                    "junit:junit:4.12",
                    DependencyScope::Test,
                )),
            ),
        )
}

/// `buildSrc` applying a convention plugin published by the included `build-plugins` build.
pub fn included_convention_plugin(version: &str) -> ProjectModel {
    ProjectModel::new(version, ROOT)
        .with_build(
            "",
            BuildDescription::named("project")
                .with_settings(Settings::default().with_include_build("build-plugins"))
                .with_project("", script()),
        )
        .with_build(
            "buildSrc",
            BuildDescription::default()
                .with_settings(Settings::default())
                .with_project("", script().with_plugin("myproject.my-test-plugin")),
        )
        .with_build(
            "build-plugins",
            BuildDescription::default()
                .with_settings(Settings::default())
                .with_project("", script().with_plugin("groovy-gradle-plugin"))
                .with_plugin(
                    "myproject.my-test-plugin",
                    ConventionPlugin::applying(&["java"]).with_dependency(DependencyDecl::file(
                        "libs/myLib.jar",
                        DependencyScope::Compile,
                    )),
                ),
        )
}

/// A multi-project root with two included builds that depend on each other.
pub fn composite(version: &str) -> ProjectModel {
    ProjectModel::new(version, ROOT)
        .with_build(
            "",
            BuildDescription::named("project")
                .with_settings(
                    Settings::default()
                        .with_include("app")
                        .with_include("libs:util")
                        .with_include_build("../shared")
                        .with_include_build("tools"),
                )
                .with_project("", script())
                .with_project(
                    "app",
                    script()
                        .with_plugin("application")
                        .with_dependency(DependencyDecl::project(":libs:util", DependencyScope::Compile))
                        .with_dependency(DependencyDecl::coordinates(
                            "org.shared:model:1.0",
                            DependencyScope::Compile,
                        ))
                        .with_dependency(DependencyDecl::coordinates(
                            "com.google.guava:guava:31.1-jre",
                            DependencyScope::Runtime,
                        ))
                        .with_dependency(DependencyDecl::coordinates(
                            "junit:junit:4.12",
                            DependencyScope::Test,
                        )),
                )
                .with_project(
                    "libs:util",
                    script()
                        .with_plugin("java-library")
                        .with_dependency(DependencyDecl::coordinates(
                            "com.google.guava:guava:31.1-jre",
                            DependencyScope::Compile,
                        ))
                        .with_dependency(DependencyDecl::coordinates(
                            "junit:junit:4.12",
                            DependencyScope::Test,
                        )),
                ),
        )
        .with_build(
            "../shared",
            BuildDescription::default()
                .with_settings(Settings::default().with_include("model"))
                .with_project("", script())
                .with_project("model", script().with_plugin("java-library").with_group("org.shared")),
        )
        .with_build(
            "tools",
            BuildDescription::named("tooling")
                .with_settings(Settings::default())
                .with_project(
                    "",
                    script()
                        .with_plugin("java")
                        .with_dependency(DependencyDecl::project(":model", DependencyScope::Compile).in_build("shared")),
                ),
        )
}
