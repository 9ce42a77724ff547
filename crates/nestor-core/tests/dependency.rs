use nestor_core::dependency::{DependencyDecl, DependencyKind, DependencyScope, MavenCoordinate};

#[test]
fn maven_coordinate_parse_valid() {
    let coord = MavenCoordinate::parse("junit:junit:4.12").unwrap();
    assert_eq!(coord.group_id, "junit");
    assert_eq!(coord.artifact_id, "junit");
    assert_eq!(coord.version, "4.12");
    assert_eq!(coord.key(), "junit:junit");
}

#[test]
fn maven_coordinate_parse_two_parts_returns_none() {
    assert!(MavenCoordinate::parse("group:artifact").is_none());
}

#[test]
fn maven_coordinate_parse_empty_segment_returns_none() {
    assert!(MavenCoordinate::parse("group::1.0").is_none());
    assert!(MavenCoordinate::parse("").is_none());
}

#[test]
fn maven_coordinate_display_roundtrip() {
    let s = "com.example:my-lib:1.0.0";
    assert_eq!(MavenCoordinate::parse(s).unwrap().to_string(), s);
}

#[test]
fn dependency_scope_default_is_compile() {
    assert_eq!(DependencyScope::default(), DependencyScope::Compile);
}

#[test]
fn scope_to_declaring_source_set() {
    assert_eq!(DependencyScope::Compile.declaring_source_set(), "main");
    assert_eq!(DependencyScope::Runtime.declaring_source_set(), "main");
    assert_eq!(DependencyScope::Provided.declaring_source_set(), "main");
    assert_eq!(DependencyScope::Test.declaring_source_set(), "test");
    assert_eq!(DependencyScope::Test.target_source_set(), "main");
}

#[test]
fn project_decl_in_other_build() {
    let decl = DependencyDecl::project(":core", DependencyScope::Compile).in_build("plugins");
    assert_eq!(decl.kind, DependencyKind::Project);
    assert_eq!(decl.project_path().as_str(), "core");
    assert_eq!(decl.build.as_deref(), Some("plugins"));
    assert_eq!(decl.to_string(), "compile project(':core' in build 'plugins')");
}

#[test]
fn decl_deserializes_with_default_scope() {
    let decl: DependencyDecl =
        serde_json::from_str(r#"{"kind": "coordinates", "target": "junit:junit:4.12"}"#).unwrap();
    assert_eq!(decl.kind, DependencyKind::Coordinates);
    assert_eq!(decl.scope, DependencyScope::Compile);
    assert!(decl.build.is_none());
}
