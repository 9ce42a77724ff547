use nestor_core::project::ProjectPath;
use std::path::{Path, PathBuf};

#[test]
fn parse_colon_notation() {
    assert_eq!(ProjectPath::parse(":app:core").as_str(), "app/core");
}

#[test]
fn parse_slash_notation() {
    assert_eq!(ProjectPath::parse("app/core/").as_str(), "app/core");
}

#[test]
fn parse_root_variants() {
    assert!(ProjectPath::parse("").is_root());
    assert!(ProjectPath::parse(":").is_root());
    assert_eq!(ProjectPath::parse(":"), ProjectPath::root());
}

#[test]
fn name_and_parent() {
    let path = ProjectPath::parse("app/core");
    assert_eq!(path.name(), Some("core"));
    assert_eq!(path.parent(), Some(ProjectPath::parse("app")));
    assert_eq!(ProjectPath::parse("app").parent(), Some(ProjectPath::root()));
    assert_eq!(ProjectPath::root().parent(), None);
    assert_eq!(ProjectPath::root().name(), None);
}

#[test]
fn ancestors_outermost_first() {
    let path = ProjectPath::parse("a/b/c");
    let ancestors: Vec<String> = path.ancestors().iter().map(|p| p.to_string()).collect();
    assert_eq!(ancestors, vec!["a", "a/b"]);
    assert!(ProjectPath::parse("a").ancestors().is_empty());
}

#[test]
fn dotted_form() {
    assert_eq!(ProjectPath::parse("app/core").dotted(), "app.core");
    assert_eq!(ProjectPath::root().dotted(), "");
}

#[test]
fn dir_under_build_root() {
    let root = Path::new("/work");
    assert_eq!(
        ProjectPath::parse("app/core").dir_under(root),
        PathBuf::from("/work/app/core")
    );
    assert_eq!(ProjectPath::root().dir_under(root), PathBuf::from("/work"));
}
