use nestor_util::fs::{dir_name, normalize, resolve};
use std::path::{Path, PathBuf};

#[test]
fn test_normalize_removes_cur_dir() {
    assert_eq!(normalize(Path::new("a/./b/.")), PathBuf::from("a/b"));
}

#[test]
fn test_normalize_folds_parent_dir() {
    assert_eq!(normalize(Path::new("/work/app/../lib")), PathBuf::from("/work/lib"));
}

#[test]
fn test_normalize_keeps_leading_parent_of_relative_path() {
    assert_eq!(normalize(Path::new("../shared/x")), PathBuf::from("../shared/x"));
}

#[test]
fn test_normalize_does_not_climb_above_root() {
    assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
}

#[test]
fn test_normalize_empty_is_empty() {
    assert_eq!(normalize(Path::new("")), PathBuf::new());
}

#[test]
fn test_resolve_relative() {
    assert_eq!(
        resolve(Path::new("/work/buildSrc"), Path::new("libs/myLib.jar")),
        PathBuf::from("/work/buildSrc/libs/myLib.jar")
    );
}

#[test]
fn test_resolve_absolute_replaces_base() {
    assert_eq!(
        resolve(Path::new("/work"), Path::new("/opt/lib.jar")),
        PathBuf::from("/opt/lib.jar")
    );
}

#[test]
fn test_dir_name() {
    assert_eq!(dir_name(Path::new("/work/build-plugins/")).as_deref(), Some("build-plugins"));
    assert_eq!(dir_name(Path::new("/")), None);
}
