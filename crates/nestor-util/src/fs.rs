use std::path::{Component, Path, PathBuf};

/// Normalise a path without touching the filesystem.
///
/// Removes `.` components and folds `..` into the preceding normal component.
/// A `..` that would climb above the start of a relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Join `relative` onto `base` and normalise the result.
///
/// An absolute `relative` replaces `base`, as with [`Path::join`].
pub fn resolve(base: &Path, relative: &Path) -> PathBuf {
    normalize(&base.join(relative))
}

/// The last path component as a string, or `None` for paths like `/` or `..`.
pub fn dir_name(path: &Path) -> Option<String> {
    normalize(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}
