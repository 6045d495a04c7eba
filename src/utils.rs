//! Common utility functions shared across the codebase.

use std::path::{Component, Path};

/// Normalize a path without touching the filesystem: resolves `.` and `..`
/// segments and produces `/`-joined output. Used both for project file ids
/// and for resolving relative import specifiers, so the two always agree.
///
/// # Examples
///
/// ```
/// use atomaudit::utils::normalize_path;
/// use std::path::Path;
///
/// assert_eq!(normalize_path(Path::new("./src/./state.ts")), "src/state.ts");
/// assert_eq!(normalize_path(Path::new("src/a/../b.ts")), "src/b.ts");
/// assert_eq!(normalize_path(Path::new("/abs/./x.ts")), "/abs/x.ts");
/// ```
pub fn normalize_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut absolute = false;
    for component in path.components() {
        match component {
            Component::RootDir => absolute = true,
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() && !absolute {
                    // Leading `..` segments outside the project root are
                    // kept so the path still points somewhere meaningful.
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().into_owned()),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// `"s"` when a count is not one; keeps report strings tidy.
pub fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("./a/b.ts")), "a/b.ts");
        assert_eq!(normalize_path(Path::new("a/./b/../c.ts")), "a/c.ts");
        assert_eq!(normalize_path(Path::new("/x/y/../z.ts")), "/x/z.ts");
        assert_eq!(normalize_path(Path::new("../up.ts")), "../up.ts");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "");
        assert_eq!(plural(0), "s");
        assert_eq!(plural(2), "s");
    }
}
