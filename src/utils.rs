//! Common utility functions shared across the codebase.

use std::path::{Component, Path};

/// Lexically normalize a path and render it with forward slashes.
///
/// `.` components are dropped and `..` removes the previous normal component.
/// The file system is not consulted.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vgettext::utils::normalize_path;
///
/// assert_eq!(normalize_path(Path::new("src/./components/../App.vue")), "src/App.vue");
/// assert_eq!(normalize_path(Path::new("../shared/a.html")), "../shared/a.html");
/// assert_eq!(normalize_path(Path::new("./")), ".");
/// ```
pub fn normalize_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut prefix = String::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => prefix = p.as_os_str().to_string_lossy().into_owned(),
            Component::RootDir => prefix.push('/'),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else if prefix.is_empty() {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }

    let joined = format!("{}{}", prefix, parts.join("/")).replace('\\', "/");
    if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Counts line breaks, treating `\r\n` as a single break.
///
/// # Examples
///
/// ```
/// use vgettext::utils::count_line_breaks;
///
/// assert_eq!(count_line_breaks("a\nb\r\nc\rd"), 3);
/// assert_eq!(count_line_breaks(""), 0);
/// ```
pub fn count_line_breaks(text: &str) -> usize {
    text.replace("\r\n", "\n")
        .chars()
        .filter(|&c| c == '\n' || c == '\r')
        .count()
}
