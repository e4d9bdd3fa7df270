use std::path::{Component, Path};

/// Normalize a TOC-style local path into a forward-slash relative path.
///
/// Backslashes become slashes, `#fragment` and `?query` suffixes are cut,
/// `.` components are dropped. Returns `None` for empty paths and for paths
/// that are absolute or climb above the root with `..`.
pub fn normalize_local_path(local: &str) -> Option<String> {
    let mut cleaned = local.trim().replace('\\', "/");
    if let Some(idx) = cleaned.find(|c| c == '#' || c == '?') {
        cleaned.truncate(idx);
    }

    let mut parts: Vec<String> = Vec::new();
    for component in Path::new(&cleaned).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().to_string()),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Number of directory levels a relative path sits below its root
pub fn directory_depth(rel_path: &str) -> usize {
    rel_path
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .count()
        .saturating_sub(1)
}

/// Check whether a path has an HTML extension
pub fn is_html_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ext == "htm" || ext == "html"
        })
        .unwrap_or(false)
}

/// Check whether any component of a relative path matches one of the glob patterns
pub fn matches_any_component(patterns: &[String], rel_path: &Path) -> bool {
    rel_path.components().any(|component| {
        let part = component.as_os_str().to_string_lossy();
        patterns.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(&part))
                .unwrap_or(false)
        })
    })
}

/// Get file name without extension
pub fn get_stem<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|s| s.to_string())
}
