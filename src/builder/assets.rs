use std::collections::HashSet;
use std::path::Path;

use fs_extra::dir::CopyOptions;
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::layout::ThemeSet;
use crate::source::SourceTree;
use crate::utils::error::BoxResult;
use crate::utils::fs;

/// Copy the theme stylesheets found at the source root into the content root
pub fn copy_theme_stylesheets(source: &SourceTree, config: &Config, content_dir: &Path) -> BoxResult<ThemeSet> {
    let themes = ThemeSet::from_available(&config.theme, |name| source.root().join(name).is_file());

    for name in themes.available_stylesheets() {
        fs::copy_file(source.root().join(name), content_dir.join(name))?;
    }

    if !themes.available_stylesheets().is_empty() {
        info!("Copied {} theme stylesheets", themes.available_stylesheets().len());
        if themes.has_paired_theme() {
            info!("Light and dark stylesheets found, theme switching enabled");
        } else {
            info!("No complete light/dark pair found, theme switching disabled");
        }
    }

    Ok(themes)
}

/// Copy every other stylesheet, keeping its path relative to the source root
pub fn copy_other_stylesheets(source: &SourceTree, config: &Config, content_dir: &Path) -> BoxResult<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source.root()).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || !has_extension(path, "css") {
            continue;
        }
        let rel = match path.strip_prefix(source.root()) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        if source.is_excluded(rel) {
            continue;
        }
        let is_theme = rel
            .file_name()
            .map(|name| ThemeSet::is_candidate(&config.theme, &name.to_string_lossy()))
            .unwrap_or(false);
        if is_theme {
            continue;
        }

        let dest = content_dir.join(rel);
        if !dest.exists() {
            fs::copy_file(path, &dest)?;
            copied += 1;
        }
    }

    if copied > 0 {
        info!("Copied {} other stylesheets", copied);
    }
    Ok(copied)
}

/// Copy resource folders at the source root whole; returns their names
pub fn copy_resource_folders(source: &SourceTree, config: &Config, content_dir: &Path) -> BoxResult<Vec<String>> {
    let mut options = CopyOptions::new();
    options.overwrite = true;

    let mut entries: Vec<_> = std::fs::read_dir(source.root())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut copied = Vec::new();
    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_string();
        if !config.is_resource_folder(&name) || source.is_excluded(Path::new(&name)) {
            continue;
        }

        match fs_extra::dir::copy(entry.path(), content_dir, &options) {
            Ok(_) => {
                debug!("Copied resource folder {}", name);
                copied.push(name);
            }
            Err(e) => warn!("Failed to copy resource folder {}: {}", name, e),
        }
    }

    if !copied.is_empty() {
        info!("Copied resource folders: {}", copied.join(", "));
    }
    Ok(copied)
}

/// Copy image files outside the resource folders, keeping relative paths
pub fn copy_loose_images(
    source: &SourceTree,
    config: &Config,
    content_dir: &Path,
    copied_folders: &[String],
) -> usize {
    let skip: HashSet<&str> = copied_folders.iter().map(String::as_str).collect();
    let mut copied = 0;

    for entry in WalkDir::new(source.root()).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let is_image = path
            .extension()
            .map(|ext| config.is_image_extension(&ext.to_string_lossy()))
            .unwrap_or(false);
        if !is_image {
            continue;
        }
        let rel = match path.strip_prefix(source.root()) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let in_copied_folder = rel
            .components()
            .next()
            .map(|first| skip.contains(&*first.as_os_str().to_string_lossy()))
            .unwrap_or(false);
        if in_copied_folder || source.is_excluded(rel) {
            continue;
        }

        let dest = content_dir.join(rel);
        if dest.exists() {
            continue;
        }
        match fs::copy_file(path, &dest) {
            Ok(_) => copied += 1,
            Err(e) => warn!("Failed to copy image {}: {}", rel.display(), e),
        }
    }

    if copied > 0 {
        info!("Copied {} loose image files", copied);
    }
    copied
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, TempDir, SourceTree) {
        let src = TempDir::new().unwrap();
        let root = src.path();
        for dir in ["images", "Images~", "css", "c1/pics", "#SYSTEM", "chapter"] {
            stdfs::create_dir_all(root.join(dir)).unwrap();
        }
        stdfs::write(root.join("lesson_light.css"), "light").unwrap();
        stdfs::write(root.join("lesson_dark.css"), "dark").unwrap();
        stdfs::write(root.join("css/site.css"), "site").unwrap();
        stdfs::write(root.join("images/logo.png"), "png").unwrap();
        stdfs::write(root.join("Images~/old.gif"), "gif").unwrap();
        stdfs::write(root.join("c1/pics/shot.JPG"), "jpg").unwrap();
        stdfs::write(root.join("c1/page.htm"), "<p>x</p>").unwrap();
        stdfs::write(root.join("#SYSTEM/icon.png"), "png").unwrap();
        stdfs::write(root.join("chapter/chart.svg"), "svg").unwrap();

        let tree = SourceTree::from_dir(root, &Config::default().exclude);
        let out = TempDir::new().unwrap();
        (src, out, tree)
    }

    #[test]
    fn test_theme_detection_copies_pair() {
        let (_src, out, tree) = fixture();
        let themes = copy_theme_stylesheets(&tree, &Config::default(), out.path()).unwrap();

        assert!(themes.has_paired_theme());
        assert!(out.path().join("lesson_light.css").exists());
        assert!(out.path().join("lesson_dark.css").exists());
    }

    #[test]
    fn test_other_stylesheets_skip_themes() {
        let (_src, out, tree) = fixture();
        let copied = copy_other_stylesheets(&tree, &Config::default(), out.path()).unwrap();

        assert_eq!(copied, 1);
        assert!(out.path().join("css/site.css").exists());
        assert!(!out.path().join("lesson_light.css").exists());
    }

    #[test]
    fn test_resource_folders_and_loose_images() {
        let (_src, out, tree) = fixture();
        let config = Config::default();

        let folders = copy_resource_folders(&tree, &config, out.path()).unwrap();
        assert_eq!(folders, vec!["Images~", "images"]);
        assert!(out.path().join("images/logo.png").exists());
        assert!(out.path().join("Images~/old.gif").exists());

        let loose = copy_loose_images(&tree, &config, out.path(), &folders);
        assert_eq!(loose, 2);
        assert!(out.path().join("c1/pics/shot.JPG").exists());
        assert!(out.path().join("chapter/chart.svg").exists());
        assert!(!out.path().join("#SYSTEM").exists());
    }
}
