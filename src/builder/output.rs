use std::path::Path;

use log::{info, warn};

use crate::layout::PageRenderer;
use crate::search::SearchIndex;
use crate::toc::TocTree;
use crate::utils::error::BoxResult;
use crate::utils::fs::write_file_atomic;

pub const ASSETS_DIR: &str = "assets";

/// `assets/tree-data.js`, defining `treeData` for the navigation tree
pub fn write_tree_data(toc: &TocTree, destination: &Path) -> BoxResult<()> {
    let json = toc.to_tree_data()?;
    let script = format!("const treeData = {};\n", json.replace("</", "<\\/"));
    write_file_atomic(destination.join(ASSETS_DIR).join("tree-data.js"), script.as_bytes())
}

/// `assets/search-index.js`, defining `searchIndex`
pub fn write_search_index(index: &SearchIndex, destination: &Path) -> BoxResult<()> {
    let script = index.to_script()?;
    write_file_atomic(destination.join(ASSETS_DIR).join("search-index.js"), script.as_bytes())?;
    if index.is_empty() {
        warn!("No searchable text was found");
    } else {
        info!("Search index holds {} pages", index.len());
    }
    Ok(())
}

/// The entry page plus the shared site stylesheet and script
pub fn write_site_shell(
    renderer: &PageRenderer,
    destination: &Path,
    title: &str,
    has_paired_theme: bool,
) -> BoxResult<()> {
    let index = renderer.render_index_page(title, has_paired_theme)?;
    write_file_atomic(destination.join("index.html"), index.as_bytes())?;

    let assets = destination.join(ASSETS_DIR);
    write_file_atomic(assets.join("style.css"), renderer.style_css().as_bytes())?;
    write_file_atomic(assets.join("app.js"), renderer.app_js().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::TocNode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tree_data_script() {
        let out = TempDir::new().unwrap();
        let toc = TocTree::from_entries(vec![TocNode::file("Intro", "intro.htm")]);

        write_tree_data(&toc, out.path()).unwrap();
        let script = fs::read_to_string(out.path().join("assets/tree-data.js")).unwrap();

        assert!(script.starts_with("const treeData = ["));
        assert!(script.contains(r#""path":"content/intro.htm""#));
        assert!(script.contains(r#""type":"File""#));
        assert!(script.trim_end().ends_with("];"));
    }

    #[test]
    fn test_tree_data_script_escapes_closing_tags() {
        let out = TempDir::new().unwrap();
        let toc = TocTree::from_entries(vec![TocNode::file("</script>", "a.htm")]);

        write_tree_data(&toc, out.path()).unwrap();
        let script = fs::read_to_string(out.path().join("assets/tree-data.js")).unwrap();

        assert!(!script.contains("</script>"));
        assert!(script.contains(r#""title":"<\/script>""#));
    }

    #[test]
    fn test_site_shell() {
        let out = TempDir::new().unwrap();
        let renderer = PageRenderer::new().unwrap();

        write_site_shell(&renderer, out.path(), "Manual", false).unwrap();

        let index = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(index.contains("<title>Manual</title>"));
        assert!(index.contains("assets/tree-data.js"));
        assert!(out.path().join("assets/style.css").exists());
        assert!(out.path().join("assets/app.js").exists());
    }
}
