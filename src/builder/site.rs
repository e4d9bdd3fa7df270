use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::Config;
use crate::content::{parse_document, select_first, ContentTransformer, DocumentOutcome};
use crate::encoding::EncodingResolver;
use crate::layout::PageRenderer;
use crate::search::SearchIndex;
use crate::source::SourceTree;
use crate::toc::{served_path, TocNode, TocTree, CONTENT_DIR};
use crate::utils::error::{BoxResult, ChmError};
use crate::utils::fs::{copy_file_atomic, create_directory, write_file_atomic};
use crate::utils::path::{get_stem, is_html_file, normalize_local_path};

use super::assets;
use super::output::{self, ASSETS_DIR};

/// Summary of one conversion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub title: String,
    pub folders: usize,
    pub files: usize,
    /// Distinct HTML documents found on disk
    pub documents: usize,
    pub transformed: usize,
    /// Documents copied through unchanged
    pub fallbacks: usize,
    /// TOC references with no file behind them
    pub skipped: usize,
    pub search_entries: usize,
}

/// One distinct document to convert
struct Job<'a> {
    rel_path: String,
    title: &'a str,
    source: PathBuf,
}

struct JobResult {
    rel_path: String,
    transformed: bool,
    text: Option<String>,
}

/// Read the table of contents, or index the documents when there is none
pub fn load_toc(source: &SourceTree, resolver: &EncodingResolver) -> BoxResult<TocTree> {
    match source.find_toc_file() {
        Some(path) => {
            info!("Parsing table of contents {}", path.display());
            let toc = TocTree::from_file(&path, resolver)?;
            if toc.is_empty() {
                warn!("{} has no entries, listing documents instead", path.display());
                return Ok(toc_from_files(source, resolver));
            }
            Ok(toc)
        }
        None => {
            warn!("No .hhc table of contents found, listing documents instead");
            Ok(toc_from_files(source, resolver))
        }
    }
}

/// A flat tree with one entry per HTML document, titled from its own heading
pub fn toc_from_files(source: &SourceTree, resolver: &EncodingResolver) -> TocTree {
    let entries = source
        .html_files()
        .into_iter()
        .map(|rel_path| {
            let heading = source
                .read(&rel_path)
                .ok()
                .and_then(|bytes| resolver.decode(&bytes).ok())
                .and_then(|decoded| document_heading(&decoded.text));
            let title = heading
                .or_else(|| get_stem(&rel_path))
                .unwrap_or_else(|| rel_path.clone());
            TocNode::file(title, rel_path)
        })
        .collect();
    TocTree::from_entries(entries)
}

/// First non-empty `.fileheader`, `h1` or `title` text of a document
pub fn document_heading(text: &str) -> Option<String> {
    let document = parse_document(text);
    [".fileheader", "h1", "title"].iter().find_map(|selector| {
        select_first(&document, selector)
            .map(|node| node.text_contents().trim().to_string())
            .filter(|heading| !heading.is_empty())
    })
}

/// Convert the configured help tree into a static site
pub fn build_site(config: &Config) -> BoxResult<BuildReport> {
    let start_time = Instant::now();

    let resolver = EncodingResolver::from_labels(config.encodings.as_slice())?;
    debug!(
        "Encoding candidates: {}",
        resolver.candidates().iter().map(|e| e.name()).collect::<Vec<_>>().join(", ")
    );
    let source = SourceTree::open(config)?;
    let toc = load_toc(&source, &resolver)?;

    let title = config.title.clone().unwrap_or_else(|| toc.title());
    let counts = toc.count_items();
    info!("Site title: {}", title);
    info!("Table of contents: {} folders, {} files", counts.folders, counts.files);

    let destination = &config.destination;
    let content_dir = destination.join(CONTENT_DIR);
    for dir in [destination.clone(), content_dir.clone(), destination.join(ASSETS_DIR)] {
        create_directory(&dir).map_err(|e| {
            ChmError::Generic(format!("Cannot create output directory {}: {}", dir.display(), e))
        })?;
    }
    info!("Output will be generated in: {}", destination.display());

    let themes = assets::copy_theme_stylesheets(&source, config, &content_dir)?;
    assets::copy_other_stylesheets(&source, config, &content_dir)?;
    let folders = assets::copy_resource_folders(&source, config, &content_dir)?;
    assets::copy_loose_images(&source, config, &content_dir, &folders);

    let transformer = ContentTransformer::new(config.chrome.clone(), themes, PageRenderer::new()?)?;

    let mut report = BuildReport {
        title: title.clone(),
        folders: counts.folders,
        files: counts.files,
        ..BuildReport::default()
    };

    let references = toc_references(&toc);
    let jobs = collect_jobs(&source, &references, &content_dir, &mut report);
    report.documents = jobs.len();
    info!("Converting {} documents...", jobs.len());

    let run = |job: &Job| convert_document(job, &transformer, &resolver, &content_dir);
    let results: Vec<JobResult> = if config.parallel {
        jobs.par_iter().map(run).collect()
    } else {
        jobs.iter().map(run).collect()
    };

    report.transformed = results.iter().filter(|r| r.transformed).count();
    report.fallbacks = results.len() - report.transformed;

    // Search entries follow TOC order, one per reference
    let texts: HashMap<&str, &str> = results
        .iter()
        .filter_map(|r| r.text.as_deref().map(|text| (r.rel_path.as_str(), text)))
        .collect();
    let mut index = SearchIndex::new(config.search_content_max_length);
    for (title, local, rel_path) in &references {
        if let Some(text) = texts.get(rel_path.as_str()) {
            index.add(title, &served_path(local), text);
        }
    }
    report.search_entries = index.len();

    output::write_tree_data(&toc, destination)?;
    output::write_search_index(&index, destination)?;
    output::write_site_shell(
        transformer.renderer(),
        destination,
        &title,
        transformer.themes().has_paired_theme(),
    )?;

    info!(
        "Converted {} documents ({} copied unchanged, {} missing) in {:.2?}",
        report.transformed,
        report.fallbacks,
        report.skipped,
        start_time.elapsed()
    );
    Ok(report)
}

/// `(title, local, normalized path)` for every TOC entry with a usable path
fn toc_references(toc: &TocTree) -> Vec<(&str, &str, String)> {
    toc.files()
        .into_iter()
        .filter_map(|node| {
            let rel_path = normalize_local_path(&node.local)?;
            Some((node.name.as_str(), node.local.as_str(), rel_path))
        })
        .collect()
}

/// Distinct HTML documents to convert; other referenced files are copied as they are
fn collect_jobs<'a>(
    source: &SourceTree,
    references: &[(&'a str, &str, String)],
    content_dir: &Path,
    report: &mut BuildReport,
) -> Vec<Job<'a>> {
    let mut seen = HashSet::new();
    let mut job_index: HashMap<&str, usize> = HashMap::new();
    let mut jobs: Vec<Job<'a>> = Vec::new();

    for (title, local, rel_path) in references {
        if !seen.insert(rel_path.as_str()) {
            // Converted once; the last reference names the page
            if let Some(&i) = job_index.get(rel_path.as_str()) {
                jobs[i].title = *title;
            }
            continue;
        }
        let path = match source.resolve(local) {
            Some(path) => path,
            None => {
                debug!("Skipping missing document {}", local);
                report.skipped += 1;
                continue;
            }
        };

        if is_html_file(&path) {
            job_index.insert(rel_path.as_str(), jobs.len());
            jobs.push(Job {
                rel_path: rel_path.clone(),
                title: *title,
                source: path,
            });
        } else if let Err(e) = copy_file_atomic(&path, content_dir.join(rel_path)) {
            warn!("Failed to copy {}: {}", rel_path, e);
        }
    }

    jobs
}

fn convert_document(
    job: &Job,
    transformer: &ContentTransformer,
    resolver: &EncodingResolver,
    content_dir: &Path,
) -> JobResult {
    let dest = content_dir.join(&job.rel_path);
    let failed = |text| JobResult {
        rel_path: job.rel_path.clone(),
        transformed: false,
        text,
    };

    let bytes = match std::fs::read(&job.source) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read {}: {}", job.rel_path, e);
            return failed(None);
        }
    };

    let processed = transformer.process(&bytes, resolver, job.title, &job.rel_path);
    match processed.outcome {
        DocumentOutcome::Transformed(html) => {
            if let Err(e) = write_file_atomic(&dest, html.as_bytes()) {
                warn!("Failed to write {}: {}", dest.display(), e);
                return failed(processed.text);
            }
            debug!("Converted {}", job.rel_path);
            JobResult {
                rel_path: job.rel_path.clone(),
                transformed: true,
                text: processed.text,
            }
        }
        DocumentOutcome::Fallback(reason) => {
            warn!("Copying {} unchanged, {}", job.rel_path, reason);
            if let Err(e) = write_file_atomic(&dest, &bytes) {
                warn!("Failed to copy {}: {}", job.rel_path, e);
            }
            failed(processed.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HHC: &str = r#"<HTML><BODY>
<UL>
  <LI><OBJECT type="text/sitemap"><param name="Name" value="Chapter 1"></OBJECT>
  <UL>
    <LI><OBJECT type="text/sitemap"><param name="Name" value="Intro"><param name="Local" value="c1\intro.htm"></OBJECT>
    <LI><OBJECT type="text/sitemap"><param name="Name" value="Details"><param name="Local" value="c1/details.htm"></OBJECT>
  </UL>
  <LI><OBJECT type="text/sitemap"><param name="Name" value="Appendix"><param name="Local" value="appendix.htm"></OBJECT>
</UL>
</BODY></HTML>"#;

    fn write_source(root: &Path) {
        fs::create_dir_all(root.join("c1")).unwrap();
        fs::write(root.join("toc.hhc"), HHC).unwrap();
        fs::write(
            root.join("c1/intro.htm"),
            r#"<html><head><style>p{}</style></head><body><div class="lme_nav_panel_cls">nav</div><p>Welcome text</p><div class="foot">f</div></body></html>"#,
        )
        .unwrap();
        fs::write(root.join("c1/details.htm"), "<p>Detail text</p>").unwrap();
        fs::write(root.join("appendix.htm"), "<p>Appendix text</p>").unwrap();
    }

    fn config_for(source: &Path, destination: &Path, parallel: bool) -> Config {
        Config {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            parallel,
            ..Config::default()
        }
    }

    fn read_search_index(destination: &Path) -> serde_json::Value {
        let script = fs::read_to_string(destination.join("assets/search-index.js")).unwrap();
        let json = script
            .trim()
            .trim_start_matches("const searchIndex = ")
            .trim_end_matches(';');
        serde_json::from_str(json).unwrap()
    }

    fn read_tree_data(destination: &Path) -> serde_json::Value {
        let script = fs::read_to_string(destination.join("assets/tree-data.js")).unwrap();
        let json = script
            .trim()
            .trim_start_matches("const treeData = ")
            .trim_end_matches(';');
        serde_json::from_str(json).unwrap()
    }

    fn count_types(entries: &serde_json::Value) -> (usize, usize) {
        let (mut folders, mut files) = (0, 0);
        let mut pending = vec![entries];
        while let Some(list) = pending.pop() {
            for entry in list.as_array().unwrap() {
                match entry["type"].as_str().unwrap() {
                    "Folder" => folders += 1,
                    "File" => files += 1,
                    other => panic!("unexpected type {}", other),
                }
                pending.push(&entry["children"]);
            }
        }
        (folders, files)
    }

    #[test]
    fn test_end_to_end_conversion() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_source(src.path());

        let report = build_site(&config_for(src.path(), out.path(), true)).unwrap();

        assert_eq!(report.title, "Chapter 1");
        assert_eq!((report.folders, report.files), (1, 3));
        assert_eq!(report.transformed, 3);
        assert_eq!(report.search_entries, 3);

        let tree_data = read_tree_data(out.path());
        assert_eq!(count_types(&tree_data), (1, 3));
        assert_eq!(tree_data[0]["title"], "Chapter 1");
        assert_eq!(tree_data[0]["children"][1]["path"], "content/c1/details.htm");

        let index = read_search_index(out.path());
        let paths: Vec<&str> = index
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["path"].as_str().unwrap())
            .collect();
        assert_eq!(
            paths,
            vec!["content/c1/intro.htm", "content/c1/details.htm", "content/appendix.htm"]
        );

        let intro = fs::read_to_string(out.path().join("content/c1/intro.htm")).unwrap();
        assert!(intro.contains("Welcome text"));
        assert!(!intro.contains("lme_nav_panel_cls"));
        assert!(out.path().join("index.html").exists());
        assert!(out.path().join("assets/tree-data.js").exists());
        assert!(out.path().join("assets/app.js").exists());
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let src = TempDir::new().unwrap();
        write_source(src.path());
        let out_a = TempDir::new().unwrap();
        let out_b = TempDir::new().unwrap();

        let parallel = build_site(&config_for(src.path(), out_a.path(), true)).unwrap();
        let sequential = build_site(&config_for(src.path(), out_b.path(), false)).unwrap();

        assert_eq!(parallel, sequential);
        assert_eq!(read_search_index(out_a.path()), read_search_index(out_b.path()));
    }

    #[test]
    fn test_missing_and_undecodable_documents() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_source(src.path());
        fs::remove_file(src.path().join("c1/details.htm")).unwrap();
        fs::write(src.path().join("appendix.htm"), [0xC3, 0x28, 0xFF]).unwrap();

        let mut config = config_for(src.path(), out.path(), true);
        config.encodings = vec!["utf-8".to_string()];
        let report = build_site(&config).unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.transformed, 1);
        assert_eq!(report.fallbacks, 1);
        assert_eq!(report.search_entries, 1);
        assert_eq!(
            fs::read(out.path().join("content/appendix.htm")).unwrap(),
            b"\xC3\x28\xFF".to_vec()
        );
    }

    #[test]
    fn test_duplicate_references_convert_once_with_last_title() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(
            src.path().join("toc.hhc"),
            r#"<UL>
<LI><OBJECT><param name="Name" value="First"><param name="Local" value="page.htm"></OBJECT>
<LI><OBJECT><param name="Name" value="Again"><param name="Local" value="page.htm#part"></OBJECT>
</UL>"#,
        )
        .unwrap();
        fs::write(src.path().join("page.htm"), "<p>Shared</p>").unwrap();

        let report = build_site(&config_for(src.path(), out.path(), true)).unwrap();
        assert_eq!(report.documents, 1);
        assert_eq!(report.search_entries, 2);

        let index = read_search_index(out.path());
        assert_eq!(index[1]["path"], "content/page.htm#part");
        let page = fs::read_to_string(out.path().join("content/page.htm")).unwrap();
        assert!(page.contains("<title>Again</title>"));
        assert!(!page.contains("<title>First</title>"));
    }

    #[test]
    fn test_fallback_toc_from_files() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("sub")).unwrap();
        fs::write(src.path().join("a.htm"), "<h1 class=\"fileheader\">Header A</h1><h1>Other</h1>").unwrap();
        fs::write(src.path().join("b.htm"), "<html><head><title>Title B</title></head><body></body></html>").unwrap();
        fs::write(src.path().join("sub/c.html"), "<p>no heading</p>").unwrap();

        let tree = SourceTree::from_dir(src.path(), &[]);
        let toc = load_toc(&tree, &EncodingResolver::default()).unwrap();
        let names: Vec<&str> = toc.root().children.iter().map(|n| n.name.as_str()).collect();
        let locals: Vec<&str> = toc.files().iter().map(|n| n.local.as_str()).collect();

        assert_eq!(names, vec!["Header A", "Title B", "c"]);
        assert_eq!(locals, vec!["a.htm", "b.htm", "sub/c.html"]);
    }

    #[test]
    fn test_empty_toc_falls_back_to_files() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("help.hhc"), "<HTML><BODY><UL></UL></BODY></HTML>").unwrap();
        fs::write(src.path().join("only.htm"), "<h1>Only page</h1>").unwrap();

        let tree = SourceTree::from_dir(src.path(), &Config::default().exclude);
        let toc = load_toc(&tree, &EncodingResolver::default()).unwrap();
        assert_eq!(toc.title(), "Only page");
        assert_eq!(toc.count_items().files, 1);
    }

    #[test]
    fn test_document_heading_priority() {
        assert_eq!(document_heading("<h1>Main</h1>"), Some("Main".to_string()));
        assert_eq!(document_heading("<title> </title><h1> </h1>"), None);
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let out = TempDir::new().unwrap();
        let config = config_for(Path::new("/no/such/help/tree"), out.path(), true);
        assert!(build_site(&config).is_err());
    }
}
