//! Access to the decompressed help tree on disk.

mod extractor;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::config::Config;
use crate::utils::error::{BoxResult, ChmError};
use crate::utils::path::{is_html_file, matches_any_component, normalize_local_path};

pub use extractor::extract_archive;

/// A decompressed help tree, either given directly or extracted from an archive
pub struct SourceTree {
    root: PathBuf,
    exclude: Vec<String>,
    // Keeps an extracted archive alive for as long as the tree is in use
    _extracted: Option<TempDir>,
}

impl SourceTree {
    /// Open the configured source, extracting it first when it is a file
    pub fn open(config: &Config) -> BoxResult<Self> {
        let source = &config.source;
        if source.is_dir() {
            info!("Reading help tree from {}", source.display());
            return Ok(Self::from_dir(source, &config.exclude));
        }
        if source.is_file() {
            info!("Extracting {}", source.display());
            let extracted = extract_archive(source, &config.seven_zip_paths)?;
            return Ok(SourceTree {
                root: extracted.path().to_path_buf(),
                exclude: config.exclude.clone(),
                _extracted: Some(extracted),
            });
        }
        Err(ChmError::Extract(format!("Source not found: {}", source.display())).into())
    }

    /// Use an already-decompressed directory
    pub fn from_dir<P: AsRef<Path>>(root: P, exclude: &[String]) -> Self {
        SourceTree {
            root: root.as_ref().to_path_buf(),
            exclude: exclude.to_vec(),
            _extracted: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a path relative to the root is an archive-internal entry
    pub fn is_excluded(&self, rel_path: &Path) -> bool {
        matches_any_component(&self.exclude, rel_path)
    }

    /// First `.hhc` file at the root, in name order
    pub fn find_toc_file(&self) -> Option<PathBuf> {
        let mut candidates: Vec<PathBuf> = fs::read_dir(&self.root)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .map(|ext| ext.eq_ignore_ascii_case("hhc"))
                        .unwrap_or(false)
            })
            .collect();
        candidates.sort();
        candidates.into_iter().next()
    }

    /// Every HTML document below the root as a sorted list of `/`-separated relative paths
    pub fn html_files(&self) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && is_html_file(entry.path()))
            .filter_map(|entry| {
                let rel = entry.path().strip_prefix(&self.root).ok()?.to_path_buf();
                if self.is_excluded(&rel) {
                    return None;
                }
                Some(rel.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        files.sort();
        files
    }

    /// Resolve a TOC local path to an existing file below the root
    pub fn resolve(&self, local: &str) -> Option<PathBuf> {
        let rel = normalize_local_path(local)?;
        let path = self.root.join(&rel);
        if path.is_file() {
            Some(path)
        } else {
            debug!("Referenced file is missing: {}", local);
            None
        }
    }

    /// Raw bytes of a document addressed by a TOC local path
    pub fn read(&self, local: &str) -> BoxResult<Vec<u8>> {
        let path = self
            .resolve(local)
            .ok_or_else(|| ChmError::Generic(format!("File not found in help tree: {}", local)))?;
        Ok(fs::read(path)?)
    }
}
