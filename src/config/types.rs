use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

use crate::config::defaults;
use crate::utils::path::matches_any_component;

/// Light/dark stylesheet candidates, paired by position
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThemeConfig {
    #[serde(default = "defaults::default_light_candidates")]
    pub light_candidates: Vec<String>,

    #[serde(default = "defaults::default_dark_candidates")]
    pub dark_candidates: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            light_candidates: defaults::default_light_candidates(),
            dark_candidates: defaults::default_dark_candidates(),
        }
    }
}

/// CSS selectors identifying legacy chrome inside content documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChromeMarkers {
    /// Navigation panel
    #[serde(default = "defaults::default_nav_panel_markers")]
    pub nav_panel: Vec<String>,

    /// Page footer and its separating rule
    #[serde(default = "defaults::default_footer_markers")]
    pub footer: Vec<String>,

    /// Theme-switch control image; a `div` wrapper goes with it
    #[serde(default = "defaults::default_theme_switch_markers")]
    pub theme_switch: Vec<String>,

    /// Slide and popup overlay controls
    #[serde(default = "defaults::default_slide_control_markers")]
    pub slide_controls: Vec<String>,
}

impl Default for ChromeMarkers {
    fn default() -> Self {
        ChromeMarkers {
            nav_panel: defaults::default_nav_panel_markers(),
            footer: defaults::default_footer_markers(),
            theme_switch: defaults::default_theme_switch_markers(),
            slide_controls: defaults::default_slide_control_markers(),
        }
    }
}

/// Converter configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Decompressed help tree or `.chm` archive
    #[serde(default = "defaults::default_source")]
    pub source: PathBuf,

    /// Destination directory for the generated site
    #[serde(default = "defaults::default_destination")]
    pub destination: PathBuf,

    /// Site title override; extracted from the table of contents when unset
    #[serde(default)]
    pub title: Option<String>,

    /// Encoding labels tried in priority order
    #[serde(default = "defaults::default_encodings")]
    pub encodings: Vec<String>,

    /// Search snippet cap in characters
    #[serde(default = "defaults::default_search_content_max_length")]
    pub search_content_max_length: usize,

    /// Transform documents on the rayon thread pool
    #[serde(default = "defaults::default_parallel")]
    pub parallel: bool,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub chrome: ChromeMarkers,

    /// Resource folder names copied whole
    #[serde(default = "defaults::default_resource_folders")]
    pub resource_folders: Vec<String>,

    /// Extensions of loose image files copied individually
    #[serde(default = "defaults::default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Glob patterns of archive-internal entries to skip
    #[serde(default = "defaults::default_exclude")]
    pub exclude: Vec<String>,

    /// 7-Zip executables to try after PATH
    #[serde(default = "defaults::default_seven_zip_paths")]
    pub seven_zip_paths: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: defaults::default_source(),
            destination: defaults::default_destination(),
            title: None,
            encodings: defaults::default_encodings(),
            search_content_max_length: defaults::default_search_content_max_length(),
            parallel: defaults::default_parallel(),
            theme: ThemeConfig::default(),
            chrome: ChromeMarkers::default(),
            resource_folders: defaults::default_resource_folders(),
            image_extensions: defaults::default_image_extensions(),
            exclude: defaults::default_exclude(),
            seven_zip_paths: defaults::default_seven_zip_paths(),
        }
    }
}

impl Config {
    /// Check whether a path relative to the source root is archive-internal
    pub fn is_excluded(&self, rel_path: &Path) -> bool {
        matches_any_component(&self.exclude, rel_path)
    }

    /// Check whether a file extension names an image
    pub fn is_image_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.image_extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
    }

    /// Check whether a top-level folder should be copied as a resource folder
    pub fn is_resource_folder(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        lower.starts_with("image")
            || self.resource_folders.iter().any(|f| f.eq_ignore_ascii_case(&lower))
    }
}
