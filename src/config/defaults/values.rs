use std::path::PathBuf;

/// Default source: the current directory
pub fn default_source() -> PathBuf {
    PathBuf::from(".")
}

/// Default destination directory for the generated site
pub fn default_destination() -> PathBuf {
    PathBuf::from("_site")
}

/// Encodings tried in order when decoding source files
pub fn default_encodings() -> Vec<String> {
    vec![
        "gb18030".to_string(),
        "gbk".to_string(),
        "utf-8".to_string(),
        "gb2312".to_string(),
    ]
}

/// Maximum number of characters kept per search snippet
pub fn default_search_content_max_length() -> usize {
    500
}

pub fn default_parallel() -> bool {
    true
}

/// Light theme stylesheets looked for at the source root
pub fn default_light_candidates() -> Vec<String> {
    vec![
        "lesson_light.css".to_string(),
        "custom_lesson_light.css".to_string(),
    ]
}

/// Dark theme stylesheets, paired by position with the light ones
pub fn default_dark_candidates() -> Vec<String> {
    vec![
        "lesson_dark.css".to_string(),
        "custom_lesson_dark.css".to_string(),
    ]
}

pub fn default_nav_panel_markers() -> Vec<String> {
    vec![
        "div.lme_nav_panel_cls".to_string(),
        "div#lme_nav_panel".to_string(),
    ]
}

pub fn default_footer_markers() -> Vec<String> {
    vec!["div.foot".to_string(), "hr.footline".to_string()]
}

pub fn default_theme_switch_markers() -> Vec<String> {
    vec!["img#theme_switcher".to_string()]
}

pub fn default_slide_control_markers() -> Vec<String> {
    vec![
        "div#slide_control_panel".to_string(),
        "div#slides_trigger".to_string(),
        "div#popup_base_panel".to_string(),
        "div#popup_panel".to_string(),
    ]
}

/// Folder names (case-insensitive) copied whole into the content root
pub fn default_resource_folders() -> Vec<String> {
    [
        "images", "images~", "img", "imgs", "image", "assets", "res", "resources", "pics",
        "pictures",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_image_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif", "bmp", "ico", "svg", "webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Archive-internal entries that never reach the output
pub fn default_exclude() -> Vec<String> {
    vec![
        "#*".to_string(),
        "$*".to_string(),
        "*.hhc".to_string(),
        "*.hhk".to_string(),
        "*.hhp".to_string(),
    ]
}

/// Common 7-Zip install locations, tried after PATH
pub fn default_seven_zip_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Program Files\7-Zip\7z.exe"),
        PathBuf::from(r"C:\Program Files (x86)\7-Zip\7z.exe"),
    ]
}
