use serde::Serialize;

use crate::config::ThemeConfig;

/// One themed stylesheet slot in a content page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeLink {
    /// Element id of the `<link>` so the page script can find it
    pub id: String,
    /// Stylesheet applied by default
    pub light: String,
    /// Counterpart swapped in for the dark theme, when present
    pub dark: Option<String>,
}

/// Theme stylesheets detected at the source root
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeSet {
    links: Vec<ThemeLink>,
    stylesheets: Vec<String>,
    paired: bool,
}

impl ThemeSet {
    /// Build the set from the candidates that actually exist.
    ///
    /// Light and dark candidates pair up by position. A link slot is only
    /// emitted for a light stylesheet that exists.
    pub fn from_available<F>(theme: &ThemeConfig, exists: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let mut links = Vec::new();
        let mut stylesheets = Vec::new();
        let mut light_found = false;
        let mut dark_found = false;

        for (index, light) in theme.light_candidates.iter().enumerate() {
            if !exists(light) {
                continue;
            }
            light_found = true;
            stylesheets.push(light.clone());

            let dark = theme
                .dark_candidates
                .get(index)
                .filter(|dark| exists(dark.as_str()))
                .cloned();
            links.push(ThemeLink {
                id: format!("theme_link_{}", index),
                light: light.clone(),
                dark,
            });
        }

        for dark in &theme.dark_candidates {
            if exists(dark) {
                dark_found = true;
                stylesheets.push(dark.clone());
            }
        }

        ThemeSet {
            links,
            stylesheets,
            paired: light_found && dark_found,
        }
    }

    pub fn links(&self) -> &[ThemeLink] {
        &self.links
    }

    /// Every theme stylesheet found, light ones first
    pub fn available_stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// True when at least one light and one dark stylesheet were found
    pub fn has_paired_theme(&self) -> bool {
        self.paired
    }

    /// Whether a file name is one of the configured theme candidates
    pub fn is_candidate(theme: &ThemeConfig, name: &str) -> bool {
        theme
            .light_candidates
            .iter()
            .chain(theme.dark_candidates.iter())
            .any(|candidate| candidate == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn themes_with(files: &[&str]) -> ThemeSet {
        ThemeSet::from_available(&ThemeConfig::default(), |name| files.contains(&name))
    }

    #[test]
    fn test_full_pair() {
        let themes = themes_with(&["lesson_light.css", "lesson_dark.css"]);
        assert!(themes.has_paired_theme());
        assert_eq!(themes.links().len(), 1);
        assert_eq!(themes.links()[0].id, "theme_link_0");
        assert_eq!(themes.links()[0].dark.as_deref(), Some("lesson_dark.css"));
        assert_eq!(themes.available_stylesheets(), ["lesson_light.css", "lesson_dark.css"]);
    }

    #[test]
    fn test_light_only_is_not_paired() {
        let themes = themes_with(&["lesson_light.css", "custom_lesson_light.css"]);
        assert!(!themes.has_paired_theme());
        assert_eq!(themes.links().len(), 2);
        assert_eq!(themes.links()[1].id, "theme_link_1");
        assert!(themes.links().iter().all(|link| link.dark.is_none()));
    }

    #[test]
    fn test_cross_pairing_counts_as_paired() {
        let themes = themes_with(&["lesson_light.css", "custom_lesson_dark.css"]);
        assert!(themes.has_paired_theme());
        assert_eq!(themes.links()[0].dark, None);
    }

    #[test]
    fn test_nothing_found() {
        let themes = themes_with(&[]);
        assert!(!themes.has_paired_theme());
        assert!(themes.links().is_empty());
        assert!(themes.available_stylesheets().is_empty());
    }

    #[test]
    fn test_is_candidate() {
        let config = ThemeConfig::default();
        assert!(ThemeSet::is_candidate(&config, "custom_lesson_dark.css"));
        assert!(!ThemeSet::is_candidate(&config, "site.css"));
    }
}
