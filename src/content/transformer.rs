use kuchikiki::{NodeRef, Selectors};
use log::debug;

use crate::config::ChromeMarkers;
use crate::encoding::EncodingResolver;
use crate::layout::{ContentPage, PageRenderer, ThemeSet};
use crate::utils::error::{BoxResult, ChmError};
use super::chrome::strip_chrome;
use super::dom::{attr, inner_html, outer_html, parse_document, select_all, select_first, TransformError};
use super::paths::asset_prefix;
use super::table_fix::repair_table_rows;
use super::{DocumentOutcome, FallbackReason, ProcessedDocument};

/// Rewrites help documents into standalone content pages
pub struct ContentTransformer {
    chrome: ChromeMarkers,
    themes: ThemeSet,
    renderer: PageRenderer,
}

impl ContentTransformer {
    /// Create a transformer, rejecting chrome selectors that do not compile
    pub fn new(chrome: ChromeMarkers, themes: ThemeSet, renderer: PageRenderer) -> BoxResult<Self> {
        for selector in chrome
            .nav_panel
            .iter()
            .chain(&chrome.footer)
            .chain(&chrome.theme_switch)
            .chain(&chrome.slide_controls)
        {
            Selectors::compile(selector)
                .map_err(|_| ChmError::Config(format!("Invalid chrome selector: {}", selector)))?;
        }

        Ok(ContentTransformer { chrome, themes, renderer })
    }

    pub fn themes(&self) -> &ThemeSet {
        &self.themes
    }

    pub fn renderer(&self) -> &PageRenderer {
        &self.renderer
    }

    /// Pull styles, scripts and the cleaned body out of a document.
    ///
    /// `rel_path` is the document's location below the content root.
    pub fn extract(&self, text: &str, title: &str, rel_path: &str) -> Result<ContentPage, TransformError> {
        let document = parse_document(text);

        let mut styles = Vec::new();
        let mut stylesheet_links = Vec::new();
        if let Some(head) = select_first(&document, "head") {
            for style in select_all(&head, "style")? {
                styles.push(outer_html(&style)?);
            }
            for link in select_all(&head, "link")? {
                if is_stylesheet_link(&link) {
                    stylesheet_links.push(outer_html(&link)?);
                }
            }
        }

        let script_nodes = select_all(&document, "script")?;
        let mut scripts = Vec::with_capacity(script_nodes.len());
        for script in &script_nodes {
            scripts.push(outer_html(script)?);
        }
        for script in &script_nodes {
            script.detach();
        }

        let body = select_first(&document, "body")
            .ok_or_else(|| TransformError::new("document has no body"))?;
        let removed = strip_chrome(&body, &self.chrome)?;
        let wrapped = repair_table_rows(&body);
        debug!(
            "{}: removed {} chrome elements, wrapped {} table rows",
            rel_path, removed, wrapped
        );

        Ok(ContentPage {
            title: title.to_string(),
            body: inner_html(&body)?,
            asset_prefix: asset_prefix(rel_path),
            styles,
            stylesheet_links,
            scripts,
        })
    }

    /// Rewrite a decoded document into a complete content page
    pub fn transform(&self, text: &str, title: &str, rel_path: &str) -> Result<String, TransformError> {
        let page = self.extract(text, title, rel_path)?;
        self.renderer
            .render_content_page(&page, &self.themes)
            .map_err(|e| TransformError::new(e.to_string()))
    }

    /// Decode and rewrite raw document bytes.
    ///
    /// Never fails: a document that cannot be decoded or rewritten comes
    /// back as a fallback carrying the reason.
    pub fn process(
        &self,
        bytes: &[u8],
        resolver: &EncodingResolver,
        title: &str,
        rel_path: &str,
    ) -> ProcessedDocument {
        let decoded = match resolver.decode(bytes) {
            Ok(decoded) => decoded,
            Err(failure) => {
                return ProcessedDocument {
                    outcome: DocumentOutcome::Fallback(FallbackReason::Decode(failure)),
                    text: None,
                }
            }
        };

        let outcome = match self.transform(&decoded.text, title, rel_path) {
            Ok(html) => DocumentOutcome::Transformed(html),
            Err(err) => DocumentOutcome::Fallback(FallbackReason::Transform(err)),
        };

        ProcessedDocument {
            outcome,
            text: Some(decoded.text),
        }
    }
}

fn is_stylesheet_link(link: &NodeRef) -> bool {
    attr(link, "rel")
        .map(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        })
        .unwrap_or(false)
}
