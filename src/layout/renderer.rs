use liquid::{Parser, Template};
use serde::Serialize;

use crate::utils::error::{BoxResult, ChmError};
use super::theme::ThemeSet;

const CONTENT_TEMPLATE: &str = include_str!("../../templates/content.html");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const STYLE_CSS: &str = include_str!("../../templates/style.css");
const APP_JS: &str = include_str!("../../templates/app.js");

/// Material extracted from one source document, ready to be re-emitted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentPage {
    pub title: String,
    pub body: String,
    /// Relative path from the page back to the content root
    pub asset_prefix: String,
    /// Serialized `<style>` elements from the source head
    pub styles: Vec<String>,
    /// Serialized `<link rel="stylesheet">` elements from the source head
    pub stylesheet_links: Vec<String>,
    /// Serialized `<script>` elements from anywhere in the source
    pub scripts: Vec<String>,
}

#[derive(Serialize)]
struct ThemeLinkContext<'a> {
    id: &'a str,
    href: String,
}

#[derive(Serialize)]
struct ContentContext<'a> {
    title: &'a str,
    title_js: String,
    body: &'a str,
    asset_prefix_js: String,
    theme_links: Vec<ThemeLinkContext<'a>>,
    theme_links_js: String,
    stylesheet_links: &'a [String],
    styles: &'a [String],
    scripts: &'a [String],
    has_paired_theme: bool,
    notify_load: bool,
}

#[derive(Serialize)]
struct IndexContext<'a> {
    site_title: &'a str,
    theme_toggle_style: &'a str,
}

/// Renders the page skeletons from the embedded templates
pub struct PageRenderer {
    content: Template,
    index: Template,
}

impl PageRenderer {
    /// Compile the embedded templates
    pub fn new() -> BoxResult<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| ChmError::Template(format!("Failed to create Liquid parser: {}", e)))?;

        Ok(PageRenderer {
            content: compile(&parser, "content.html", CONTENT_TEMPLATE)?,
            index: compile(&parser, "index.html", INDEX_TEMPLATE)?,
        })
    }

    /// Render a rewritten content document.
    ///
    /// Theme links come first, then the source's stylesheet links and
    /// styles. When a paired theme exists the page gets the theme-switching
    /// script; otherwise it only announces itself to the hosting frame, and
    /// only if the source carried no scripts of its own.
    pub fn render_content_page(&self, page: &ContentPage, themes: &ThemeSet) -> BoxResult<String> {
        let theme_links = themes
            .links()
            .iter()
            .map(|link| ThemeLinkContext {
                id: &link.id,
                href: format!("{}{}", page.asset_prefix, link.light),
            })
            .collect();

        let context = ContentContext {
            title: &page.title,
            title_js: script_literal(&page.title)?,
            body: &page.body,
            asset_prefix_js: script_literal(&page.asset_prefix)?,
            theme_links,
            theme_links_js: script_literal(themes.links())?,
            stylesheet_links: &page.stylesheet_links,
            styles: &page.styles,
            scripts: &page.scripts,
            has_paired_theme: themes.has_paired_theme(),
            notify_load: page.scripts.iter().all(|script| script.trim().is_empty()),
        };

        render(&self.content, "content.html", &context)
    }

    /// Render the site entry page
    pub fn render_index_page(&self, site_title: &str, has_paired_theme: bool) -> BoxResult<String> {
        let context = IndexContext {
            site_title,
            theme_toggle_style: if has_paired_theme { "" } else { "display: none;" },
        };
        render(&self.index, "index.html", &context)
    }

    pub fn style_css(&self) -> &'static str {
        STYLE_CSS
    }

    pub fn app_js(&self) -> &'static str {
        APP_JS
    }
}

fn compile(parser: &Parser, name: &str, source: &str) -> BoxResult<Template> {
    parser
        .parse(source)
        .map_err(|e| ChmError::Template(format!("Failed to parse template {}: {}", name, e)).into())
}

fn render<T: Serialize>(template: &Template, name: &str, context: &T) -> BoxResult<String> {
    let globals = liquid::to_object(context)
        .map_err(|e| ChmError::Template(format!("Invalid context for {}: {}", name, e)))?;
    template
        .render(&globals)
        .map_err(|e| ChmError::Template(format!("Failed to render {}: {}", name, e)).into())
}

/// JSON literal that is safe to place inside an inline `<script>`
pub(crate) fn script_literal<T: Serialize + ?Sized>(value: &T) -> BoxResult<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
