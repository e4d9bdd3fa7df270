//! Client-side search index built from document text.

use serde::Serialize;

use crate::content::{parse_document, select_all, visible_text};
use crate::utils::error::BoxResult;

/// One searchable page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEntry {
    pub title: String,
    /// Served location, e.g. `content/c1/intro.htm`
    pub path: String,
    /// Plain-text snippet, capped at the index's maximum length
    pub content: String,
}

/// Ordered search index; entries are only ever appended
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
    max_len: usize,
}

impl SearchIndex {
    pub fn new(max_len: usize) -> Self {
        SearchIndex {
            entries: Vec::new(),
            max_len,
        }
    }

    /// Plain-text snippet of a document.
    ///
    /// Script and style subtrees are dropped, text runs are joined with
    /// single spaces and the result is cut to `max_len` characters.
    pub fn snippet(&self, document: &str) -> String {
        let root = parse_document(document);
        if let Ok(hidden) = select_all(&root, "script, style") {
            for node in hidden {
                node.detach();
            }
        }

        let text = visible_text(&root);
        let text = text.trim();
        match text.char_indices().nth(self.max_len) {
            Some((cut, _)) => text[..cut].trim_end().to_string(),
            None => text.to_string(),
        }
    }

    /// Append an entry for a document; empty documents are not indexed.
    ///
    /// Returns whether an entry was added.
    pub fn add(&mut self, title: &str, path: &str, document: &str) -> bool {
        let content = self.snippet(document);
        if content.is_empty() {
            return false;
        }
        self.entries.push(SearchEntry {
            title: title.to_string(),
            path: path.to_string(),
            content,
        });
        true
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The index as a script defining `searchIndex`
    pub fn to_script(&self) -> BoxResult<String> {
        let json = serde_json::to_string(self.entries())?;
        Ok(format!("const searchIndex = {};\n", json.replace("</", "<\\/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_drops_script_and_style() {
        let index = SearchIndex::new(500);
        let snippet = index.snippet(
            r#"<html><head><style>.secret { color: red; }</style><script>var hidden = 1;</script></head>
            <body><h1>Heading</h1><p>First  paragraph.</p><script>alert("no");</script><div>Last</div></body></html>"#,
        );
        assert_eq!(snippet, "Heading First  paragraph. Last");
    }

    #[test]
    fn test_snippet_is_capped_in_characters() {
        let index = SearchIndex::new(500);
        let body = "中".repeat(800);
        let snippet = index.snippet(&format!("<p>{}</p>", body));
        assert_eq!(snippet.chars().count(), 500);
        assert!(snippet.chars().all(|c| c == '中'));
    }

    #[test]
    fn test_snippet_never_exceeds_cap() {
        let index = SearchIndex::new(500);
        let words: Vec<String> = (0..400).map(|i| format!("<p>word{}</p><script>x{}</script>", i, i)).collect();
        let snippet = index.snippet(&words.concat());
        assert!(snippet.chars().count() <= 500);
        assert!(!snippet.contains("x1"));
    }

    #[test]
    fn test_empty_documents_are_skipped() {
        let mut index = SearchIndex::new(500);
        assert!(!index.add("Blank", "content/blank.htm", "<html><body>  <script>only()</script></body></html>"));
        assert!(index.add("Intro", "content/intro.htm", "<p>Hello</p>"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].path, "content/intro.htm");
        assert_eq!(index.entries()[0].content, "Hello");
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut index = SearchIndex::new(500);
        index.add("B", "content/b.htm", "<p>b</p>");
        index.add("A", "content/a.htm", "<p>a</p>");
        index.add("B", "content/b.htm", "<p>b</p>");
        let titles: Vec<&str> = index.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_to_script() {
        let mut index = SearchIndex::new(500);
        index.add("Intro", "content/intro.htm", "<p>a &lt;/script&gt; b</p>");
        let script = index.to_script().unwrap();
        assert!(script.starts_with("const searchIndex = ["));
        assert!(script.ends_with("];\n"));
        assert!(script.contains(r#""path":"content/intro.htm""#));
        assert!(!script.contains("</script>"));
    }
}
