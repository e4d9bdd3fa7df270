use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref COMMENT_REGEX: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();

    // Quotes only delimit a value when they open it; `value=It's` is unquoted
    static ref TAG_REGEX: Regex = Regex::new(
        r#"<\s*(/?)\s*([A-Za-z][A-Za-z0-9]*)((?:=\s*"[^"]*"|=\s*'[^']*'|[^>])*)>"#
    ).unwrap();

    static ref ATTR_REGEX: Regex = Regex::new(
        r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>][^\s>]*)))?"#
    ).unwrap();
}

/// Structural events of the table-of-contents grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `<ul>`
    ListOpen,
    /// `</ul>`
    ListClose,
    /// `<object>`
    EntryOpen,
    /// `<param name=".." value="..">`; the key is lowercased
    Param { key: String, value: String },
    /// `</object>`
    EntryClose,
}

/// Turn table-of-contents markup into parser events.
///
/// Comments and declarations are skipped, tag and attribute names are
/// matched case-insensitively, and entities in attribute values are decoded.
/// Tags other than `ul`, `object` and `param` produce no events.
pub fn tokenize(markup: &str) -> Vec<Event> {
    let markup = COMMENT_REGEX.replace_all(markup, "");
    let mut events = Vec::new();

    for cap in TAG_REGEX.captures_iter(&markup) {
        let closing = !cap[1].is_empty();
        let name = cap[2].to_ascii_lowercase();

        let event = match (name.as_str(), closing) {
            ("ul", false) => Event::ListOpen,
            ("ul", true) => Event::ListClose,
            ("object", false) => Event::EntryOpen,
            ("object", true) => Event::EntryClose,
            ("param", false) => {
                let attrs = parse_attributes(cap.get(3).map_or("", |m| m.as_str()));
                let key = lookup(&attrs, "name").unwrap_or_default().to_lowercase();
                let value = lookup(&attrs, "value").unwrap_or_default();
                Event::Param { key, value }
            }
            _ => continue,
        };
        events.push(event);
    }

    events
}

/// Parse a tag's attribute text into lowercased-name/value pairs, in source order
fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTR_REGEX
        .captures_iter(raw)
        .map(|cap| {
            let name = cap[1].to_ascii_lowercase();
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map_or("", |m| m.as_str());
            (name, decode_entities(value).into_owned())
        })
        .collect()
}

/// Value of the last attribute with the given name
fn lookup(attrs: &[(String, String)], name: &str) -> Option<String> {
    attrs
        .iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

fn decode_entities(value: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(key: &str, value: &str) -> Event {
        Event::Param { key: key.to_string(), value: value.to_string() }
    }

    #[test]
    fn test_tokenize_entry() {
        let markup = r#"<UL><LI> <OBJECT type="text/sitemap">
            <param name="Name" value="Intro">
            <param name="Local" value="c1/intro.htm">
            </OBJECT></UL>"#;

        assert_eq!(
            tokenize(markup),
            vec![
                Event::ListOpen,
                Event::EntryOpen,
                param("name", "Intro"),
                param("local", "c1/intro.htm"),
                Event::EntryClose,
                Event::ListClose,
            ]
        );
    }

    #[test]
    fn test_comments_and_doctype_are_skipped() {
        let markup = "<!DOCTYPE HTML PUBLIC \"-//IETF//DTD HTML//EN\">\n<!-- <ul><object> -->\n<ul></ul>";
        assert_eq!(tokenize(markup), vec![Event::ListOpen, Event::ListClose]);
    }

    #[test]
    fn test_attribute_quoting_styles() {
        let markup = "<param name=Name value='Single'><param NAME=\"ImageNumber\" VALUE=11>";
        assert_eq!(tokenize(markup), vec![param("name", "Single"), param("imagenumber", "11")]);
    }

    #[test]
    fn test_entities_are_decoded() {
        let markup = r#"<param name="Name" value="Tips &amp; Tricks &lt;1&gt;">"#;
        assert_eq!(tokenize(markup), vec![param("name", "Tips & Tricks <1>")]);
    }

    #[test]
    fn test_quoted_gt_inside_value() {
        let markup = r#"<param name="Name" value="a > b">"#;
        assert_eq!(tokenize(markup), vec![param("name", "a > b")]);
    }

    #[test]
    fn test_apostrophe_inside_unquoted_value() {
        let markup = "<param name=Name value=It's><param name=Local value='its.htm'>";
        assert_eq!(
            tokenize(markup),
            vec![param("name", "It's"), param("local", "its.htm")]
        );
    }

    #[test]
    fn test_duplicate_attribute_last_wins() {
        let markup = r#"<param name="Name" value="first" value="second">"#;
        assert_eq!(tokenize(markup), vec![param("name", "second")]);
    }
}
