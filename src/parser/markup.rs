//! Raw markup cleanup applied before XML parsing.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// HTML named entities that appear in OCR output but are undefined in XML.
const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&shy;", "\u{00AD}"),
    ("&nbsp;", "\u{00A0}"),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
];

fn xml_declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<\?xml.*?\?>").unwrap())
}

/// Prepare hOCR markup for a strict XML parser.
///
/// Removes any XML declaration and replaces HTML-only named entities with
/// the characters they stand for.
pub fn normalize_markup(markup: &str) -> String {
    let stripped: Cow<'_, str> = xml_declaration().replace_all(markup, "");
    let mut out = stripped.into_owned();
    for (entity, replacement) in HTML_ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    out
}
