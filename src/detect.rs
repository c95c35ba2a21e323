//! hOCR format detection.

use crate::error::{Error, Result};
use regex::bytes::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// hOCR format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HocrFormat {
    /// Whether the markup declares the XHTML namespace
    pub xhtml: bool,
    /// Producer named by the `ocr-system` meta tag, if any
    pub ocr_system: Option<String>,
}

impl std::fmt::Display for HocrFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flavor = if self.xhtml { "XHTML" } else { "HTML" };
        match &self.ocr_system {
            Some(system) => write!(f, "hOCR ({}, {})", flavor, system),
            None => write!(f, "hOCR ({})", flavor),
        }
    }
}

/// Class token every hOCR page carries.
const PAGE_CLASS: &[u8] = b"ocr_page";
const XHTML_NAMESPACE: &[u8] = b"http://www.w3.org/1999/xhtml";

fn ocr_system_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"name\s*=\s*['"]ocr-system['"]\s+content\s*=\s*['"]([^'"]+)['"]"#).unwrap()
    })
}

/// Detect hOCR format from a file path.
///
/// # Example
/// ```no_run
/// use hocrflow::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("page_0001.html").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<HocrFormat> {
    let data = fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect hOCR format from bytes.
///
/// # Returns
/// * `Ok(HocrFormat)` if the data looks like markup with an `ocr_page` element
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<HocrFormat> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let first = data.iter().find(|b| !b.is_ascii_whitespace());
    if first != Some(&b'<') {
        return Err(Error::UnknownFormat);
    }

    if !contains(data, PAGE_CLASS) {
        return Err(Error::UnknownFormat);
    }

    let ocr_system = ocr_system_regex()
        .captures(data)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned());

    Ok(HocrFormat {
        xhtml: contains(data, XHTML_NAMESPACE),
        ocr_system,
    })
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Check if a file is hOCR markup.
pub fn is_hocr<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes are hOCR markup.
pub fn is_hocr_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_xhtml_page() {
        let data = br#"<?xml version="1.0"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><meta name='ocr-system' content='tesseract 5.3.0'/></head>
<body><div class='ocr_page' title='bbox 0 0 10 10'/></body></html>"#;
        let format = detect_format_from_bytes(data).unwrap();
        assert!(format.xhtml);
        assert_eq!(format.ocr_system.as_deref(), Some("tesseract 5.3.0"));
        assert_eq!(format.to_string(), "hOCR (XHTML, tesseract 5.3.0)");
    }

    #[test]
    fn test_detect_plain_html_page() {
        let data = b"\xEF\xBB\xBF  <div class=\"ocr_page\"></div>";
        let format = detect_format_from_bytes(data).unwrap();
        assert!(!format.xhtml);
        assert_eq!(format.ocr_system, None);
    }

    #[test]
    fn test_detect_invalid_format() {
        assert!(matches!(
            detect_format_from_bytes(b"%PDF-1.7"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_format_from_bytes(b"<html><body>plain</body></html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_format_from_bytes(b""),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_is_hocr_bytes() {
        assert!(is_hocr_bytes(b"<div class='ocr_page'></div>"));
        assert!(!is_hocr_bytes(b"Not markup"));
    }
}
