//! Font style hints carried by hOCR `style` attributes.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Resolved font information for a layout node.
///
/// Parsed from a CSS-like declaration list such as
/// `font-size:11pt;font-family:"Times";font-style:"bold italic"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    /// Font size in points
    pub size: u32,
    /// Font family, unquoted
    pub family: Option<String>,
    /// Lowercase style/weight tokens in declaration order, without duplicates
    pub weight: Vec<String>,
}

fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([^:]+?)\s*:\s*(.+?)\s*$").unwrap())
}

fn point_size_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*pt\b").unwrap())
}

fn digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

fn separator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s,]+").unwrap())
}

/// Split `key:value;key:value` into pairs, skipping empty or key-only chunks.
fn parse_declarations(s: &str) -> Vec<(String, String)> {
    s.split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .filter_map(|chunk| {
            declaration_regex()
                .captures(chunk)
                .map(|caps| (caps[1].trim().to_string(), caps[2].trim().to_string()))
        })
        .collect()
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && bytes[0] == bytes[bytes.len() - 1]
        && (bytes[0] == b'"' || bytes[0] == b'\'')
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_size(raw: &str) -> Result<u32> {
    let digits = point_size_regex()
        .captures(raw)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
        .or_else(|| digits_regex().find(raw).map(|m| m.as_str()))
        .ok_or_else(|| Error::InvalidStyle(format!("font-size '{}' has no digits", raw)))?;

    digits
        .parse()
        .map_err(|_| Error::InvalidStyle(format!("font-size '{}' is out of range", raw)))
}

impl Style {
    /// Parse a style declaration list.
    ///
    /// `font-size` is required; `font-family` and `font-style`/`font-weight`
    /// are optional. Later declarations of the same property win.
    pub fn parse(s: &str) -> Result<Self> {
        let declarations = parse_declarations(s);
        let lookup = |key: &str| {
            declarations
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let size = match lookup("font-size") {
            Some(raw) if !raw.is_empty() => parse_size(raw)?,
            _ => return Err(Error::MissingFontSize),
        };

        let family = lookup("font-family")
            .map(strip_quotes)
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        let style_or_weight = lookup("font-style")
            .filter(|v| !v.is_empty())
            .or_else(|| lookup("font-weight"))
            .map(strip_quotes)
            .unwrap_or("");

        let mut weight: Vec<String> = Vec::new();
        for token in separator_regex().split(style_or_weight) {
            let token = token.to_lowercase();
            if !token.is_empty() && !weight.contains(&token) {
                weight.push(token);
            }
        }

        Ok(Self {
            size,
            family,
            weight,
        })
    }

    /// Check whether a style/weight token such as `bold` is present.
    pub fn contains(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.weight.iter().any(|w| *w == token)
    }

    pub fn is_bold(&self) -> bool {
        self.contains("bold")
    }

    pub fn is_italic(&self) -> bool {
        self.contains("italic")
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Style::parse(s)
    }
}
