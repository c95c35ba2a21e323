//! Layout tree construction from hOCR markup.

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node as XmlNode, ParsingOptions};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::layout::Page;
use crate::model::{BBox, LayoutTree, NodeId, NodeKind, Style, Token};

use super::markup::normalize_markup;
use super::options::ParseOptions;

/// hOCR page parser.
pub struct HocrParser {
    markup: String,
    options: ParseOptions,
}

impl HocrParser {
    /// Open an hOCR page file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open an hOCR page file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse hOCR markup from bytes.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect_format_from_bytes(data)?;
        let markup = String::from_utf8(data.to_vec())
            .map_err(|e| Error::Xml(format!("markup is not valid UTF-8: {}", e)))?;
        Ok(Self { markup, options })
    }

    /// Wrap markup already held in memory.
    pub fn from_markup(markup: impl Into<String>, options: ParseOptions) -> Self {
        Self {
            markup: markup.into(),
            options,
        }
    }

    /// Parser options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Build the page, numbering it `number`.
    pub fn parse_page(&self, number: u32) -> Result<Page> {
        parse_page(&self.markup, number, &self.options)
    }
}

/// Build a [`Page`] from hOCR markup.
///
/// The first element whose class list contains `ocr_page` becomes the page
/// root. When `options.repair_fused_lines` is set, the repair pass runs
/// before the page is returned.
pub fn parse_page(markup: &str, number: u32, options: &ParseOptions) -> Result<Page> {
    let normalized = normalize_markup(markup);
    let parsing = ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(&normalized, parsing)?;
    let tree = TreeBuilder::new(options).build(&doc)?;

    let mut page = Page::new(number, tree, options.layout.clone());
    if page.is_blank() {
        log::debug!("Page {} has no lines", number);
    } else if options.repair_fused_lines {
        let repaired = page.repair_fused_lines()?;
        if repaired > 0 {
            log::debug!("Page {}: repaired {} fused line(s)", number, repaired);
        }
    }
    Ok(page)
}

/// Walks the markup below the page element and fills a [`LayoutTree`].
struct TreeBuilder<'a> {
    options: &'a ParseOptions,
}

impl<'a> TreeBuilder<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self { options }
    }

    fn build(&self, doc: &Document) -> Result<LayoutTree> {
        let page_el = doc
            .descendants()
            .find(|n| n.is_element() && has_class(n, "ocr_page"))
            .ok_or(Error::MissingPage)?;

        let bbox = self.element_bbox(page_el, false)?;
        let style = self.element_style(page_el)?;

        let mut tree = LayoutTree::new(NodeKind::Page, bbox.unwrap_or(BBox::ZERO));
        let root = tree.root();
        if let Some(class) = page_el.attribute("class") {
            tree.set_class(root, class.trim());
        }
        tree.set_style(root, style.clone());

        self.build_children(&mut tree, page_el, root, style.as_ref())?;
        match bbox {
            Some(bbox) => tree.set_bbox(root, bbox),
            None => tree.reset_bbox(root),
        }
        Ok(tree)
    }

    fn build_children(
        &self,
        tree: &mut LayoutTree,
        element: XmlNode,
        parent: NodeId,
        inherited: Option<&Style>,
    ) -> Result<()> {
        for child in element.children().filter(XmlNode::is_element) {
            let Some(class) = child.attribute("class") else {
                continue;
            };
            let kind = NodeKind::from_class(class);
            let style = self.element_style(child)?.or_else(|| inherited.cloned());
            let bbox = self.element_bbox(child, kind == NodeKind::Word)?;

            let id = if kind == NodeKind::Word {
                let token = Token::new(element_text(child), tail_text(child));
                tree.new_token(token, bbox.unwrap_or(BBox::ZERO), style)
            } else {
                let id = tree.new_span(kind, BBox::ZERO, style.clone());
                self.build_children(tree, child, id, style.as_ref())?;
                // markup boxes win over the child-derived box
                match bbox {
                    Some(bbox) => tree.set_bbox(id, bbox),
                    None => tree.reset_bbox(id),
                }
                id
            };
            tree.set_class(id, class.trim());
            tree.append(parent, id)?;
        }
        Ok(())
    }

    fn element_style(&self, element: XmlNode) -> Result<Option<Style>> {
        let Some(raw) = element.attribute("style") else {
            return Ok(None);
        };
        match Style::parse(raw) {
            Ok(style) => Ok(Some(style)),
            Err(e) => self.recover(e, element),
        }
    }

    fn element_bbox(&self, element: XmlNode, is_word: bool) -> Result<Option<BBox>> {
        if let Some(descriptor) = element.attribute("title").and_then(bbox_descriptor) {
            match parse_coords(descriptor) {
                Ok(bbox) => return Ok(Some(bbox)),
                Err(e) => {
                    self.recover::<BBox>(e, element)?;
                }
            }
        }

        if is_word {
            if let Some(coords) = element.attribute("data-coords") {
                return match parse_coords(coords) {
                    Ok(bbox) => Ok(Some(bbox)),
                    Err(e) => self.recover(e, element),
                };
            }
        }
        Ok(None)
    }

    /// Lenient mode drops the offending attribute; strict mode fails.
    fn recover<T>(&self, err: Error, element: XmlNode) -> Result<Option<T>> {
        if self.options.is_lenient() {
            log::warn!(
                "Skipping malformed attribute on <{} class='{}'>: {}",
                element.tag_name().name(),
                element.attribute("class").unwrap_or_default(),
                err
            );
            Ok(None)
        } else {
            Err(err)
        }
    }
}

fn has_class(node: &XmlNode, class: &str) -> bool {
    node.attribute("class")
        .is_some_and(|c| c.split_whitespace().any(|t| t == class))
}

/// The coordinates of the `bbox` segment of an hOCR `title` attribute.
///
/// `title='bbox 10 20 30 40; x_wconf 93'` yields `"10 20 30 40"`. A `|`
/// separates an inline confidence suffix in some producers.
fn bbox_descriptor(title: &str) -> Option<&str> {
    title.split(';').find_map(|segment| {
        let segment = segment.split('|').next().unwrap_or(segment).trim();
        segment
            .strip_prefix("bbox")
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}

fn parse_coords(raw: &str) -> Result<BBox> {
    let values = raw
        .split_whitespace()
        .map(|v| v.parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::InvalidBBox(format!("'{}': {}", raw.trim(), e)))?;

    match values.as_slice() {
        [x_min, y_min, x_max, y_max] => Ok(BBox::new(*x_min, *y_min, *x_max, *y_max)),
        _ => Err(Error::InvalidBBox(format!(
            "'{}': expected 4 coordinates, found {}",
            raw.trim(),
            values.len()
        ))),
    }
}

/// All text below a word element.
fn element_text(element: XmlNode) -> String {
    element
        .descendants()
        .filter(XmlNode::is_text)
        .filter_map(|n| n.text())
        .collect()
}

/// Text directly following a word element, up to the next element.
fn tail_text(element: XmlNode) -> Option<String> {
    element
        .next_sibling()
        .filter(XmlNode::is_text)
        .and_then(|n| n.text())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN"
    "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
 <body>
  <div class='ocr_page' title='image "p1.png"; bbox 0 0 1000 1400; ppageno 0'>
   <div class='ocr_carea' style='font-size:9pt;font-family:"Times"'>
    <p class='ocr_par'>
     <span class='ocr_line' title='bbox 90 150 1230 200; baseline 0 -8'>
      <span class='ocrx_word' title='bbox 92 155 152 196; x_wconf 91'>στὸς</span> <span class='ocrx_word' data-coords='168 155 221 196'>γὰρ</span>&nbsp;<span class='ocrx_word' title='bbox 1037 150 1206 196' style='font-size:11pt;font-style:bold'>mira<em>culum</em></span>
     </span>
     <span class='ocr_line'>
      <span class='ocrx_word' title='bbox 100 300 160 340'>καὶ</span>
     </span>
    </p>
    <span>unclassed</span>
    <div class='ocr_photo' title='bbox 300 400 500 600'></div>
   </div>
  </div>
 </body>
</html>"#;

    fn build(markup: &str, options: &ParseOptions) -> Result<LayoutTree> {
        let normalized = normalize_markup(markup);
        let doc = Document::parse_with_options(
            &normalized,
            ParsingOptions {
                allow_dtd: true,
                ..Default::default()
            },
        )?;
        TreeBuilder::new(options).build(&doc)
    }

    #[test]
    fn test_build_tree() {
        let tree = build(PAGE, &ParseOptions::default()).unwrap();
        let root = tree.root();

        assert_eq!(tree.kind(root), NodeKind::Page);
        assert_eq!(tree.bbox(root), BBox::new(0, 0, 1000, 1400));

        let blocks = tree.blocks(root);
        assert_eq!(blocks.len(), 1);
        assert_eq!(tree.node(blocks[0]).class(), "ocr_carea");
        // the unclassed span is skipped, the photo becomes a generic span
        assert_eq!(tree.len(blocks[0]), 2);

        let lines = tree.lines(root);
        assert_eq!(lines.len(), 2);
        assert_eq!(tree.bbox(lines[0]), BBox::new(90, 150, 1230, 200));
        // no markup box: derived from the only child
        assert_eq!(tree.bbox(lines[1]), BBox::new(100, 300, 160, 340));

        let tokens = tree.tokens(lines[0]);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tree.bbox(tokens[1]), BBox::new(168, 155, 221, 196));
        assert_eq!(tree.token(tokens[2]).unwrap().text, "miraculum");
        assert_eq!(tree.token(tokens[0]).unwrap().tail.as_deref(), Some(" "));
        assert_eq!(
            tree.token(tokens[1]).unwrap().tail.as_deref(),
            Some("\u{00A0}")
        );
    }

    #[test]
    fn test_style_inheritance() {
        let tree = build(PAGE, &ParseOptions::default()).unwrap();
        let tokens = tree.tokens(tree.root());

        let inherited = tree.style(tokens[0]).unwrap();
        assert_eq!(inherited.size, 9);
        assert_eq!(inherited.family.as_deref(), Some("Times"));

        let own = tree.style(tokens[2]).unwrap();
        assert_eq!(own.size, 11);
        assert!(own.is_bold());
        assert_eq!(tree.style(tree.root()), None);
    }

    #[test]
    fn test_missing_page() {
        let result = build("<html><body><p>text</p></body></html>", &ParseOptions::default());
        assert!(matches!(result, Err(Error::MissingPage)));
    }

    #[test]
    fn test_malformed_markup() {
        let result = build("<div class='ocr_page'><span>", &ParseOptions::default());
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_strict_and_lenient_style() {
        let markup = "<div class='ocr_page' title='bbox 0 0 10 10'>\
            <span class='ocr_line' style='font-family:Times' title='bbox 0 0 5 5'></span></div>";

        let strict = build(markup, &ParseOptions::default());
        assert!(matches!(strict, Err(Error::MissingFontSize)));

        let tree = build(markup, &ParseOptions::default().lenient()).unwrap();
        let line = tree.lines(tree.root())[0];
        assert_eq!(tree.style(line), None);
    }

    #[test]
    fn test_strict_and_lenient_bbox() {
        let markup = "<div class='ocr_page' title='bbox 0 0 10 10'>\
            <span class='ocrx_word' title='bbox 1 2 x 4' data-coords='1 2 3 4'>a</span></div>";

        let strict = build(markup, &ParseOptions::default());
        assert!(matches!(strict, Err(Error::InvalidBBox(_))));

        let tree = build(markup, &ParseOptions::default().lenient()).unwrap();
        let token = tree.tokens(tree.root())[0];
        assert_eq!(tree.bbox(token), BBox::new(1, 2, 3, 4));
    }

    #[test]
    fn test_extreme_line_box() {
        let words: String = ["ἐν", "ἀρχῇ", "ἦν", "ὁ", "in", "principio", "erat", "verbum"]
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let x = 100 + 200 * i;
                format!(
                    "<span class='ocrx_word' title='bbox {} 0 {} 10'>{}</span> ",
                    x,
                    x + 150,
                    w
                )
            })
            .collect();
        let markup = format!(
            "<div class='ocr_page' title='bbox 0 0 2000 3000'>\
             <span class='ocr_line' title='bbox -2147483648 0 2147483647 10'>{}</span></div>",
            words
        );

        let page = parse_page(&markup, 1, &ParseOptions::new().with_repair(false)).unwrap();
        let region = page.print_region().unwrap();
        assert_eq!(region.width(), i32::MAX);
        assert!(page.midline().is_some_and(f64::is_finite));
        assert_eq!(page.fused_lines().len(), 1);

        // The repaired fragments take their boxes from their words
        let page = parse_page(&markup, 1, &ParseOptions::default()).unwrap();
        assert_eq!(page.lines().len(), 2);
        assert!(page.fused_lines().is_empty());
        assert_eq!(page.print_region(), Some(BBox::new(100, 0, 1650, 10)));
    }

    #[test]
    fn test_bbox_descriptor() {
        assert_eq!(bbox_descriptor("bbox 1 2 3 4"), Some(" 1 2 3 4"));
        assert_eq!(
            bbox_descriptor("image \"x.png\"; bbox 1 2 3 4; ppageno 0"),
            Some(" 1 2 3 4")
        );
        assert_eq!(bbox_descriptor("bbox 1 2 3 4|x_wconf 88"), Some(" 1 2 3 4"));
        assert_eq!(bbox_descriptor("baseline 0 0"), None);
        assert_eq!(bbox_descriptor("bboxes 1 2 3 4"), None);
    }

    #[test]
    fn test_parse_coords() {
        assert_eq!(parse_coords(" 5 6 20 21 ").unwrap(), BBox::new(5, 6, 20, 21));
        assert!(matches!(parse_coords("1 2 3"), Err(Error::InvalidBBox(_))));
        assert!(matches!(parse_coords("1 2 3 z"), Err(Error::InvalidBBox(_))));
    }

    #[test]
    fn test_parse_blank_page() {
        let markup = "<div class='ocr_page' title='bbox 0 0 800 1200'></div>";
        let page = parse_page(markup, 4, &ParseOptions::default()).unwrap();
        assert_eq!(page.number(), 4);
        assert!(page.is_blank());
        assert_eq!(page.bbox(), BBox::new(0, 0, 800, 1200));
        assert_eq!(page.print_region(), None);
    }
}
