//! Integration tests for page segmentation and fused-line repair.

use hocrflow::model::ColumnSide;
use hocrflow::{parse_file_with_options, BBox, NodeId, Page, ParseOptions};

const FIXTURE: &str = "tests/fixtures/page_fused.html";

fn load(repair: bool) -> Page {
    parse_file_with_options(FIXTURE, ParseOptions::new().with_repair(repair)).unwrap()
}

fn clean(page: &Page, line: NodeId) -> String {
    page.line_text(line)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn line_starting(page: &Page, prefix: &str) -> NodeId {
    page.lines()
        .into_iter()
        .find(|&l| clean(page, l).starts_with(prefix))
        .unwrap_or_else(|| panic!("no line starting with {:?}", prefix))
}

#[test]
fn test_page_geometry() {
    let page = load(true);

    assert_eq!(page.bbox(), BBox::new(0, 0, 2000, 3000));
    assert_eq!(page.lines().len(), 14);
    assert_eq!(page.blocks().len(), 5);
    assert_eq!(page.margin_left(), Some(100));
    assert_eq!(page.margin_right(), Some(100));
    assert_eq!(page.margin_top(), Some(100));
    assert_eq!(page.margin_bottom(), Some(2260));
    assert_eq!(page.print_region(), Some(BBox::new(100, 100, 1900, 740)));
    assert_eq!(page.midline(), Some(900.0));
}

#[test]
fn test_fused_line_detected_before_repair() {
    let page = load(false);

    assert_eq!(page.lines().len(), 13);
    let fused = page.fused_lines();
    assert_eq!(fused.len(), 1);

    let line = fused[0];
    assert!(clean(&page, line).starts_with("ἐπειδὴ"));
    assert!(page.starts_primary(line));
    assert!(!page.ends_primary(line));
    assert_eq!(page.tree().bbox(line), BBox::new(100, 500, 1900, 540));

    // The fused line reaches the right edge, so it shows up in both columns
    assert!(page.left_column().lines.contains(&line));
    assert!(page.right_column().lines.contains(&line));
}

#[test]
fn test_repair_splits_fused_line() {
    let page = load(true);
    assert!(page.fused_lines().is_empty());

    let left = line_starting(&page, "ἐπειδὴ");
    let right = line_starting(&page, "quoniam");

    assert_eq!(
        clean(&page, left),
        "ἐπειδὴ πολλάκις ἡμῖν ἐπέστειλας περὶ τῆς εἰρήνης ,"
    );
    assert_eq!(clean(&page, right), "quoniam saepe scripsisti");
    assert_eq!(page.tree().bbox(left), BBox::new(100, 500, 880, 540));
    assert_eq!(page.tree().bbox(right), BBox::new(1000, 500, 1900, 540));
    assert_eq!(page.tree().node(left).class(), "ocr_line");
}

#[test]
fn test_repair_places_fragments_in_reading_order() {
    let page = load(true);

    let left = line_starting(&page, "ἐπειδὴ");
    let right = line_starting(&page, "quoniam");
    let greek_parent = page.tree().parent(left).unwrap();
    let latin_parent = page.tree().parent(right).unwrap();

    let greek: Vec<String> = page
        .tree()
        .children(greek_parent)
        .map(|l| clean(&page, l))
        .collect();
    assert_eq!(greek[2], clean(&page, left));
    assert!(greek[3].starts_with("γράμματα"));

    let latin: Vec<String> = page
        .tree()
        .children(latin_parent)
        .map(|l| clean(&page, l))
        .collect();
    assert_eq!(
        latin,
        vec![
            "Basilius Gregorio sodali",
            "agnovi tuas de",
            "quoniam saepe scripsisti",
            "pace litteras gavisus",
            "sum de amicitia",
        ]
    );
}

#[test]
fn test_repair_is_idempotent() {
    let mut page = load(true);
    let lines = page.lines().len();

    assert_eq!(page.repair_fused_lines().unwrap(), 0);
    assert_eq!(page.lines().len(), lines);
}

#[test]
fn test_repair_count_matches_detection() {
    let mut page = load(false);
    let detected = page.fused_lines().len();

    assert_eq!(page.repair_fused_lines().unwrap(), detected);
    assert_eq!(page.lines().len(), 14);
}

#[test]
fn test_columns() {
    let page = load(true);

    let left = page.left_column();
    let right = page.right_column();
    assert_eq!(left.side, ColumnSide::Left);
    assert_eq!(left.number.as_deref(), Some("123"));
    assert_eq!(right.number.as_deref(), Some("124"));

    let left_text: Vec<String> = left.lines.iter().map(|&l| clean(&page, l)).collect();
    assert_eq!(left_text.len(), 6);
    assert_eq!(left_text[0], "123 SANCTI BASILII");
    assert_eq!(left_text[5], "ἐπὶ τῇ φιλίᾳ");

    let right_text: Vec<String> = right.lines.iter().map(|&l| clean(&page, l)).collect();
    assert_eq!(right_text.len(), 6);
    assert_eq!(right_text[0], "EPISTOLAE 124");
    assert_eq!(right_text[3], "quoniam saepe scripsisti");

    let threshold = page.options().primary_threshold;
    assert_eq!(left.percent_primary(page.tree(), threshold), 86);
    assert_eq!(right.percent_primary(page.tree(), threshold), 0);
}

#[test]
fn test_primary_columns() {
    let page = load(true);

    let primary = page.primary_columns();
    assert_eq!(primary.len(), 1);
    assert_eq!(primary[0].side, ColumnSide::Left);
    assert_eq!(page.primary_column().map(|c| c.side), Some(ColumnSide::Left));
}

#[test]
fn test_header() {
    let page = load(true);

    let numbers = page.column_numbers();
    assert_eq!(numbers.left.as_deref(), Some("123"));
    assert_eq!(numbers.right.as_deref(), Some("124"));

    assert_eq!(page.running_head().len(), 2);
    assert_eq!(
        page.running_head_text().as_deref(),
        Some("123 SANCTI BASILII EPISTOLAE 124")
    );

    let header: Vec<String> = page
        .header_lines()
        .into_iter()
        .map(|l| clean(&page, l))
        .collect();
    assert_eq!(header, vec!["123 SANCTI BASILII", "EPISTOLAE 124"]);
}

#[test]
fn test_titles_and_names() {
    let page = load(true);

    let names: Vec<String> = page
        .names_in_titles()
        .into_iter()
        .map(|l| clean(&page, l))
        .collect();
    assert_eq!(names, vec!["SANCTI BASILII"]);

    assert_eq!(page.detect_title_lines().len(), 2);
    assert_eq!(page.titles().len(), 1);
    assert_eq!(page.title_strings(), vec!["EPISTOLA PRIMA."]);

    let name = page.names_in_titles()[0];
    let style = page.line_style(name).unwrap();
    assert_eq!(style.size, 12);
    assert!(style.is_bold());
}

#[test]
fn test_baseline_rows_and_gutters() {
    let page = load(true);

    let rows = page.group_lines_by_baseline(page.options().baseline_tolerance);
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|row| row.len() <= 2));

    let (left, right) = page.group_lines_into_columns();
    // Name and title lines start left of the midline
    assert_eq!(left.len(), 8);
    assert_eq!(right.len(), 6);

    let gutters = page.gutters();
    assert_eq!(gutters.len(), 12);
    assert_eq!(gutters.iter().filter(|&&g| g == 600).count(), 2);
    assert_eq!(gutters.iter().filter(|&&g| g == 120).count(), 10);
}

#[test]
fn test_alignment() {
    let page = load(true);

    let title = line_starting(&page, "EPISTOLA PRIMA");
    let latin = line_starting(&page, "Basilius");
    assert!(!page.aligned_left(title));
    assert!(!page.aligned_right(title));
    assert!(page.aligned_right(latin));
    assert!(!page.aligned_left(latin));

    assert_eq!(page.left_lines().len(), 6);
    assert_eq!(page.right_lines().len(), 6);
    assert_eq!(page.lines_aligned_left(150).len(), 6);
    assert_eq!(page.blocks_aligned_left(150).len(), 2);
}
