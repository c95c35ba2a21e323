//! Title and name detection.

use crate::model::NodeId;

use super::page::Page;

/// True when `text` has at least one cased character and no lowercase ones.
fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

impl Page {
    /// Upper-case lines centered in the print region, running head excluded.
    pub fn detect_title_lines(&self) -> Vec<NodeId> {
        let Some(region) = self.print_region() else {
            return Vec::new();
        };
        let tolerance = self.options().title_center_tolerance;
        let running_head = self.running_head();

        self.lines()
            .into_iter()
            .filter(|&line| {
                self.tree()
                    .bbox(line)
                    .is_horizontally_centered_within(&region, tolerance)
                    && is_upper(self.line_text(line).trim())
                    && !running_head.contains(&line)
            })
            .collect()
    }

    /// Title lines set in a large bold face.
    pub fn names_in_titles(&self) -> Vec<NodeId> {
        let min_size = self.options().name_min_font_size;
        self.detect_title_lines()
            .into_iter()
            .filter(|&line| {
                self.line_style(line)
                    .is_some_and(|s| s.size > min_size && s.is_bold())
            })
            .collect()
    }

    /// Title lines that are not names.
    pub fn titles(&self) -> Vec<NodeId> {
        let names = self.names_in_titles();
        self.detect_title_lines()
            .into_iter()
            .filter(|line| !names.contains(line))
            .collect()
    }

    /// Group consecutive lines whose vertical gap is less than twice the
    /// height of the later line.
    pub fn cluster_lines(&self, lines: &[NodeId]) -> Vec<Vec<NodeId>> {
        let mut clusters: Vec<Vec<NodeId>> = Vec::new();
        let mut current: Vec<NodeId> = Vec::new();

        for &line in lines {
            if let Some(&prev) = current.last() {
                let bbox = self.tree().bbox(line);
                let gap = bbox.top().saturating_sub(self.tree().bbox(prev).bottom());
                if gap >= bbox.height().saturating_mul(2) {
                    clusters.push(std::mem::take(&mut current));
                }
            }
            current.push(line);
        }
        if !current.is_empty() {
            clusters.push(current);
        }
        clusters
    }

    /// Text of each title cluster, lines joined by a space.
    pub fn title_strings(&self) -> Vec<String> {
        self.cluster_lines(&self.titles())
            .into_iter()
            .map(|cluster| {
                cluster
                    .into_iter()
                    .map(|line| self.line_text(line).trim().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}
