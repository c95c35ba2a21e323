//! Volumes: ordered collections of hOCR pages.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::layout::Page;
use crate::parser::{parse_page, ParseOptions};

/// File extensions read as hOCR pages.
const PAGE_EXTENSIONS: &[&str] = &["html", "xhtml", "hocr"];

/// A scanned volume, one [`Page`] per page file.
#[derive(Debug, Clone, Default)]
pub struct Volume {
    name: String,
    pages: Vec<Page>,
}

impl Volume {
    /// Create an empty volume.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
        }
    }

    /// Create a volume from pages already built.
    pub fn from_pages(name: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// Load every page file of a directory.
    ///
    /// Files are taken in file-name order and numbered from 1 in that order;
    /// `options.pages` selects among those numbers. Pages are parsed in
    /// parallel when `options.parallel` is set. In lenient mode a page that
    /// fails to load is skipped with a warning.
    pub fn from_dir<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let selected: Vec<(u32, PathBuf)> = Self::page_files(path)?
            .into_iter()
            .zip(1u32..)
            .map(|(file, number)| (number, file))
            .filter(|(number, _)| options.pages.includes(*number))
            .collect();

        log::info!(
            "Loading {} page(s) of volume '{}' from {}",
            selected.len(),
            name,
            path.display()
        );

        let load = |(number, file): &(u32, PathBuf)| -> Result<Option<Page>> {
            match load_page(file, *number, options) {
                Ok(page) => Ok(Some(page)),
                Err(e) if options.is_lenient() => {
                    log::warn!("Skipping page {} ({}): {}", number, file.display(), e);
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        };

        let results: Vec<Result<Option<Page>>> = if options.parallel {
            selected.par_iter().map(load).collect()
        } else {
            selected.iter().map(load).collect()
        };

        let mut pages = Vec::with_capacity(results.len());
        for result in results {
            if let Some(page) = result? {
                pages.push(page);
            }
        }

        Ok(Self { name, pages })
    }

    /// Page files of a directory, sorted by file name.
    pub fn page_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::Other(format!("{} is not a directory", dir.display())));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_page = path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| PAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if is_page {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    /// The page numbered `number`.
    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number() == number)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Repair fused lines on every page, in parallel. Returns the total repaired.
    pub fn repair_fused_lines(&mut self) -> Result<usize> {
        self.pages
            .par_iter_mut()
            .map(Page::repair_fused_lines)
            .try_reduce(|| 0, |a, b| Ok(a + b))
    }
}

fn load_page(file: &Path, number: u32, options: &ParseOptions) -> Result<Page> {
    let markup = fs::read_to_string(file)?;
    parse_page(&markup, number, options)
}
