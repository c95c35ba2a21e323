//! Page segmentation and line repair.
//!
//! [`Page`] owns a page's layout tree and answers the layout questions asked
//! of it: margins and print region, baseline rows, reading columns, running
//! head, column numbers and titles. The [`fusion`] module detects and splits
//! lines that the OCR engine read across both columns.

pub mod fusion;
mod options;
mod page;
mod titles;

pub use options::LayoutOptions;
pub use page::Page;
