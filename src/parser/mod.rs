//! hOCR parsing module.

mod hocr;
mod markup;
mod options;

pub use hocr::{parse_page, HocrParser};
pub use markup::normalize_markup;
pub use options::{ErrorMode, PageSelection, ParseOptions};
