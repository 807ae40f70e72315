//! Split a PDF into one document per page.
//!
//! [`selection::parse_selection`] turns a selection like `"1,3-5,8"` into page
//! numbers, and [`split::Splitter`] extracts those pages one at a time while
//! reporting progress.

pub mod pdf;
pub mod selection;
pub mod split;

pub use pdf::{LoadOptions, PageSource, PdfDocument};
pub use selection::{parse_selection, SelectionError};
pub use split::{
    ErrorKind, PageOutcome, PageResult, PageStatus, ProgressSink, ProgressSnapshot, SplitError,
    Splitter, Stage,
};
