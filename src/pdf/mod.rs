pub mod document;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::{LoadOptions, PdfDocument};

/// Read-only access to a loaded document, as consumed by the split pipeline.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Build a standalone single-page document from the page at the 0-based
    /// `index` and serialize it.
    fn extract_page(&self, index: u32) -> anyhow::Result<Vec<u8>>;
}

impl<T: PageSource + ?Sized> PageSource for &T {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn extract_page(&self, index: u32) -> anyhow::Result<Vec<u8>> {
        (**self).extract_page(index)
    }
}
