use anyhow::{Context, Result};
use lopdf::Document;
use std::path::Path;

use super::PageSource;
use crate::split::SplitError;

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Accept documents that carry an `/Encrypt` dictionary, as long as lopdf
    /// can open them without a password.
    pub ignore_encryption: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            ignore_encryption: true,
        }
    }
}

pub struct PdfDocument {
    doc: Document,
    // Page numbers of a loaded document are always 1..=page_count.
    page_count: u32,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self, SplitError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| SplitError::PdfLoad(format!("{}: {}", path.display(), e)))?;
        Self::load_mem(&bytes, options)
    }

    pub fn load_mem(bytes: &[u8], options: LoadOptions) -> Result<Self, SplitError> {
        let doc = Document::load_mem(bytes).map_err(|e| SplitError::PdfLoad(e.to_string()))?;

        if doc.is_encrypted() {
            // lopdf only warns when the empty password is rejected and hands back
            // a document with no objects, so check for that explicitly.
            if doc.encryption_state.is_none() {
                return Err(SplitError::PdfLoad("document requires a password".into()));
            }
            if !options.ignore_encryption {
                return Err(SplitError::PdfLoad("document is encrypted".into()));
            }
        }

        let page_count = doc.get_pages().len() as u32;
        Ok(PdfDocument { doc, page_count })
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn extract_page(&self, index: u32) -> Result<Vec<u8>> {
        let total = self.page_count;
        if index >= total {
            anyhow::bail!("Page index {} is out of range (0-{})", index, total.saturating_sub(1));
        }
        let keep = index + 1;

        // TODO: copy only the objects reachable from the kept page instead of
        // cloning the whole document for every page.
        let mut new_doc = self.doc.clone();

        let pages_to_delete: Vec<u32> = (1..=total).filter(|&num| num != keep).collect();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }

        // lopdf hands us decrypted objects; don't claim otherwise in the output.
        new_doc.trailer.remove(b"Encrypt");
        new_doc.encryption_state = None;
        new_doc.prune_objects();

        let mut buffer = Vec::new();
        new_doc
            .save_to(&mut buffer)
            .with_context(|| format!("Failed to serialize page {}", keep))?;

        Ok(buffer)
    }
}
