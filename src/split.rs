//! Page-by-page split pipeline
//!
//! [`Splitter`] turns a loaded document and an optional page selection into a
//! lazy sequence of [`PageOutcome`]s. Each call to `next()` extracts exactly one
//! page, so at most one page's serialized bytes are held by the pipeline at a
//! time. Progress is reported to a [`ProgressSink`] in lockstep with the
//! outcomes.
//!
//! Failures come in two tiers:
//! - request-level ([`SplitError`]): the document could not be loaded or the
//!   selection is invalid. Returned from [`Splitter::new`] before any page is
//!   touched.
//! - page-level: one page could not be copied or serialized. Recorded as a
//!   [`PageResult::Error`] outcome and the pipeline moves on.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::pdf::PageSource;
use crate::selection::{parse_selection, SelectionError};

#[derive(Error, Debug)]
pub enum SplitError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Failed to load PDF: {0}")]
    PdfLoad(String),
}

/// Symbolic error kind, for callers that format their own messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    EmptySelection,
    InvalidCharacters,
    InvalidRangeFormat,
    InvalidRangeOrder,
    InvalidNumber,
    OutOfBounds,
    PdfLoadFailure,
}

impl SplitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SplitError::PdfLoad(_) => ErrorKind::PdfLoadFailure,
            SplitError::Selection(e) => match e {
                SelectionError::EmptySelection => ErrorKind::EmptySelection,
                SelectionError::InvalidCharacters(_) => ErrorKind::InvalidCharacters,
                SelectionError::InvalidRangeFormat(_) => ErrorKind::InvalidRangeFormat,
                SelectionError::InvalidRangeOrder { .. } => ErrorKind::InvalidRangeOrder,
                SelectionError::InvalidNumber(_) => ErrorKind::InvalidNumber,
                SelectionError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Nothing has happened yet. Never emitted by the pipeline.
    #[default]
    Queued,
    Analyzing,
    Splitting,
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub stage: Stage,
    /// Percentage, 0 to 100.
    pub overall_progress: f64,
    pub processed_pages: u32,
    /// Number of pages selected for extraction, not the document's page count.
    pub total_pages: u32,
}

pub trait ProgressSink {
    fn report(&mut self, snapshot: ProgressSnapshot);
}

impl<F: FnMut(ProgressSnapshot)> ProgressSink for F {
    fn report(&mut self, snapshot: ProgressSnapshot) {
        self(snapshot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult {
    Ok { bytes: Vec<u8> },
    Error { message: String },
}

/// Terminal result for one selected page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    /// 1-based page number in the source document.
    pub page_number: u32,
    pub result: PageResult,
}

impl PageOutcome {
    pub fn status(&self) -> PageStatus {
        match self.result {
            PageResult::Ok { .. } => PageStatus::Ok,
            PageResult::Error { .. } => PageStatus::Error,
        }
    }

    /// Byte length of the single-page document, or 0 on error.
    pub fn final_size(&self) -> usize {
        self.artifact().map_or(0, <[u8]>::len)
    }

    pub fn artifact(&self) -> Option<&[u8]> {
        match &self.result {
            PageResult::Ok { bytes } => Some(bytes),
            PageResult::Error { .. } => None,
        }
    }

    /// Why extraction failed, for ERROR outcomes.
    pub fn error(&self) -> Option<&str> {
        match &self.result {
            PageResult::Ok { .. } => None,
            PageResult::Error { message } => Some(message),
        }
    }

    pub fn into_artifact(self) -> Option<Vec<u8>> {
        match self.result {
            PageResult::Ok { bytes } => Some(bytes),
            PageResult::Error { .. } => None,
        }
    }
}

const ANALYZING_PROGRESS: f64 = 5.0;
const SPLITTING_PROGRESS: f64 = 10.0;

/// Lazy, forward-only split of a document into single-page documents.
///
/// Dropping the splitter between outcomes cancels the remaining work.
pub struct Splitter<D, P> {
    source: D,
    sink: P,
    targets: std::vec::IntoIter<u32>,
    total: u32,
    processed: u32,
    done: bool,
}

impl<D: PageSource, P: ProgressSink> Splitter<D, P> {
    /// Analyze the document and resolve the selection. Without a selection every
    /// page is targeted, in document order.
    pub fn new(source: D, mut sink: P, selection: Option<&str>) -> Result<Self, SplitError> {
        sink.report(ProgressSnapshot {
            stage: Stage::Analyzing,
            overall_progress: ANALYZING_PROGRESS,
            processed_pages: 0,
            total_pages: 0,
        });

        let page_count = source.page_count();
        let targets: Vec<u32> = match selection {
            Some(selection) => parse_selection(selection, page_count)?
                .into_iter()
                .map(|page| page - 1)
                .collect(),
            None => (0..page_count).collect(),
        };
        let total = targets.len() as u32;

        info!(page_count, selected = total, "starting split");
        sink.report(ProgressSnapshot {
            stage: Stage::Splitting,
            overall_progress: SPLITTING_PROGRESS,
            processed_pages: 0,
            total_pages: total,
        });

        Ok(Splitter {
            source,
            sink,
            targets: targets.into_iter(),
            total,
            processed: 0,
            done: false,
        })
    }

    /// Number of pages this run will produce outcomes for.
    pub fn total_pages(&self) -> u32 {
        self.total
    }

    fn extract(&self, index: u32) -> PageOutcome {
        let page_number = index + 1;
        let result = match self.source.extract_page(index) {
            Ok(bytes) => PageResult::Ok { bytes },
            Err(e) => {
                warn!(page = page_number, error = %e, "failed to extract page");
                PageResult::Error {
                    message: format!("{:#}", e),
                }
            }
        };
        PageOutcome {
            page_number,
            result,
        }
    }
}

impl<D: PageSource, P: ProgressSink> Iterator for Splitter<D, P> {
    type Item = PageOutcome;

    fn next(&mut self) -> Option<PageOutcome> {
        let Some(index) = self.targets.next() else {
            if !self.done {
                self.done = true;
                info!(processed = self.processed, "split finished");
                self.sink.report(ProgressSnapshot {
                    stage: Stage::Done,
                    overall_progress: 100.0,
                    processed_pages: self.processed,
                    total_pages: self.total,
                });
            }
            return None;
        };

        let outcome = self.extract(index);
        self.processed += 1;

        let overall_progress = SPLITTING_PROGRESS
            + (100.0 - SPLITTING_PROGRESS) * f64::from(self.processed) / f64::from(self.total);
        debug!(
            page = outcome.page_number,
            size = outcome.final_size(),
            progress = overall_progress,
            "page processed"
        );
        self.sink.report(ProgressSnapshot {
            stage: Stage::Splitting,
            overall_progress,
            processed_pages: self.processed,
            total_pages: self.total,
        });

        Some(outcome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.targets.size_hint()
    }
}

impl<D: PageSource, P: ProgressSink> std::iter::FusedIterator for Splitter<D, P> {}
