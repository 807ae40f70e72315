use std::collections::BTreeSet;
use std::num::IntErrorKind;
use std::ops::RangeInclusive;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No pages selected")]
    EmptySelection,

    #[error("Page selection may only contain digits, commas, hyphens and spaces: {0:?}")]
    InvalidCharacters(String),

    #[error("Invalid page range: {0:?}")]
    InvalidRangeFormat(String),

    #[error("Range start {start} is after range end {end}")]
    InvalidRangeOrder { start: u32, end: u32 },

    #[error("Invalid page number: {0:?}")]
    InvalidNumber(String),

    #[error("Page {page} is out of range (1-{total})")]
    OutOfBounds { page: u32, total: u32 },
}

/// A single comma-separated token of a page selection, e.g. "7" or "3-5".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRange {
    Single(u32),
    Span { start: u32, end: u32 },
}

impl PageRange {
    /// Parse a token like "5" or "1-5". Only the shape is checked here;
    /// ordering and bounds are checked by [`PageRange::expand`].
    pub fn parse(token: &str) -> Result<Self, SelectionError> {
        let token = token.trim();

        if !token.contains('-') {
            return parse_page_number(token)
                .map(PageRange::Single)
                .ok_or_else(|| SelectionError::InvalidNumber(token.to_string()));
        }

        let bad_format = || SelectionError::InvalidRangeFormat(token.to_string());

        let mut parts = token.split('-');
        let (start, end) = match (parts.next(), parts.next(), parts.next()) {
            (Some(start), Some(end), None) if !start.trim().is_empty() && !end.trim().is_empty() => {
                (start, end)
            }
            _ => return Err(bad_format()),
        };

        let start = parse_page_number(start).ok_or_else(bad_format)?;
        let end = parse_page_number(end).ok_or_else(bad_format)?;
        Ok(PageRange::Span { start, end })
    }

    /// Expand this range into 1-based page numbers, checking order and bounds.
    pub fn expand(&self, total_pages: u32) -> Result<RangeInclusive<u32>, SelectionError> {
        let (start, end) = match *self {
            PageRange::Single(page) => (page, page),
            PageRange::Span { start, end } if start > end => {
                return Err(SelectionError::InvalidRangeOrder { start, end });
            }
            PageRange::Span { start, end } => (start, end),
        };

        if start < 1 {
            return Err(SelectionError::OutOfBounds {
                page: start,
                total: total_pages,
            });
        }
        if end > total_pages {
            return Err(SelectionError::OutOfBounds {
                page: end,
                total: total_pages,
            });
        }

        Ok(start..=end)
    }
}

/// Parse a page number. Digit strings too long for `u32` saturate, since they
/// are past the end of any document and should fail the bounds check.
fn parse_page_number(s: &str) -> Option<u32> {
    match s.trim().parse::<u32>() {
        Ok(n) => Some(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
        Err(_) => None,
    }
}

/// Parse a selection like "1, 3-5, 8" into ascending, unique 1-based page numbers.
///
/// Checks run from cheapest to most specific: the character class of the whole
/// string first, then each token's shape, then each token's order and bounds.
/// The first failing token decides the error.
pub fn parse_selection(selection: &str, total_pages: u32) -> Result<Vec<u32>, SelectionError> {
    if selection.trim().is_empty() {
        return Err(SelectionError::EmptySelection);
    }

    if !selection
        .chars()
        .all(|c| c.is_ascii_digit() || c == ',' || c == '-' || c.is_whitespace())
    {
        return Err(SelectionError::InvalidCharacters(selection.to_string()));
    }

    let mut pages = BTreeSet::new();
    for token in selection.split(',') {
        let range = PageRange::parse(token)?;
        pages.extend(range.expand(total_pages)?);
    }

    if pages.is_empty() {
        return Err(SelectionError::EmptySelection);
    }

    Ok(pages.into_iter().collect())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every accepted selection is strictly ascending and in bounds
        #[test]
        fn accepted_selection_is_sorted_unique_in_bounds(
            total in 1u32..200,
            tokens in prop::collection::vec((1u32..200, 0u32..20, any::<bool>()), 1..8)
        ) {
            let selection: Vec<String> = tokens
                .iter()
                .map(|&(start, len, is_span)| {
                    if is_span {
                        format!("{}-{}", start, start + len)
                    } else {
                        start.to_string()
                    }
                })
                .collect();
            let selection = selection.join(",");

            if let Ok(pages) = parse_selection(&selection, total) {
                prop_assert!(!pages.is_empty());
                prop_assert!(pages.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(pages.iter().all(|&p| p >= 1 && p <= total));
            }
        }

        /// Property: every in-bounds token is fully covered by the result
        #[test]
        fn in_bounds_tokens_are_all_selected(
            total in 1u32..100,
            starts in prop::collection::vec(1u32..100, 1..6)
        ) {
            let starts: Vec<u32> = starts.into_iter().map(|s| (s % total) + 1).collect();
            let selection: Vec<String> = starts.iter().map(|s| format!("{}-{}", s, total)).collect();

            let pages = parse_selection(&selection.join(" , "), total).unwrap();
            let lowest = *starts.iter().min().unwrap();
            prop_assert_eq!(pages, (lowest..=total).collect::<Vec<_>>());
        }

        /// Property: the parser never panics on arbitrary text
        #[test]
        fn parse_never_panics(input in ".{0,40}", total in 1u32..1000) {
            let _ = parse_selection(&input, total);
        }
    }
}
