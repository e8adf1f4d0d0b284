//! Page-selection parsing.
//!
//! Turns a CLI-facing selection expression (`"1,3,5-7"` or `"all"`) into an
//! ordered set of distinct 1-based page numbers. Parsing is a pure function
//! of the input string; resolving `all` against an actual page count happens
//! later via [`PageSelection::resolve`].

use crate::{Result, TafelError};
use std::collections::BTreeSet;

/// An ordered set of distinct positive page numbers, or every page in the
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelection {
    /// Every page; resolved against the document's page count.
    All,
    /// Explicit pages, strictly ascending, deduplicated, all >= 1.
    Pages(Vec<usize>),
}

impl PageSelection {
    /// Parse a comma-separated selection expression.
    ///
    /// Each token is an integer literal, an `a-b` range (inclusive, `a <= b`),
    /// or the literal `all` (case-insensitive, only valid on its own). The
    /// result is the deduplicated ascending union of all tokens.
    ///
    /// # Errors
    ///
    /// `TafelError::InvalidRange` when a token is not an integer or a
    /// well-formed range, when `a > b`, or when any value is below 1.
    pub fn parse(expr: &str) -> Result<Self> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(TafelError::invalid_range("empty page selection"));
        }
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let mut pages = BTreeSet::new();
        for token in trimmed.split(',') {
            let token = token.trim();
            match token.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page_number(start)?;
                    let end = parse_page_number(end)?;
                    if start > end {
                        return Err(TafelError::invalid_range(format!(
                            "descending range '{token}': {start} > {end}"
                        )));
                    }
                    pages.extend(start..=end);
                }
                None => {
                    pages.insert(parse_page_number(token)?);
                }
            }
        }

        Ok(PageSelection::Pages(pages.into_iter().collect()))
    }

    /// Expand the selection against a document's page count.
    ///
    /// `All` becomes `1..=page_count`; explicit pages outside the document
    /// are dropped. The result keeps ascending order.
    pub fn resolve(&self, page_count: usize) -> Vec<usize> {
        match self {
            PageSelection::All => (1..=page_count).collect(),
            PageSelection::Pages(pages) => pages.iter().copied().filter(|&p| p <= page_count).collect(),
        }
    }
}

impl std::fmt::Display for PageSelection {
    /// Canonical string form: `all`, or the ascending comma-joined page list.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageSelection::All => write!(f, "all"),
            PageSelection::Pages(pages) => {
                let joined = pages.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
                write!(f, "{joined}")
            }
        }
    }
}

fn parse_page_number(token: &str) -> Result<usize> {
    let token = token.trim();
    let value: usize = token
        .parse()
        .map_err(|_| TafelError::invalid_range(format!("token '{token}' is not a page number")))?;
    if value < 1 {
        return Err(TafelError::invalid_range(format!(
            "page numbers are 1-based, got {value}"
        )));
    }
    Ok(value)
}
