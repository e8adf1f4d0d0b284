//! Core data model for table extraction.
//!
//! The types here form the contract between the external extraction
//! capabilities, the orchestration engine, and the serializers:
//!
//! - [`RawExtractionResult`] is the provisional shape a backend hands over;
//!   it lives only long enough to be normalized.
//! - [`Table`] is the canonical rectangular grid every backend converges to.
//! - [`ExtractionOutcome`] and [`BatchReport`] carry per-unit success or
//!   failure through to serialization without losing order.

use serde::{Deserialize, Serialize};

/// Requested extraction mode for a run.
///
/// `Auto` is resolved to a concrete [`ExtractionMethod`] per page using the
/// page's extractable-text signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    Digital,
    Scanned,
    Auto,
}

impl std::str::FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "digital" => Ok(ExtractionMode::Digital),
            "scanned" => Ok(ExtractionMode::Scanned),
            "auto" | "automatic" => Ok(ExtractionMode::Auto),
            other => Err(format!("unknown extraction mode: '{other}'")),
        }
    }
}

/// Concrete extraction technique applied to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Digital,
    Scanned,
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionMethod::Digital => write!(f, "digital"),
            ExtractionMethod::Scanned => write!(f, "scanned"),
        }
    }
}

/// Cheap per-page signal consumed by automatic method selection.
///
/// `text_chars` counts characters recoverable via direct text extraction;
/// `page_area` is in square points. Density-based policies divide the two,
/// the default policy only looks at the character count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSignal {
    pub text_chars: usize,
    pub page_area: f64,
}

impl PageSignal {
    pub fn new(text_chars: usize, page_area: f64) -> Self {
        Self { text_chars, page_area }
    }

    /// Extractable characters per square point. Zero for degenerate areas.
    pub fn text_density(&self) -> f64 {
        if self.page_area > 0.0 {
            self.text_chars as f64 / self.page_area
        } else {
            0.0
        }
    }
}

/// One candidate table as returned by a backend, possibly jagged.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
    /// Backend-reported confidence. `None` means the backend does not score
    /// its output, which is distinct from a low score.
    pub confidence: Option<f64>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows, confidence: None }
    }

    pub fn with_confidence(rows: Vec<Vec<String>>, confidence: f64) -> Self {
        Self {
            rows,
            confidence: Some(confidence),
        }
    }
}

/// Provisional extractor output, tagged with its origin.
///
/// Created and owned transiently by the extraction adapter; consumed and
/// discarded by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExtractionResult {
    pub page: usize,
    pub method: ExtractionMethod,
    pub tables: Vec<RawTable>,
}

/// Canonical table: a rectangular grid with provenance.
///
/// Every row has the same cell count; short rows were padded with empty
/// strings during normalization. `index` disambiguates multiple tables on
/// one page, stable in first-detected order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub index: usize,
    pub rows: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub method: ExtractionMethod,
    pub page: usize,
}

impl Table {
    /// Number of columns in the (rectangular) grid.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Why a unit failed, as recorded in its `Failure` outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Backend,
    InvalidRange,
    Other,
}

/// Error details attached to a `Failure` outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeError {
    pub kind: FailureKind,
    pub message: String,
}

/// Tagged result for one processed unit (page).
///
/// Serializes untagged so the JSON artifact carries exactly
/// `{"page": .., "tables": [..]}` for successes and
/// `{"page": .., "error": {..}}` for failures. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    Success { page: usize, tables: Vec<Table> },
    Failure { page: usize, error: OutcomeError },
}

impl ExtractionOutcome {
    pub fn page(&self) -> usize {
        match self {
            ExtractionOutcome::Success { page, .. } | ExtractionOutcome::Failure { page, .. } => *page,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success { .. })
    }
}

/// Terminal artifact of the orchestration core: one outcome per requested
/// unit, in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<ExtractionOutcome>,
}

impl BatchReport {
    pub fn new(outcomes: Vec<ExtractionOutcome>) -> Self {
        Self { outcomes }
    }

    /// Number of successful units. Derived from the outcome sequence so the
    /// counts can never drift from it.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed units. Derived, see [`BatchReport::succeeded`].
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}
