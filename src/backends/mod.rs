//! External capability boundaries.
//!
//! The engine consumes, and never implements, three pre-built capabilities:
//! digital table extraction, OCR-based table extraction from page rasters,
//! and cheap page inspection for the automatic-mode signal. Each is a trait
//! so callers can wire in whatever engines they have (Camelot-style lattice
//! extraction, PaddleOCR, a cloud OCR service) and tests can wire in mocks.
//!
//! A trait object of each kind is bound to one open document; page numbers
//! are 1-based within that document.
//!
//! # Thread Safety
//!
//! Backends must be `Send + Sync`: the batch orchestrator invokes them
//! concurrently, one unit per task, sharing only the trait object itself.

pub mod adapter;

use crate::Result;
use crate::types::{PageSignal, RawTable};
use async_trait::async_trait;

pub use adapter::{AdapterConfig, ExtractionAdapter};

/// Digital-table extraction capability.
///
/// Given a page with an extractable text layer, returns candidate tables as
/// grids of cell strings, in top-to-bottom reading order. Grids may be
/// jagged; the normalizer repairs them.
#[async_trait]
pub trait DigitalTableBackend: Send + Sync {
    /// # Errors
    ///
    /// Any error the underlying engine raises. The adapter wraps it into
    /// `TafelError::Backend` with the cause attached.
    async fn extract_tables(&self, page_number: usize) -> Result<Vec<RawTable>>;

    fn name(&self) -> &str;
}

/// OCR/scanned-table extraction capability.
///
/// Given a rasterized page, returns candidate tables, typically with a
/// confidence score. `use_gpu` is forwarded configuration; whether it does
/// anything is the engine's concern.
#[async_trait]
pub trait ScannedTableBackend: Send + Sync {
    /// # Errors
    ///
    /// Any error the underlying engine raises. The adapter wraps it into
    /// `TafelError::Backend` with the cause attached.
    async fn extract_tables(&self, page_number: usize, use_gpu: bool) -> Result<Vec<RawTable>>;

    fn name(&self) -> &str;
}

/// Cheap page inspection used only as the automatic-mode signal input.
#[async_trait]
pub trait PageInspector: Send + Sync {
    /// Extractable-text signal for one page.
    async fn signal(&self, page_number: usize) -> Result<PageSignal>;
}
