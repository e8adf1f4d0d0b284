//! Tafel - Table Extraction Orchestration for PDFs
//!
//! Tafel extracts tabular data from heterogeneous PDF corpora, digital and
//! scanned alike, without the caller choosing an extraction technique per
//! document. The crate owns the decision logic, failure isolation, data
//! model, and serialization; the extraction techniques themselves are
//! external capabilities consumed through the [`backends`] traits.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tafel::{
//!     AdapterConfig, BatchOrchestrator, ExtractionAdapter, ExtractionConfig, ExtractionUnit,
//!     PageSelection, TextLayerPolicy, output,
//! };
//!
//! # async fn example(
//! #     digital: Arc<dyn tafel::DigitalTableBackend>,
//! #     scanned: Arc<dyn tafel::ScannedTableBackend>,
//! #     inspector: Arc<dyn tafel::PageInspector>,
//! # ) -> tafel::Result<()> {
//! let config = ExtractionConfig::default();
//! let adapter = Arc::new(ExtractionAdapter::new(
//!     digital,
//!     scanned,
//!     AdapterConfig {
//!         use_gpu: config.use_gpu,
//!         unit_timeout: config.unit_timeout(),
//!     },
//! ));
//! let orchestrator = BatchOrchestrator::new(adapter, inspector, Arc::new(TextLayerPolicy::new()))
//!     .with_max_workers(config.effective_workers());
//!
//! let selection = PageSelection::parse("1,3,5-7")?;
//! let units = ExtractionUnit::for_selection(&selection, 10, config.mode);
//! let report = orchestrator.run(units, true).await;
//!
//! println!("{}", output::render(&report, config.format)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core** ([`core`]): page-range parsing, method selection, batch
//!   orchestration, configuration
//! - **Backends** ([`backends`]): trait boundaries to the external digital
//!   and OCR extraction capabilities, plus the normalizing adapter
//! - **Normalization** ([`normalize`]): provisional output to canonical
//!   rectangular tables
//! - **Output** ([`output`]): deterministic JSON and Markdown rendering,
//!   artifact persistence

#![deny(unsafe_code)]

pub mod backends;
pub mod core;
pub mod error;
pub mod normalize;
pub mod output;
pub mod types;

pub use error::{Result, TafelError};
pub use types::*;

pub use backends::{
    AdapterConfig, DigitalTableBackend, ExtractionAdapter, PageInspector, ScannedTableBackend,
};
pub use core::config::ExtractionConfig;
pub use core::orchestrator::{BatchOrchestrator, ExtractionUnit};
pub use core::pages::PageSelection;
pub use core::selector::{DEFAULT_MIN_TEXT_CHARS, SelectionPolicy, TextLayerPolicy, select};
pub use output::OutputFormat;
