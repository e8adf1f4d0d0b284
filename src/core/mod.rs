//! Orchestration core: page selection, method selection, configuration,
//! and the batch runner.

pub mod config;
pub mod orchestrator;
pub mod pages;
pub mod selector;

pub use config::ExtractionConfig;
pub use orchestrator::{BatchOrchestrator, ExtractionUnit};
pub use pages::PageSelection;
pub use selector::{SelectionPolicy, TextLayerPolicy, select};
