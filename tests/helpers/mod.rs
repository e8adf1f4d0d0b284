//! Shared scripted backends for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tafel::{
    AdapterConfig, BatchOrchestrator, DigitalTableBackend, ExtractionAdapter, PageInspector, PageSignal, RawTable,
    Result, ScannedTableBackend, TafelError, TextLayerPolicy,
};

pub const LETTER_AREA: f64 = 612.0 * 792.0;

pub fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// Digital backend returning scripted tables per page, failing on request.
#[derive(Default)]
pub struct ScriptedDigital {
    pub tables: HashMap<usize, Vec<RawTable>>,
    pub fail_pages: Vec<usize>,
    pub calls: AtomicUsize,
}

impl ScriptedDigital {
    pub fn with_table(page: usize, rows: Vec<Vec<String>>) -> Self {
        let mut tables = HashMap::new();
        tables.insert(page, vec![RawTable::new(rows)]);
        Self {
            tables,
            ..Default::default()
        }
    }
}

#[async_trait]
impl DigitalTableBackend for ScriptedDigital {
    async fn extract_tables(&self, page_number: usize) -> Result<Vec<RawTable>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_pages.contains(&page_number) {
            return Err(TafelError::Other(format!("digital engine rejected page {page_number}")));
        }
        Ok(self.tables.get(&page_number).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted-digital"
    }
}

/// Scanned backend returning scripted tables per page, recording the GPU
/// flag it was handed.
#[derive(Default)]
pub struct ScriptedScanned {
    pub tables: HashMap<usize, Vec<RawTable>>,
    pub fail_pages: Vec<usize>,
    pub calls: AtomicUsize,
    pub gpu_calls: AtomicUsize,
}

#[async_trait]
impl ScannedTableBackend for ScriptedScanned {
    async fn extract_tables(&self, page_number: usize, use_gpu: bool) -> Result<Vec<RawTable>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if use_gpu {
            self.gpu_calls.fetch_add(1, Ordering::SeqCst);
        }
        if self.fail_pages.contains(&page_number) {
            return Err(TafelError::Other(format!("OCR engine crashed on page {page_number}")));
        }
        Ok(self.tables.get(&page_number).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted-scanned"
    }
}

/// Inspector reporting a scripted extractable-character count per page
/// (missing pages read as zero, i.e. scans).
#[derive(Default)]
pub struct ScriptedInspector {
    pub text_chars: HashMap<usize, usize>,
}

impl ScriptedInspector {
    pub fn digital_pages(pages: &[usize]) -> Self {
        Self {
            text_chars: pages.iter().map(|&p| (p, 1_000)).collect(),
        }
    }
}

#[async_trait]
impl PageInspector for ScriptedInspector {
    async fn signal(&self, page_number: usize) -> Result<PageSignal> {
        let chars = self.text_chars.get(&page_number).copied().unwrap_or(0);
        Ok(PageSignal::new(chars, LETTER_AREA))
    }
}

/// Digital backend that panics on one page, as a misbehaving engine would.
pub struct PanickingDigital {
    pub panic_page: usize,
}

#[async_trait]
impl DigitalTableBackend for PanickingDigital {
    async fn extract_tables(&self, page_number: usize) -> Result<Vec<RawTable>> {
        assert_ne!(page_number, self.panic_page, "engine assertion failed on page {page_number}");
        Ok(vec![])
    }

    fn name(&self) -> &str {
        "panicking-digital"
    }
}

/// Scanned backend that stalls long enough to overlap with its neighbors
/// and records the peak number of in-flight calls.
#[derive(Default)]
pub struct ConcurrencyProbe {
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

#[async_trait]
impl ScannedTableBackend for ConcurrencyProbe {
    async fn extract_tables(&self, _page_number: usize, _use_gpu: bool) -> Result<Vec<RawTable>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(25)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![])
    }

    fn name(&self) -> &str {
        "concurrency-probe"
    }
}

pub fn orchestrator(
    digital: Arc<dyn DigitalTableBackend>,
    scanned: Arc<dyn ScannedTableBackend>,
    inspector: Arc<dyn PageInspector>,
    config: AdapterConfig,
) -> BatchOrchestrator {
    let adapter = Arc::new(ExtractionAdapter::new(digital, scanned, config));
    BatchOrchestrator::new(adapter, inspector, Arc::new(TextLayerPolicy::new()))
}
