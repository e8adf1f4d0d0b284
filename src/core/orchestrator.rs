//! Batch orchestration.
//!
//! Fans extraction across units (pages), isolating failures per unit:
//! partial failure is a normal outcome, not a fatal condition. One unit's
//! failure never prevents processing of the remaining units, and the report
//! always preserves request order regardless of completion order under
//! parallel execution.

use crate::backends::{ExtractionAdapter, PageInspector};
use crate::core::pages::PageSelection;
use crate::core::selector::{self, SelectionPolicy};
use crate::normalize;
use crate::types::{
    BatchReport, ExtractionMethod, ExtractionMode, ExtractionOutcome, FailureKind, OutcomeError, Table,
};
use crate::{Result, TafelError};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Global Tokio runtime backing the synchronous wrappers.
///
/// Lazily initialized on first use and shared across all sync calls; if the
/// runtime cannot be created the process is already resource-starved and
/// nothing else will work either.
static GLOBAL_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create global Tokio runtime - system may be out of resources")
});

/// One unit of work: a page and the mode requested for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionUnit {
    pub page: usize,
    pub mode: ExtractionMode,
}

impl ExtractionUnit {
    pub fn new(page: usize, mode: ExtractionMode) -> Self {
        Self { page, mode }
    }

    /// Expand a page selection into units, one per resolved page, in
    /// ascending page order.
    pub fn for_selection(selection: &PageSelection, page_count: usize, mode: ExtractionMode) -> Vec<Self> {
        selection
            .resolve(page_count)
            .into_iter()
            .map(|page| Self::new(page, mode))
            .collect()
    }
}

/// Runs the per-unit pipeline (select -> extract -> normalize) across a
/// batch of units.
///
/// Cheap to clone; all state is shared read-only behind `Arc`.
#[derive(Clone)]
pub struct BatchOrchestrator {
    adapter: Arc<ExtractionAdapter>,
    inspector: Arc<dyn PageInspector>,
    policy: Arc<dyn SelectionPolicy>,
    max_workers: usize,
}

impl BatchOrchestrator {
    pub fn new(
        adapter: Arc<ExtractionAdapter>,
        inspector: Arc<dyn PageInspector>,
        policy: Arc<dyn SelectionPolicy>,
    ) -> Self {
        Self {
            adapter,
            inspector,
            policy,
            max_workers: num_cpus::get() * 2,
        }
    }

    /// Bound the worker pool for parallel runs. Values below 1 are clamped
    /// to 1.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Process every unit and collect one outcome per unit, in request
    /// order.
    ///
    /// When `parallel` is true, units execute concurrently up to the worker
    /// bound; otherwise strictly sequentially. Both paths produce identical
    /// reports. Outcomes are written into a pre-sized, index-addressed
    /// buffer, so ordering holds independent of completion order. Every
    /// unit runs inside its own task in both paths, so a unit whose
    /// backend panics is recorded as a `Failure` with kind `other` and
    /// never aborts the batch.
    pub async fn run(&self, units: Vec<ExtractionUnit>, parallel: bool) -> BatchReport {
        debug!(units = units.len(), parallel, "starting batch");
        if units.is_empty() {
            return BatchReport::new(vec![]);
        }

        if !parallel {
            let mut outcomes = Vec::with_capacity(units.len());
            for unit in units {
                let this = self.clone();
                let handle = tokio::spawn(async move { this.outcome_for(unit).await });
                outcomes.push(joined_outcome(unit.page, handle.await));
            }
            return BatchReport::new(outcomes);
        }

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut handles = Vec::with_capacity(units.len());
        for unit in units {
            let this = self.clone();
            let semaphore = Arc::clone(&semaphore);
            handles.push((
                unit.page,
                tokio::spawn(async move {
                    let _permit = semaphore.acquire().await.expect("worker semaphore is never closed");
                    this.outcome_for(unit).await
                }),
            ));
        }

        let mut outcomes: Vec<Option<ExtractionOutcome>> = vec![None; handles.len()];
        for (slot, (page, handle)) in handles.into_iter().enumerate() {
            outcomes[slot] = Some(joined_outcome(page, handle.await));
        }

        // Every slot was written exactly once above.
        #[allow(clippy::unwrap_used)]
        BatchReport::new(outcomes.into_iter().map(|o| o.unwrap()).collect())
    }

    /// Synchronous wrapper over [`BatchOrchestrator::run`] on the global
    /// runtime.
    pub fn run_sync(&self, units: Vec<ExtractionUnit>, parallel: bool) -> BatchReport {
        GLOBAL_RUNTIME.block_on(self.run(units, parallel))
    }

    /// Run one unit's pipeline, converting every error into a `Failure`
    /// outcome so it never crosses the batch boundary.
    async fn outcome_for(&self, unit: ExtractionUnit) -> ExtractionOutcome {
        match self.process_unit(unit).await {
            Ok(tables) => ExtractionOutcome::Success {
                page: unit.page,
                tables,
            },
            Err(err) => {
                warn!(page = unit.page, error = %err, "unit failed");
                failure_outcome(unit.page, &err)
            }
        }
    }

    async fn process_unit(&self, unit: ExtractionUnit) -> Result<Vec<Table>> {
        let method = match unit.mode {
            ExtractionMode::Digital => ExtractionMethod::Digital,
            ExtractionMode::Scanned => ExtractionMethod::Scanned,
            ExtractionMode::Auto => {
                let signal = self.inspector.signal(unit.page).await?;
                selector::select(unit.mode, &signal, self.policy.as_ref())
            }
        };
        let raw = self.adapter.extract(unit.page, method).await?;
        Ok(normalize::normalize(raw))
    }
}

/// Unwrap a joined unit task, converting a panic into a `Failure` outcome
/// for that unit's slot.
///
/// The message is built from the panic payload, not the `JoinError`
/// display, which embeds a run-dependent task id and would make otherwise
/// identical reports differ between executions.
fn joined_outcome(
    page: usize,
    joined: std::result::Result<ExtractionOutcome, tokio::task::JoinError>,
) -> ExtractionOutcome {
    match joined {
        Ok(outcome) => outcome,
        Err(join_err) => {
            warn!(page, error = %join_err, "unit task did not complete");
            let message = match join_err.try_into_panic() {
                Ok(payload) => {
                    let detail = payload
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "opaque panic payload".to_string());
                    format!("unit task panicked: {detail}")
                }
                Err(_) => "unit task was cancelled".to_string(),
            };
            ExtractionOutcome::Failure {
                page,
                error: OutcomeError {
                    kind: FailureKind::Other,
                    message,
                },
            }
        }
    }
}

fn failure_outcome(page: usize, err: &TafelError) -> ExtractionOutcome {
    let kind = match err {
        TafelError::Backend { .. } => FailureKind::Backend,
        TafelError::InvalidRange { .. } => FailureKind::InvalidRange,
        _ => FailureKind::Other,
    };
    ExtractionOutcome::Failure {
        page,
        error: OutcomeError {
            kind,
            message: err.to_string(),
        },
    }
}
