//! Uniform call boundary to the extraction backends.
//!
//! The adapter's responsibility is deliberately narrow: invoke the right
//! capability for the resolved method, bound it with the configured timeout,
//! validate the minimal return shape, and tag the result with its page and
//! method. Backend-specific errors are never swallowed or reinterpreted;
//! they propagate as `TafelError::Backend` with the original cause attached.

use crate::types::{ExtractionMethod, RawExtractionResult, RawTable};
use crate::{Result, TafelError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{DigitalTableBackend, ScannedTableBackend};

/// Read-only adapter configuration, fixed for a run.
///
/// The GPU flag only affects the scanned-table capability invocation, never
/// orchestration logic. It is explicit state passed in at construction, not
/// read from the process environment here.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdapterConfig {
    pub use_gpu: bool,
    /// Caller-level timeout per extraction call. `None` waits indefinitely.
    pub unit_timeout: Option<Duration>,
}

/// Normalizing boundary in front of the two extraction capabilities.
pub struct ExtractionAdapter {
    digital: Arc<dyn DigitalTableBackend>,
    scanned: Arc<dyn ScannedTableBackend>,
    config: AdapterConfig,
}

impl ExtractionAdapter {
    pub fn new(
        digital: Arc<dyn DigitalTableBackend>,
        scanned: Arc<dyn ScannedTableBackend>,
        config: AdapterConfig,
    ) -> Self {
        Self {
            digital,
            scanned,
            config,
        }
    }

    /// Invoke the capability for `method` on `page` and return its output
    /// in the provisional shape.
    ///
    /// # Errors
    ///
    /// `TafelError::Backend` when the capability raises, times out, or
    /// returns a structurally invalid payload (a table with zero rows or a
    /// row with zero cells).
    pub async fn extract(&self, page: usize, method: ExtractionMethod) -> Result<RawExtractionResult> {
        let backend_name = match method {
            ExtractionMethod::Digital => self.digital.name().to_string(),
            ExtractionMethod::Scanned => self.scanned.name().to_string(),
        };
        debug!(page, %method, backend = %backend_name, "invoking extraction backend");

        let call = async {
            match method {
                ExtractionMethod::Digital => self.digital.extract_tables(page).await,
                ExtractionMethod::Scanned => self.scanned.extract_tables(page, self.config.use_gpu).await,
            }
        };

        let tables = match self.config.unit_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                TafelError::backend(
                    method,
                    page,
                    format!("backend '{backend_name}' timed out after {limit:?}"),
                )
            })?,
            None => call.await,
        };

        let tables = tables.map_err(|err| wrap_backend_error(err, method, page, &backend_name))?;
        validate_payload(&tables, method, page)?;

        debug!(page, %method, tables = tables.len(), "backend returned");
        Ok(RawExtractionResult { page, method, tables })
    }

    pub fn config(&self) -> AdapterConfig {
        self.config
    }
}

/// Attach method/page context to a backend failure, preserving the cause.
fn wrap_backend_error(err: TafelError, method: ExtractionMethod, page: usize, backend_name: &str) -> TafelError {
    match err {
        // Already tagged by the backend itself; keep its context.
        TafelError::Backend { .. } => err,
        other => TafelError::backend_with_source(
            method,
            page,
            format!("backend '{backend_name}' raised: {other}"),
            other,
        ),
    }
}

/// Reject structurally invalid payloads before they reach normalization.
fn validate_payload(tables: &[RawTable], method: ExtractionMethod, page: usize) -> Result<()> {
    for (i, table) in tables.iter().enumerate() {
        if table.rows.is_empty() {
            return Err(TafelError::backend(
                method,
                page,
                format!("candidate table {i} has zero rows"),
            ));
        }
        if table.rows.iter().any(Vec::is_empty) {
            return Err(TafelError::backend(
                method,
                page,
                format!("candidate table {i} contains an empty row"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedDigital(Vec<RawTable>);

    #[async_trait]
    impl DigitalTableBackend for FixedDigital {
        async fn extract_tables(&self, _page_number: usize) -> Result<Vec<RawTable>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed-digital"
        }
    }

    struct SlowScanned;

    #[async_trait]
    impl ScannedTableBackend for SlowScanned {
        async fn extract_tables(&self, _page_number: usize, _use_gpu: bool) -> Result<Vec<RawTable>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![])
        }

        fn name(&self) -> &str {
            "slow-scanned"
        }
    }

    struct FailingScanned;

    #[async_trait]
    impl ScannedTableBackend for FailingScanned {
        async fn extract_tables(&self, _page_number: usize, _use_gpu: bool) -> Result<Vec<RawTable>> {
            Err(TafelError::Other("engine initialization failed".to_string()))
        }

        fn name(&self) -> &str {
            "failing-scanned"
        }
    }

    fn adapter_with(digital: Vec<RawTable>, config: AdapterConfig) -> ExtractionAdapter {
        ExtractionAdapter::new(Arc::new(FixedDigital(digital)), Arc::new(FailingScanned), config)
    }

    #[tokio::test]
    async fn test_extract_tags_page_and_method() {
        let table = RawTable::new(vec![vec!["a".to_string(), "b".to_string()]]);
        let adapter = adapter_with(vec![table.clone()], AdapterConfig::default());

        let raw = adapter.extract(4, ExtractionMethod::Digital).await.unwrap();
        assert_eq!(raw.page, 4);
        assert_eq!(raw.method, ExtractionMethod::Digital);
        assert_eq!(raw.tables, vec![table]);
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_backend_error_with_cause() {
        let adapter = adapter_with(vec![], AdapterConfig::default());
        let err = adapter.extract(2, ExtractionMethod::Scanned).await.unwrap_err();
        match err {
            TafelError::Backend { method, page, ref source, .. } => {
                assert_eq!(method, ExtractionMethod::Scanned);
                assert_eq!(page, 2);
                assert!(source.is_some(), "original cause must be attached");
            }
            other => panic!("expected Backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_row_table_rejected() {
        let adapter = adapter_with(vec![RawTable::new(vec![])], AdapterConfig::default());
        let err = adapter.extract(1, ExtractionMethod::Digital).await.unwrap_err();
        assert!(matches!(err, TafelError::Backend { .. }));
        assert!(err.to_string().contains("zero rows"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_converted_to_backend_error() {
        let adapter = ExtractionAdapter::new(
            Arc::new(FixedDigital(vec![])),
            Arc::new(SlowScanned),
            AdapterConfig {
                use_gpu: false,
                unit_timeout: Some(Duration::from_millis(50)),
            },
        );
        let err = adapter.extract(1, ExtractionMethod::Scanned).await.unwrap_err();
        assert!(matches!(err, TafelError::Backend { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_empty_result_is_legal() {
        let adapter = adapter_with(vec![], AdapterConfig::default());
        let raw = adapter.extract(1, ExtractionMethod::Digital).await.unwrap();
        assert!(raw.tables.is_empty());
    }
}
