//! Run configuration.
//!
//! One serde-derived structure holds everything a run shares read-only
//! across units: mode, output format, GPU toggle, parallelism bound, and
//! the per-unit timeout. It can be loaded from a TOML file or built
//! programmatically; nothing in the engine reads the process environment
//! behind the caller's back. Callers that want the conventional environment
//! toggle call [`ExtractionConfig::from_env`] once at startup.

use crate::output::OutputFormat;
use crate::types::ExtractionMode;
use crate::{Result, TafelError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable enabling GPU-accelerated OCR, read only by
/// [`ExtractionConfig::from_env`].
pub const GPU_ENV_VAR: &str = "TAFEL_USE_GPU";

/// Main run configuration.
///
/// # Example
///
/// ```rust
/// use tafel::ExtractionConfig;
///
/// let config = ExtractionConfig::default();
/// assert!(!config.use_gpu);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Requested extraction mode; `auto` resolves per page.
    #[serde(default = "default_mode")]
    pub mode: ExtractionMode,

    /// Output artifact format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Forwarded to the scanned-table capability; affects nothing else.
    #[serde(default)]
    pub use_gpu: bool,

    /// Maximum concurrent units in parallel runs (None = num_cpus * 2).
    #[serde(default)]
    pub max_concurrent_units: Option<usize>,

    /// Per-unit extraction timeout in seconds (None = wait indefinitely).
    #[serde(default)]
    pub unit_timeout_secs: Option<u64>,

    /// Automatic-mode threshold: minimum extractable characters for a page
    /// to count as digital.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,

    /// Directory artifacts are written under (None = alongside the source).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_mode() -> ExtractionMode {
    ExtractionMode::Auto
}

fn default_min_text_chars() -> usize {
    crate::core::selector::DEFAULT_MIN_TEXT_CHARS
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            format: OutputFormat::default(),
            use_gpu: false,
            max_concurrent_units: None,
            unit_timeout_secs: None,
            min_text_chars: default_min_text_chars(),
            output_dir: None,
        }
    }
}

impl ExtractionConfig {
    /// Defaults with the GPU toggle taken from `TAFEL_USE_GPU`.
    ///
    /// The environment is read exactly once, here; the resulting value
    /// travels as explicit configuration from then on.
    pub fn from_env() -> Self {
        let use_gpu = std::env::var(GPU_ENV_VAR)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        Self {
            use_gpu,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// `TafelError::Io` when the file cannot be read,
    /// `TafelError::Validation` when it is not valid TOML or fails
    /// [`ExtractionConfig::validate`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| TafelError::validation(format!("invalid config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no run can honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_units == Some(0) {
            return Err(TafelError::validation("max_concurrent_units must be at least 1"));
        }
        if self.unit_timeout_secs == Some(0) {
            return Err(TafelError::validation("unit_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Effective worker bound for parallel runs.
    pub fn effective_workers(&self) -> usize {
        self.max_concurrent_units.unwrap_or_else(|| num_cpus::get() * 2)
    }

    /// Per-unit timeout as a `Duration`.
    pub fn unit_timeout(&self) -> Option<Duration> {
        self.unit_timeout_secs.map(Duration::from_secs)
    }
}
