//! Per-page method selection.
//!
//! An explicit mode is an override and is returned unchanged. Automatic mode
//! consults one cheap signal, the page's extractable-text layer, through an
//! injectable [`SelectionPolicy`] so the threshold stays independently
//! testable and tunable.

use crate::types::{ExtractionMethod, ExtractionMode, PageSignal};

/// Minimum extractable characters for a page to count as digital.
///
/// Pages below this are treated as scans. Tunable via
/// [`TextLayerPolicy::with_min_chars`].
pub const DEFAULT_MIN_TEXT_CHARS: usize = 20;

/// Strategy deciding which technique to apply to a page in automatic mode.
///
/// Implementations must be monotone in the signal: more extractable text
/// never flips a page from digital to scanned.
pub trait SelectionPolicy: Send + Sync {
    fn choose(&self, signal: &PageSignal) -> ExtractionMethod;
}

/// Default policy: a page with a non-trivial extractable text layer is
/// digital, everything else goes through OCR.
#[derive(Debug, Clone, Copy)]
pub struct TextLayerPolicy {
    min_text_chars: usize,
}

impl TextLayerPolicy {
    pub fn new() -> Self {
        Self {
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
        }
    }

    pub fn with_min_chars(min_text_chars: usize) -> Self {
        Self { min_text_chars }
    }
}

impl Default for TextLayerPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionPolicy for TextLayerPolicy {
    fn choose(&self, signal: &PageSignal) -> ExtractionMethod {
        if signal.text_chars >= self.min_text_chars {
            ExtractionMethod::Digital
        } else {
            ExtractionMethod::Scanned
        }
    }
}

/// Resolve the technique for one page.
///
/// `Digital` and `Scanned` pass through without inspecting the signal;
/// `Auto` delegates to the policy. Pure decision function, never touches
/// the PDF itself.
pub fn select(mode: ExtractionMode, signal: &PageSignal, policy: &dyn SelectionPolicy) -> ExtractionMethod {
    match mode {
        ExtractionMode::Digital => ExtractionMethod::Digital,
        ExtractionMode::Scanned => ExtractionMethod::Scanned,
        ExtractionMode::Auto => policy.choose(signal),
    }
}
