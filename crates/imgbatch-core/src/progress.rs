use std::path::Path;

/// Trait for reporting per-file progress of a batch run.
///
/// The CLI implements it with indicatif; library callers and tests use
/// [`SilentReporter`]. All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_scan_complete(&self, _candidates: usize) {}
    fn on_file_start(&self, _path: &Path) {}
    fn on_file_success(&self, _source: &Path, _output: &Path) {}
    fn on_file_failure(&self, _source: &Path, _error: &str) {}
    fn on_finish(&self) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
