use crate::sweep::{FileOutcome, SweepResult};
use std::path::Path;

/// Trait for reporting sweep progress.
///
/// The CLI implements this with an indicatif spinner; tests use it to observe
/// ordering. All methods have default no-op implementations.
pub trait SweepReporter {
    fn on_sweep_start(&self, _root: &Path, _extensions: &[String]) {}
    fn on_extension_start(&self, _ext: &str, _file_count: usize) {}
    fn on_file_start(&self, _path: &Path) {}
    /// Called once the backup copy is complete and before the original is
    /// deleted.
    fn on_file_backed_up(&self, _original: &Path, _backup: &Path) {}
    fn on_file_complete(&self, _path: &Path, _outcome: &FileOutcome) {}
    fn on_sweep_complete(&self, _result: &SweepResult) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl SweepReporter for SilentReporter {}
