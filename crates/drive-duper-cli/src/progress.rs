use colored::*;
use drive_duper_core::{FileOutcome, SweepReporter, SweepResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// The spinner currently on screen, if any. Shared between the reporter that
/// drives it and the stdout log layer, which hides it while writing a line.
#[derive(Clone, Default)]
pub struct SharedBar(Arc<Mutex<Option<ProgressBar>>>);

impl SharedBar {
    fn current(&self) -> Option<ProgressBar> {
        self.0.lock().ok().and_then(|guard| guard.clone())
    }

    fn replace(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.0.lock() {
            if let Some(old) = guard.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn finish(&self) {
        if let Ok(mut guard) = self.0.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

/// Stdout writer that suspends the spinner around each log line.
pub struct BarWriter {
    bar: Option<ProgressBar>,
}

impl Write for BarWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.bar {
            Some(pb) => pb.suspend(|| io::stdout().write_all(buf))?,
            None => io::stdout().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

impl<'a> MakeWriter<'a> for SharedBar {
    type Writer = BarWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BarWriter {
            bar: self.current(),
        }
    }
}

/// CLI progress reporter: a single spinner showing the file being checked and
/// a running count of outcomes.
pub struct CliReporter {
    bar: SharedBar,
}

impl CliReporter {
    pub fn new(bar: SharedBar) -> Self {
        Self { bar }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Some(pb) = self.bar.current() {
            f(&pb);
        }
    }
}

impl SweepReporter for CliReporter {
    fn on_sweep_start(&self, root: &Path, extensions: &[String]) {
        let style = ProgressStyle::with_template("{spinner:.cyan} [{pos} checked] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb.set_message(format!(
            "Sweeping {} ({} extensions)",
            root.display(),
            extensions.len()
        ));
        pb.enable_steady_tick(Duration::from_millis(80));

        self.bar.replace(pb);
    }

    fn on_extension_start(&self, ext: &str, file_count: usize) {
        self.with_bar(|pb| pb.set_message(format!("*.{}: {} file(s)", ext, file_count)));
    }

    fn on_file_start(&self, path: &Path) {
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.with_bar(|pb| pb.set_message(format!("Checking {}", name)));
    }

    fn on_file_complete(&self, _path: &Path, _outcome: &FileOutcome) {
        self.with_bar(|pb| pb.inc(1));
    }

    fn on_sweep_complete(&self, result: &SweepResult) {
        self.bar.finish();
        eprintln!(
            "  {} Sweep complete: {} files in {:.2}s",
            "✓".green(),
            result.files_checked,
            result.duration.as_secs_f64()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sees_bar_only_while_sweeping() {
        let shared = SharedBar::default();
        let reporter = CliReporter::new(shared.clone());
        assert!(shared.make_writer().bar.is_none());

        reporter.on_sweep_start(Path::new("/photos"), &["jpg".to_string()]);
        assert!(shared.make_writer().bar.is_some());

        reporter.on_sweep_complete(&SweepResult::default());
        assert!(shared.make_writer().bar.is_none());
    }

    #[test]
    fn test_writer_reports_full_length() {
        let mut writer = SharedBar::default().make_writer();
        assert_eq!(writer.write(b"line\n").unwrap(), 5);
    }
}
