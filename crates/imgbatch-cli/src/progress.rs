use colored::*;
use imgbatch_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::Path;

/// Which tool is reporting; decides the per-file line format.
#[derive(Debug, Clone, Copy)]
pub enum ReportStyle {
    Convert,
    Crop,
    Rename,
}

/// CLI progress reporter: an indicatif bar over the candidate count, with
/// one line per file printed above it.
pub struct CliReporter {
    style: ReportStyle,
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new(style: ReportStyle) -> Self {
        Self {
            style,
            bar: RefCell::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Some(old) = self.bar.replace(Some(pb)) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }

    fn println(&self, line: String) {
        match self.bar.borrow().as_ref() {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }

    fn advance(&self) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.inc(1);
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_complete(&self, candidates: usize) {
        let pb = ProgressBar::new(candidates as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} [{bar:30.cyan/dim}] {pos}/{len} {wide_msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_file_start(&self, path: &Path) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            pb.set_message(name);
        }
    }

    fn on_file_success(&self, source: &Path, output: &Path) {
        let line = match self.style {
            ReportStyle::Convert => format!("{} {}", "[OK]".green(), source.display()),
            ReportStyle::Crop => format!("{} {}", "Processed:".green(), source.display()),
            ReportStyle::Rename => format!(
                "{} -> {}",
                file_name(source),
                file_name(output).bold()
            ),
        };
        self.println(line);
        self.advance();
    }

    fn on_file_failure(&self, source: &Path, error: &str) {
        let line = match self.style {
            ReportStyle::Convert => format!("{} {} -> {}", "[FAIL]".red(), source.display(), error),
            ReportStyle::Crop | ReportStyle::Rename => format!(
                "{} {}: {}",
                "Error processing".red(),
                source.display(),
                error
            ),
        };
        self.println(line);
        self.advance();
    }

    fn on_finish(&self) {
        self.finish_bar();
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
