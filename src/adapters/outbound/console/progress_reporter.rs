use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::cell::RefCell;

const BAR_TEMPLATE: &str = "   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} projects - {msg}";

/// StderrProgressReporter adapter for reporting scan progress to stderr
///
/// Keeps stdout free for the JSON report. A single indicatif bar tracks
/// multi-project scans; it is created on the first progress update and
/// cleared before any plain message is printed. In quiet mode only errors
/// are printed.
pub struct StderrProgressReporter {
    progress_bar: RefCell<Option<ProgressBar>>,
    quiet: bool,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            progress_bar: RefCell::new(None),
            quiet: false,
        }
    }

    pub fn quiet() -> Self {
        Self {
            progress_bar: RefCell::new(None),
            quiet: true,
        }
    }

    fn bar_for(&self, total: usize) -> ProgressBar {
        let mut slot = self.progress_bar.borrow_mut();
        match slot.as_ref() {
            Some(pb) => {
                pb.set_length(total as u64);
                pb.clone()
            }
            None => {
                let pb = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template(BAR_TEMPLATE)
                        .expect("progress bar template is valid")
                        .progress_chars("=>-"),
                );
                *slot = Some(pb.clone());
                pb
            }
        }
    }

    /// Clears and forgets the current bar so a later batch starts fresh
    fn clear_bar(&self) {
        if let Some(pb) = self.progress_bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.progress_bar.borrow().as_ref() {
            Some(pb) => pb.println(message),
            None => eprintln!("{}", message),
        }
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        if self.quiet {
            return;
        }
        let pb = self.bar_for(total);
        pb.set_position(current as u64);
        if let Some(msg) = message {
            pb.set_message(msg.to_string());
        }
    }

    fn report_error(&self, message: &str) {
        self.clear_bar();
        eprintln!("⚠️  {}", message);
    }

    fn report_completion(&self, message: &str) {
        self.clear_bar();
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}
