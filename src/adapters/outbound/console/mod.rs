/// Console adapters for user-facing stderr output
mod progress_reporter;
mod summary;

pub use progress_reporter::StderrProgressReporter;
pub use summary::SummaryPrinter;
