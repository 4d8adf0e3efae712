/// ProgressReporter port for reporting progress during scans
///
/// This port abstracts user-facing progress output (e.g., to stderr)
/// so long-running multi-project scans give feedback without touching stdout.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress through a batch of items
    ///
    /// # Arguments
    /// * `current` - Number of items done so far
    /// * `total` - Total number of items
    /// * `message` - Optional message to include (e.g. the project being scanned)
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning for a source that produced no data
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
