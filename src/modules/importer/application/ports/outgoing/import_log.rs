#[derive(Debug, thiserror::Error)]
pub enum ImportLogError {
    #[error("Log write failed: {0}")]
    WriteFailed(#[from] std::io::Error),
}

/// Append-only sink for skipped and failed rows.
pub trait ImportLog: Send {
    fn write_line(&mut self, line: &str) -> Result<(), ImportLogError>;

    /// Flushes buffered lines. Called once at the end of a run.
    fn finish(&mut self) -> Result<(), ImportLogError>;
}
