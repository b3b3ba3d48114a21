//! Output sink trait and error types

use crate::record::QuoteRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A batched, append-only sink for quote records.
///
/// The crawl loop calls [`RecordSink::write_batch`] once per page that
/// produced new records, and [`RecordSink::finish`] exactly once when the
/// task set has drained.
pub trait RecordSink: Send {
    /// Appends one page's worth of accepted records.
    fn write_batch(&mut self, records: &[QuoteRecord]) -> OutputResult<()>;

    /// Flushes buffered output; called once at end of run.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
