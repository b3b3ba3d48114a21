//! Output sinks for extracted quote records
//!
//! Records are handed to a sink one batch per page. Two sinks are provided:
//! JSON Lines (the default) and SQLite.

mod jsonl;
mod sqlite_output;
mod traits;

pub use jsonl::JsonlSink;
pub use sqlite_output::SqliteSink;
pub use traits::{OutputError, OutputResult, RecordSink};

use crate::config::{OutputConfig, OutputFormat};
use std::path::Path;

/// Opens the sink named by the output configuration.
pub fn open_sink(config: &OutputConfig) -> OutputResult<Box<dyn RecordSink>> {
    let path = Path::new(&config.path);
    match config.format {
        OutputFormat::Jsonl => Ok(Box::new(JsonlSink::create(path)?)),
        OutputFormat::Sqlite => Ok(Box::new(SqliteSink::open(path)?)),
    }
}
