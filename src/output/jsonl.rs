//! JSON Lines output sink
//!
//! The default sink: one JSON object per line, appended batch by batch.

use crate::output::traits::{OutputResult, RecordSink};
use crate::record::QuoteRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records as JSON Lines to a file.
pub struct JsonlSink {
    writer: BufWriter<File>,
}

impl JsonlSink {
    /// Creates (or truncates) the output file.
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl RecordSink for JsonlSink {
    fn write_batch(&mut self, records: &[QuoteRecord]) -> OutputResult<()> {
        for record in records {
            serde_json::to_writer(&mut self.writer, record)?;
            self.writer.write_all(b"\n")?;
        }
        // One flush per page batch keeps the file usable mid-run.
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
