//! SQLite output sink
//!
//! Persists records into a `quotes` table, one transaction per page batch.
//! Tags are stored as a JSON array string.

use crate::output::traits::{OutputResult, RecordSink};
use crate::record::QuoteRecord;
use rusqlite::{params, Connection};
use std::path::Path;

/// Writes records into a SQLite database.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens (or creates) the database and ensures the schema exists.
    pub fn open(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS quotes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                quote TEXT NOT NULL,
                author TEXT NOT NULL,
                tags TEXT NOT NULL,
                likes INTEGER NOT NULL,
                book TEXT,
                url TEXT,
                scraped_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    /// Number of stored quotes; used by tests and post-run inspection.
    pub fn count(&self) -> OutputResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl RecordSink for SqliteSink {
    fn write_batch(&mut self, records: &[QuoteRecord]) -> OutputResult<()> {
        let scraped_at = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO quotes (quote, author, tags, likes, book, url, scraped_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for record in records {
                let tags = serde_json::to_string(&record.tags)?;
                stmt.execute(params![
                    record.quote,
                    record.author,
                    tags,
                    record.likes,
                    record.book,
                    record.url,
                    scraped_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
