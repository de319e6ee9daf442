use crate::models::{Book, ClippingRecord};
use crate::normalize::DateError;
use rusqlite::{params, Connection};
use std::path::Path;

#[derive(Debug)]
pub enum DbError {
    ConnectionFailed(String),
    QueryFailed(String),
    InvalidTimestamp(DateError),
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbError::ConnectionFailed(e) => write!(f, "Failed to connect to database: {}", e),
            DbError::QueryFailed(e) => write!(f, "Query failed: {}", e),
            DbError::InvalidTimestamp(e) => write!(f, "Cannot store clipping: {}", e),
        }
    }
}

impl std::error::Error for DbError {}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        DbError::QueryFailed(e.to_string())
    }
}

impl From<DateError> for DbError {
    fn from(e: DateError) -> Self {
        DbError::InvalidTimestamp(e)
    }
}

pub fn init_db(path: &Path) -> Result<Connection, DbError> {
    let conn = Connection::open(path)
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS clippings (
            hash TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            highlight_type TEXT NOT NULL,
            main_loc TEXT NOT NULL,
            content TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    Ok(conn)
}

/// Inserts unless a row with the same content hash exists. Returns whether
/// a row was added.
pub fn insert_clipping(conn: &Connection, record: &ClippingRecord) -> Result<bool, DbError> {
    let rows = conn.execute(
        "INSERT OR IGNORE INTO clippings
         (hash, title, author, highlight_type, main_loc, content, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.hash,
            record.title,
            record.author,
            record.kind,
            record.location,
            record.content,
            record.timestamp,
        ],
    )?;

    Ok(rows > 0)
}

/// Persists every clipping of a book; returns how many were new.
pub fn insert_book(conn: &Connection, book: &Book) -> Result<usize, DbError> {
    let mut inserted = 0;

    for (i, clipping) in book.clippings.iter().enumerate() {
        tracing::debug!(
            "Checking clipping {} of {} for '{}'",
            i + 1,
            book.clippings.len(),
            book.title
        );
        let record = ClippingRecord::new(book, clipping)?;
        if insert_clipping(conn, &record)? {
            inserted += 1;
        }
    }

    Ok(inserted)
}
