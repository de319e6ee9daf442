use chrono::NaiveDateTime;

use crate::hash::content_hash;
use crate::normalize::{canonical_to_iso, to_canonical, DateError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClippingKind {
    Highlight,
    Note,
    Bookmark,
    Unknown(String),
}

impl ClippingKind {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Highlight" => ClippingKind::Highlight,
            "Note" => ClippingKind::Note,
            "Bookmark" => ClippingKind::Bookmark,
            other => ClippingKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClippingKind::Highlight => "Highlight",
            ClippingKind::Note => "Note",
            ClippingKind::Bookmark => "Bookmark",
            ClippingKind::Unknown(label) => label,
        }
    }
}

impl std::fmt::Display for ClippingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One highlight, note or bookmark taken from a clippings block.
///
/// `title` is already normalized; `added_on` keeps full precision and
/// [`Clipping::timestamp`] gives the canonical `DD/MM/YY HH:MM:SS` text.
#[derive(Debug, Clone, PartialEq)]
pub struct Clipping {
    pub title: String,
    pub author: String,
    pub kind: ClippingKind,
    pub location: String,
    pub added_on: NaiveDateTime,
    pub content: String,
}

impl Clipping {
    pub fn timestamp(&self) -> String {
        to_canonical(&self.added_on)
    }

    pub fn content_hash(&self) -> String {
        content_hash(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub clippings: Vec<Clipping>,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Book {
            title: title.into(),
            author: author.into(),
            clippings: Vec::new(),
        }
    }
}

/// The row handed to the persistence sink for one clipping.
#[derive(Debug, Clone, PartialEq)]
pub struct ClippingRecord {
    pub hash: String,
    pub title: String,
    pub author: String,
    pub kind: String,
    pub location: String,
    pub content: String,
    pub timestamp: String,
}

impl ClippingRecord {
    pub fn new(book: &Book, clipping: &Clipping) -> Result<Self, DateError> {
        Ok(ClippingRecord {
            hash: clipping.content_hash(),
            title: book.title.clone(),
            author: book.author.clone(),
            kind: clipping.kind.to_string(),
            location: clipping.location.clone(),
            content: clipping.content.clone(),
            timestamp: canonical_to_iso(&clipping.timestamp())?,
        })
    }
}
