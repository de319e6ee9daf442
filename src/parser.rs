use crate::models::{Clipping, ClippingKind};
use crate::normalize::{normalize_title, parse_added_on, DateError};
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

pub const CLIPPING_SEPARATOR: &str = "==========";
const DATE_SEPARATOR: &str = " | Added on ";
const KIND_SEPARATOR: &str = " on ";
const PAGE_LOCATION_SEPARATOR: &str = " | ";
const LOCATION_LABELS: [&str; 4] = ["Location ", "location ", "page ", "Page "];
const MIN_LINES: usize = 5;

// Last `(...)` on the line, even when the title carries its own parentheses.
static AUTHOR_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)[^(]*$").expect("author regex"));

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    TooShort(usize),
    MissingAuthor,
    MissingDate,
    MalformedDetails(String),
    InvalidDate(DateError),
    EmptyTitle,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::TooShort(lines) => {
                write!(f, "Too few lines: got {}, need at least {}", lines, MIN_LINES)
            }
            ParseError::MissingAuthor => write!(f, "No author parenthetical on the title line"),
            ParseError::MissingDate => write!(f, "No '{}' separator", DATE_SEPARATOR.trim()),
            ParseError::MalformedDetails(line) => {
                write!(f, "Unrecognised clipping details: '{}'", line)
            }
            ParseError::InvalidDate(e) => write!(f, "{}", e),
            ParseError::EmptyTitle => write!(f, "Title is empty after normalization"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<DateError> for ParseError {
    fn from(e: DateError) -> Self {
        ParseError::InvalidDate(e)
    }
}

/// A raw block that did not yield a usable clipping.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    pub index: usize,
    pub block: String,
    pub reason: ParseError,
}

impl ParseFailure {
    /// Whitespace-only blocks, e.g. the one after the final separator.
    pub fn is_blank(&self) -> bool {
        self.block.trim().is_empty()
    }
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "block {}: {}", self.index, self.reason)
    }
}

/// Splits on every separator occurrence; `n` separators give `n + 1` blocks.
pub fn split_blocks<'a>(content: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> {
    content.split(separator)
}

pub fn split_clippings(content: &str) -> impl Iterator<Item = &str> {
    split_blocks(content, CLIPPING_SEPARATOR)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    BookDetails,
    ClippingDetails,
    Blank,
    Content,
    TrailingBlank,
}

pub fn parse_clipping(block: &str) -> Result<Clipping, ParseError> {
    let mut lines: Vec<&str> = block
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect();

    // A block following a separator starts with the rest of that line.
    if lines.first().is_some_and(|line| line.is_empty()) {
        lines.remove(0);
    }

    if lines.len() < MIN_LINES {
        return Err(ParseError::TooShort(lines.len()));
    }
    let last = lines.len() - 1;

    let mut book: Option<(String, String)> = None;
    let mut details: Option<(ClippingKind, String, NaiveDateTime)> = None;
    let mut content: Vec<&str> = Vec::new();
    let mut state = State::BookDetails;

    for (i, line) in lines.iter().copied().enumerate() {
        state = match state {
            State::BookDetails => {
                book = Some(parse_book_details(line)?);
                State::ClippingDetails
            }
            State::ClippingDetails => {
                details = Some(parse_clipping_details(line)?);
                State::Blank
            }
            State::Blank => State::Content,
            State::Content if i == last => State::TrailingBlank,
            State::Content => {
                content.push(line);
                State::Content
            }
            State::TrailingBlank => State::TrailingBlank,
        };
    }

    let (title, author) = book.ok_or(ParseError::TooShort(lines.len()))?;
    let (kind, location, added_on) = details.ok_or(ParseError::TooShort(lines.len()))?;

    Ok(Clipping {
        title,
        author,
        kind,
        location,
        added_on,
        content: content.join("\n").trim().to_string(),
    })
}

/// `Title (Author)` into a normalized title and a trimmed author.
fn parse_book_details(line: &str) -> Result<(String, String), ParseError> {
    let captures = AUTHOR_GROUP
        .captures(line)
        .ok_or(ParseError::MissingAuthor)?;
    let (Some(group), Some(author)) = (captures.get(0), captures.get(1)) else {
        return Err(ParseError::MissingAuthor);
    };

    let title = normalize_title(&line[..group.start()]);
    Ok((title, author.as_str().trim().to_string()))
}

/// `- Your <Kind> on <location> | Added on <date>`
fn parse_clipping_details(
    line: &str,
) -> Result<(ClippingKind, String, NaiveDateTime), ParseError> {
    let (descriptor, date) = line
        .split_once(DATE_SEPARATOR)
        .ok_or(ParseError::MissingDate)?;
    let (kind, location) = parse_descriptor(descriptor)?;
    let added_on = parse_added_on(date)?;

    Ok((kind, location, added_on))
}

fn parse_descriptor(descriptor: &str) -> Result<(ClippingKind, String), ParseError> {
    let trimmed = descriptor.trim();
    let stripped = trimmed.strip_prefix("- Your ").unwrap_or(trimmed);

    let (kind, remainder) = stripped
        .split_once(KIND_SEPARATOR)
        .ok_or_else(|| ParseError::MalformedDetails(descriptor.to_string()))?;

    // "page 57 | Location 866": Location wins.
    let reference = match remainder.split_once(PAGE_LOCATION_SEPARATOR) {
        Some((_, after)) => after,
        None => remainder,
    };

    Ok((ClippingKind::from_label(kind), location_token(reference)))
}

fn location_token(reference: &str) -> String {
    let reference = reference.trim();
    LOCATION_LABELS
        .iter()
        .find_map(|label| reference.strip_prefix(label))
        .unwrap_or(reference)
        .trim()
        .to_string()
}
