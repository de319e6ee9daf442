use crate::models::{Book, Clipping};
use crate::parser::{parse_clipping, split_clippings, ParseError, ParseFailure};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Groups clippings into books by normalized title.
///
/// The title registry lives inside the value, so every run starts from
/// `Library::new()` and nothing leaks between runs.
#[derive(Debug, Default)]
pub struct Library {
    books: Vec<Book>,
    index: HashMap<String, usize>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the clipping to its book, creating the book on first sight.
    /// Clippings whose title normalized to nothing cannot be grouped.
    pub fn add(&mut self, clipping: Clipping) -> Result<(), ParseError> {
        if clipping.title.is_empty() {
            return Err(ParseError::EmptyTitle);
        }

        let slot = match self.index.get(&clipping.title) {
            Some(&slot) => slot,
            None => {
                let slot = self.books.len();
                self.books
                    .push(Book::new(clipping.title.clone(), clipping.author.clone()));
                self.index.insert(clipping.title.clone(), slot);
                slot
            }
        };

        if let Some(book) = self.books.get_mut(slot) {
            book.clippings.push(clipping);
        }
        Ok(())
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }
}

/// Outcome of one pass over a clippings file.
#[derive(Debug, Default)]
pub struct Report {
    pub books: Vec<Book>,
    pub failures: Vec<ParseFailure>,
}

impl Report {
    pub fn clipping_count(&self) -> usize {
        self.books.iter().map(|b| b.clippings.len()).sum()
    }
}

/// Raw clippings text in, books and per-block failures out.
pub fn process(content: &str) -> Report {
    let mut library = Library::new();
    let mut failures = Vec::new();

    for (index, block) in split_clippings(content).enumerate() {
        let outcome = parse_clipping(block).and_then(|clipping| library.add(clipping));

        if let Err(reason) = outcome {
            failures.push(ParseFailure {
                index,
                block: block.to_string(),
                reason,
            });
        }
    }

    Report {
        books: library.into_books(),
        failures,
    }
}

/// Keeps clippings added within `[from, to]`; books left empty are dropped.
pub fn filter_by_date(books: Vec<Book>, from: NaiveDate, to: NaiveDate) -> Vec<Book> {
    books
        .into_iter()
        .map(|mut book| {
            book.clippings.retain(|c| {
                let date = c.added_on.date();
                date >= from && date <= to
            });
            book
        })
        .filter(|book| !book.clippings.is_empty())
        .collect()
}
