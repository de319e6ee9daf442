use crate::models::{Book, Clipping};
use crate::normalize::to_canonical;
use chrono::NaiveDateTime;
use quick_xml::escape::escape;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const PAGE_STYLE: &str = r#"        body {
            font-family: Arial, Helvetica, sans-serif;
        }
        header {
            text-align: center;
        }
        li {
            list-style: none;
        }
        blockquote {
            background: #f1f1f1;
            margin-top: 10px;
            padding: 10px;
            font-style: italic;
            line-height: 1.25;
        }
        blockquote span {
            color: #7e7e7e;
            font-size: 0.6em;
            display: block;
            padding-top: 20px;
        }"#;

pub fn render_fragment(clipping: &Clipping) -> String {
    format!(
        r#"
        <li>
            <blockquote>
                {}
                <span>({}, {})</span>
            </blockquote>
        </li>"#,
        escape(clipping.content.as_str()),
        escape(clipping.location.as_str()),
        clipping.timestamp(),
    )
}

/// One `<li>` per clipping, in book order. Borrows the book, so it can be
/// called again without re-parsing.
pub fn highlight_fragments(book: &Book) -> impl Iterator<Item = String> + '_ {
    book.clippings.iter().map(render_fragment)
}

pub fn render_book(book: &Book, generated_at: &NaiveDateTime) -> String {
    let title = escape(book.title.as_str());
    let author = escape(book.author.as_str());
    let highlights: Vec<String> = highlight_fragments(book).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <meta name="description" content="{title}">
    <meta name="author" content="{author}">
    <style>
{style}
    </style>
</head>
<body>
    <header>
        <h1>{title}</h1>
        <h2>by {author}</h2>
        <p>Highlights as of {generated}</p>
    </header>
    <section>{highlights}
    </section>
</body>
</html>
"#,
        title = title,
        author = author,
        style = PAGE_STYLE,
        generated = to_canonical(generated_at),
        highlights = highlights.join("\n"),
    )
}

pub fn book_file_name(book: &Book) -> String {
    format!("{}.html", book.title)
}

pub fn write_book_html(
    book: &Book,
    output_dir: &Path,
    generated_at: &NaiveDateTime,
) -> io::Result<PathBuf> {
    let path = output_dir.join(book_file_name(book));
    fs::write(&path, render_book(book, generated_at))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::process;

    const SAMPLE: &str = "Tom & Jerry <Annotated> (Hanna, Barbera)
- Your Highlight on Location 120-121 | Added on Wednesday, October 24, 2018 10:25:36 PM

Cats \"chase\" mice.
==========
Tom & Jerry <Annotated> (Hanna, Barbera)
- Your Note on page 3 | Location 40 | Added on Wednesday, October 24, 2018 10:30:00 PM

Second.
";

    fn generated_at() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2026-01-25 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn sample_book() -> Book {
        process(SAMPLE).books.into_iter().next().unwrap()
    }

    #[test]
    fn test_fragment_contains_location_and_timestamp() {
        let book = sample_book();

        let fragment = render_fragment(&book.clippings[0]);

        assert!(fragment.contains("Cats &quot;chase&quot; mice."));
        assert!(fragment.contains("<span>(120-121, 24/10/18 22:25:36)</span>"));
    }

    #[test]
    fn test_fragments_are_restartable() {
        let book = sample_book();

        let first: Vec<String> = highlight_fragments(&book).collect();
        let second: Vec<String> = highlight_fragments(&book).collect();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_book_page() {
        let book = sample_book();

        let page = render_book(&book, &generated_at());

        assert!(page.contains("<h1>Tom  Jerry Annotated</h1>"));
        assert!(page.contains("<h2>by Hanna, Barbera</h2>"));
        assert!(page.contains("Highlights as of 25/01/26 10:30:00"));
        let first = page.find("Cats").unwrap();
        let second = page.find("Second.").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_write_book_html() {
        let dir = tempfile::tempdir().unwrap();
        let book = sample_book();

        let path = write_book_html(&book, dir.path(), &generated_at()).unwrap();

        assert_eq!(path, dir.path().join("Tom  Jerry Annotated.html"));
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, render_book(&book, &generated_at()));
    }
}
