use chrono::Local;
use kindle_clippings::config::Config;
use kindle_clippings::library::{filter_by_date, process};
use kindle_clippings::models::Book;
use kindle_clippings::{db, render, source};
use std::path::Path;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let files = match source::find_clippings_files(Path::new(&config.clippings_path)) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut failed = false;
    for file in files {
        if let Err(e) = run(&config, &file) {
            tracing::error!("{}: {}", file.display(), e);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn run(config: &Config, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = source::read_clippings(file)?;
    let mut report = process(&content);

    for failure in &report.failures {
        if failure.is_blank() {
            tracing::debug!("Skipping {}", failure);
        } else {
            tracing::warn!("Skipping {}", failure);
        }
    }

    if let Some((from, to)) = config.date_range {
        report.books = filter_by_date(std::mem::take(&mut report.books), from, to);
    }

    tracing::info!(
        "{}: {} books, {} clippings",
        file.display(),
        report.books.len(),
        report.clipping_count()
    );

    if config.write_html {
        write_html(config, &report.books)?;
    }

    if config.write_db {
        write_db(config, &report.books)?;
    }

    Ok(())
}

fn write_html(config: &Config, books: &[Book]) -> std::io::Result<()> {
    let output_dir = Path::new(&config.output_path);
    std::fs::create_dir_all(output_dir)?;
    let generated_at = Local::now().naive_local();

    for book in books {
        let path = render::write_book_html(book, output_dir, &generated_at)?;
        tracing::info!("HTML file produced for: {} ({})", book.title, path.display());
    }
    Ok(())
}

fn write_db(config: &Config, books: &[Book]) -> Result<(), db::DbError> {
    let conn = db::init_db(Path::new(&config.database_path))?;

    for book in books {
        let inserted = db::insert_book(&conn, book)?;
        tracing::info!(
            "{}: {} new of {} clippings",
            book.title,
            inserted,
            book.clippings.len()
        );
    }
    Ok(())
}
