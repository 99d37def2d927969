//! # Seed Data Generator
//!
//! Populates a database with sample books for development.
//!
//! ## Usage
//! ```bash
//! # Every sample book, once
//! cargo run -p folio-db --bin seed
//!
//! # Fewer books, custom database
//! cargo run -p folio-db --bin seed -- --count 10 --db ./data/folio.db
//! ```
//!
//! Each book gets a deterministic stock (some below the low-stock threshold)
//! and a price between 4.99 and 24.99. Every insert also writes its
//! ADDITIONS report row, so reports have something to show.

use chrono::{Duration, Utc};
use clap::Parser;
use folio_core::NewBook;
use folio_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// (title, author, publisher)
const SAMPLE_BOOKS: &[(&str, &str, &str)] = &[
    ("Dune", "Frank Herbert", "Chilton Books"),
    ("Dune Messiah", "Frank Herbert", "Putnam"),
    ("Emma", "Jane Austen", "John Murray"),
    ("Persuasion", "Jane Austen", "John Murray"),
    ("Pride and Prejudice", "Jane Austen", "T. Egerton"),
    ("The Hobbit", "J. R. R. Tolkien", "George Allen & Unwin"),
    ("The Fellowship of the Ring", "J. R. R. Tolkien", "George Allen & Unwin"),
    ("Things Fall Apart", "Chinua Achebe", "Heinemann"),
    ("Arrow of God", "Chinua Achebe", "Heinemann"),
    ("Half of a Yellow Sun", "Chimamanda Ngozi Adichie", "Fourth Estate"),
    ("Purple Hibiscus", "Chimamanda Ngozi Adichie", "Algonquin Books"),
    ("The River Between", "Ngugi wa Thiong'o", "Heinemann"),
    ("Petals of Blood", "Ngugi wa Thiong'o", "Heinemann"),
    ("Nineteen Eighty-Four", "George Orwell", "Secker & Warburg"),
    ("Animal Farm", "George Orwell", "Secker & Warburg"),
    ("One Hundred Years of Solitude", "Gabriel Garcia Marquez", "Harper & Row"),
    ("Beloved", "Toni Morrison", "Alfred A. Knopf"),
    ("Song of Solomon", "Toni Morrison", "Alfred A. Knopf"),
    ("The Left Hand of Darkness", "Ursula K. Le Guin", "Ace Books"),
    ("A Wizard of Earthsea", "Ursula K. Le Guin", "Parnassus Press"),
    ("Brave New World", "Aldous Huxley", "Chatto & Windus"),
    ("Ulysses", "James Joyce", "Shakespeare and Company"),
    ("Middlemarch", "George Eliot", "William Blackwood"),
    ("Great Expectations", "Charles Dickens", "Chapman & Hall"),
];

const LOCATIONS: &[&str] = &["Shelf A", "Shelf B", "Shelf C", "Window", "Back room"];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Folio sample data generator")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./folio_dev.db")]
    db: String,

    /// Number of books to insert (at most one of each sample)
    #[arg(short, long, default_value_t = SAMPLE_BOOKS.len())]
    count: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let count = args.count.min(SAMPLE_BOOKS.len());

    println!("Folio Seed Data Generator");
    println!("=========================");
    println!("Database: {}", args.db);
    println!("Books:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.books().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    for (idx, (title, author, publisher)) in SAMPLE_BOOKS.iter().take(count).enumerate() {
        let book = sample_book(idx, title, author, publisher);
        if let Err(e) = db.books().insert(&book).await {
            eprintln!("Failed to insert {}: {}", title, e);
            continue;
        }
        generated += 1;
    }

    println!();
    println!("✓ Generated {} books in {:?}", generated, start.elapsed());

    println!();
    println!("Verifying FTS index...");
    let hits = db.books().search("dune", "", 10).await?;
    println!("  Search title 'dune': {} results", hits.len());
    let hits = db.books().search("", "austen", 10).await?;
    println!("  Search author 'austen': {} results", hits.len());

    let low = db.books().low_stock().await?;
    println!("  Low stock: {} books", low.len());

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

fn sample_book(idx: usize, title: &str, author: &str, publisher: &str) -> NewBook {
    // Every fourth book starts below the low-stock threshold
    let stock = if idx % 4 == 0 { 3 } else { 5 + (idx * 7 % 8) as i64 };
    // 4.99 - 24.99 in whole-dollar steps
    let price_cents = 499 + ((idx * 13) % 21) as i64 * 100;

    NewBook {
        book_title: title.to_string(),
        author_name: author.to_string(),
        publisher: publisher.to_string(),
        date_time: Utc::now() - Duration::days((SAMPLE_BOOKS.len() - idx) as i64),
        stock,
        price_cents,
        location: LOCATIONS[idx % LOCATIONS.len()].to_string(),
        book_cover: None,
    }
}
