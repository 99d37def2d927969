//! # PDF Export
//!
//! Builds an A4 report with the built-in Helvetica fonts, so no font files
//! are needed.
//!
//! ## Page Layout
//! ```text
//! ┌──────────────────────────────────────────────────────┐  842pt
//! │ Bookshop Report (Sales)                    14pt bold │
//! │ Folio Books, 2024-03-01 to 2024-03-31          9pt   │
//! │                                                      │
//! │ Title      Author    Qty  Price  Total  Type   Date  │  header, bold
//! │ Dune       Herbert     2   9.99  19.98  Sales  ...   │  ROWS_PER_PAGE
//! │ ...                                                  │  rows per page
//! │                                                      │
//! │                                          Page 1 of 3 │
//! └──────────────────────────────────────────────────────┘  595pt
//! ```
//!
//! Text outside Latin-1 cannot be drawn with the standard fonts and is
//! replaced with `?`.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::{display_date, ReportDocument};
use crate::error::AppError;
use crate::render::clip;
use folio_core::ReportEntry;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 40;

const HEADING_SIZE: i64 = 14;
const BODY_SIZE: i64 = 9;
const LINE_HEIGHT: i64 = 14;

/// Baseline of the first table row on every page.
const FIRST_ROW_Y: i64 = PAGE_HEIGHT - MARGIN - 70;
const FOOTER_Y: i64 = MARGIN - 10;

pub(crate) const ROWS_PER_PAGE: usize =
    ((FIRST_ROW_Y - MARGIN - LINE_HEIGHT) / LINE_HEIGHT) as usize;

/// (header, x position, max characters)
const COLUMNS: [(&str, i64, usize); 7] = [
    ("Title", MARGIN, 30),
    ("Author", 190, 22),
    ("Quantity", 300, 8),
    ("Price", 350, 10),
    ("Total", 400, 11),
    ("Transaction", 455, 11),
    ("Date", 510, 16),
];

pub(crate) fn write_pdf(document: &ReportDocument<'_>, path: &Path) -> Result<(), AppError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let chunks: Vec<&[ReportEntry]> = if document.entries.is_empty() {
        vec![document.entries]
    } else {
        document.entries.chunks(ROWS_PER_PAGE).collect()
    };
    let page_count = chunks.len();

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for (index, rows) in chunks.into_iter().enumerate() {
        let content = page_content(document, rows, index + 1, page_count);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = add_page(&mut doc, pages_id, content_id);
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_count as i64),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)?;
    Ok(())
}

fn add_page(doc: &mut Document, pages_id: ObjectId, content_id: ObjectId) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    })
}

fn page_content(
    document: &ReportDocument<'_>,
    rows: &[ReportEntry],
    page: usize,
    page_count: usize,
) -> Content {
    let mut ops = Vec::new();

    let heading_y = PAGE_HEIGHT - MARGIN - HEADING_SIZE;
    text(&mut ops, "F2", HEADING_SIZE, MARGIN, heading_y, &document.heading);
    text(&mut ops, "F1", BODY_SIZE, MARGIN, heading_y - 18, &document.subtitle);

    let header_y = FIRST_ROW_Y + LINE_HEIGHT + 6;
    for (title, x, _) in COLUMNS {
        text(&mut ops, "F2", BODY_SIZE, x, header_y, title);
    }

    let mut y = FIRST_ROW_Y;
    for entry in rows {
        let cells = [
            entry.book_title.clone(),
            entry.author_name.clone(),
            entry.stock.to_string(),
            entry.price().to_string(),
            entry.total().to_string(),
            entry.transaction_type.label().to_string(),
            display_date(entry.date_performed),
        ];
        for ((_, x, width), cell) in COLUMNS.iter().zip(cells.iter()) {
            text(&mut ops, "F1", BODY_SIZE, *x, y, &clip(cell, *width));
        }
        y -= LINE_HEIGHT;
    }

    let footer = format!("Page {} of {}", page, page_count);
    text(&mut ops, "F1", BODY_SIZE, PAGE_WIDTH - MARGIN - 50, FOOTER_Y, &footer);

    Content { operations: ops }
}

fn text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![Object::Integer(x), Object::Integer(y)],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(latin1(value))],
    ));
    ops.push(Operation::new("ET", vec![]));
}

/// WinAnsi bytes for `value`; characters outside Latin-1 become `?`.
fn latin1(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|c| match c as u32 {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use folio_core::TransactionType;

    fn entries(count: usize) -> Vec<ReportEntry> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        (0..count)
            .map(|i| ReportEntry {
                serial_number: i as i64 + 1,
                book_title: format!("Book {}", i),
                author_name: "Chinua Achebe".to_string(),
                stock: 1,
                price_cents: 1099,
                total_cents: 1099,
                date_performed: start + Duration::minutes(i as i64),
                transaction_type: TransactionType::Sales,
            })
            .collect()
    }

    fn document(rows: &[ReportEntry]) -> ReportDocument<'_> {
        ReportDocument {
            heading: "Bookshop Report (Sales)".to_string(),
            subtitle: "Folio Books, 2024-03-01 to 2024-03-31".to_string(),
            entries: rows,
        }
    }

    #[test]
    fn test_write_pdf_paginates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let rows = entries(ROWS_PER_PAGE + 5);

        write_pdf(&document(&rows), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }

    #[test]
    fn test_single_page_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.pdf");
        let rows = entries(3);

        write_pdf(&document(&rows), &path).unwrap();

        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
    }

    #[test]
    fn test_clip_and_latin1() {
        assert_eq!(clip("Dune", 10), "Dune");
        assert_eq!(clip("One Hundred Years of Solitude", 10), "One Hund..");
        assert_eq!(latin1("Café"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(latin1("Ngũgĩ"), b"Ng?g?".to_vec());
    }

    #[test]
    fn test_rows_fit_on_page() {
        let last_row_y = FIRST_ROW_Y - (ROWS_PER_PAGE as i64 - 1) * LINE_HEIGHT;
        assert!(last_row_y > FOOTER_Y + LINE_HEIGHT);
        assert!(ROWS_PER_PAGE > 20);
    }
}
