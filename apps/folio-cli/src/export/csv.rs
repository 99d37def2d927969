//! CSV export. Money is written as a plain decimal, dates as RFC 3339 UTC.

use std::path::Path;

use folio_core::ReportEntry;

pub(crate) const CSV_HEADER: [&str; 7] = [
    "book_title",
    "author_name",
    "stock",
    "price",
    "total",
    "date_performed",
    "transaction_type",
];

pub(crate) fn write_csv(entries: &[ReportEntry], path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;

    for entry in entries {
        writer.write_record([
            entry.book_title.as_str(),
            entry.author_name.as_str(),
            &entry.stock.to_string(),
            &entry.price().to_string(),
            &entry.total().to_string(),
            &entry.date_performed.to_rfc3339(),
            entry.transaction_type.label(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
