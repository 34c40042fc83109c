//! Tabular exports rendered as CSV or PDF.

mod pdf;

use std::fmt;
use std::str::FromStr;

use chrono::Utc;

use carehub_core::error::AppError;
use carehub_core::result::AppResult;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A plain-text PDF listing.
    Pdf,
}

impl ExportFormat {
    /// MIME type of the rendered document.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Pdf => "application/pdf",
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            _ => Err(AppError::validation(format!(
                "Unsupported export format '{s}'; expected csv or pdf"
            ))),
        }
    }
}

/// A rendered export ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    /// Suggested file name.
    pub filename: String,
    /// MIME type.
    pub content_type: &'static str,
    /// Document bytes.
    pub bytes: Vec<u8>,
}

/// Rows to export under a fixed header.
#[derive(Debug, Clone)]
pub struct Table {
    /// Document title (PDF only).
    pub title: String,
    /// Column headers.
    pub headers: &'static [&'static str],
    /// One entry per row, same length as `headers`.
    pub rows: Vec<Vec<String>>,
}

/// Render `table` in `format`. `basename` gets a timestamp and extension.
pub fn render(format: ExportFormat, basename: &str, table: &Table) -> AppResult<ExportDocument> {
    let bytes = match format {
        ExportFormat::Csv => render_csv(table)?,
        ExportFormat::Pdf => pdf::render_listing(&table.title, &listing_lines(table)),
    };
    Ok(ExportDocument {
        filename: format!(
            "{basename}-{}.{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            format.extension()
        ),
        content_type: format.content_type(),
        bytes,
    })
}

fn render_csv(table: &Table) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_err = |e: csv::Error| AppError::internal(format!("Failed to write CSV: {e}"));
    writer.write_record(table.headers).map_err(csv_err)?;
    for row in &table.rows {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("Failed to flush CSV: {e}")))
}

/// Fixed-width text lines: header, rule, then one line per row.
fn listing_lines(table: &Table) -> Vec<String> {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count()).min(40);
            }
        }
    }

    let format_row = |cells: &mut dyn Iterator<Item = &str>| {
        cells
            .zip(&widths)
            .map(|(cell, w)| {
                let clipped: String = cell.chars().take(*w).collect();
                format!("{clipped:<w$}", w = *w)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    lines.push(format_row(&mut table.headers.iter().copied()));
    lines.push("-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &table.rows {
        lines.push(format_row(&mut row.iter().map(String::as_str)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_core::error::ErrorKind;

    fn table() -> Table {
        Table {
            title: "Lab orders".into(),
            headers: &["id", "test", "status"],
            rows: vec![
                vec!["1".into(), "Glucose, fasting".into(), "FINAL".into()],
                vec!["2".into(), "HbA1c".into(), "FINAL".into()],
            ],
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        let err = "xlsx".parse::<ExportFormat>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_csv_quotes_fields() {
        let doc = render(ExportFormat::Csv, "lab-orders", &table()).unwrap();
        let text = String::from_utf8(doc.bytes).unwrap();
        assert_eq!(
            text,
            "id,test,status\n1,\"Glucose, fasting\",FINAL\n2,HbA1c,FINAL\n"
        );
        assert!(doc.filename.starts_with("lab-orders-"));
        assert!(doc.filename.ends_with(".csv"));
    }

    #[test]
    fn test_pdf_has_header_and_trailer() {
        let doc = render(ExportFormat::Pdf, "lab-orders", &table()).unwrap();
        assert_eq!(doc.content_type, "application/pdf");
        assert!(doc.bytes.starts_with(b"%PDF-1.4"));
        assert!(doc.bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_listing_aligns_columns() {
        let lines = listing_lines(&table());
        assert_eq!(lines[0], "id  test              status");
        assert_eq!(lines[2], "1   Glucose, fasting  FINAL");
    }
}
