//! Text extraction from uploaded CV and job-description files.
//!
//! Dispatch is by file extension only. Both parsers are CPU-bound; async callers
//! go through [`extract_text_blocking`].

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use thiserror::Error;
use tracing::debug;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "doc"];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type '{0}'. Allowed: .pdf, .docx, .doc")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("Failed to extract text from Word document: {0}")]
    Docx(String),

    #[error("Text extraction task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    Word,
}

fn document_kind(filename: &str) -> Result<DocumentKind, ExtractionError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => Ok(DocumentKind::Pdf),
        "docx" | "doc" => Ok(DocumentKind::Word),
        _ => Err(ExtractionError::UnsupportedFormat(format!(".{extension}"))),
    }
}

/// Rejects filenames whose extension is not one of [`ALLOWED_EXTENSIONS`].
pub fn ensure_supported(filename: &str) -> Result<(), ExtractionError> {
    document_kind(filename).map(|_| ())
}

/// Extracts trimmed plain text. An empty document yields an empty string.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractionError> {
    let text = match document_kind(filename)? {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?,
        DocumentKind::Word => docx_text(bytes)?,
    };
    debug!("Extracted {} chars from '{filename}'", text.len());
    Ok(text.trim().to_string())
}

/// Runs [`extract_text`] on the blocking pool.
pub async fn extract_text_blocking(
    bytes: bytes::Bytes,
    filename: String,
) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes, &filename))
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
}

fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
            DocumentChild::Table(table) => table_lines(table, &mut lines),
            _ => {}
        }
    }
    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}

// Row and cell enums are single-variant in current docx-rs releases.
#[allow(irrefutable_let_patterns)]
fn table_lines(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            if let TableRowChild::TableCell(cell) = cell {
                for content in &cell.children {
                    match content {
                        TableCellContent::Paragraph(paragraph) => {
                            lines.push(paragraph_text(paragraph))
                        }
                        TableCellContent::Table(nested) => table_lines(nested, lines),
                        _ => {}
                    }
                }
            }
        }
    }
}
