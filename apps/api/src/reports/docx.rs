//! Thin builder over `docx-rs` shared by both DOCX reports.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, Docx, Paragraph, Run, Style, StyleType, Table, TableCell, TableRow,
};

use crate::reports::ReportError;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub struct ReportDocument {
    docx: Docx,
}

impl ReportDocument {
    pub fn new() -> Self {
        let docx = Docx::new()
            .add_style(heading_style("Title", "Title", 26))
            .add_style(heading_style("Heading1", "heading 1", 16))
            .add_style(heading_style("Heading2", "heading 2", 13));
        Self { docx }
    }

    pub fn title(self, text: &str) -> Self {
        self.push(
            Paragraph::new()
                .style("Title")
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(text).bold()),
        )
    }

    pub fn heading(self, text: &str) -> Self {
        self.push(Paragraph::new().style("Heading1").add_run(Run::new().add_text(text)))
    }

    pub fn subheading(self, text: &str) -> Self {
        self.push(Paragraph::new().style("Heading2").add_run(Run::new().add_text(text)))
    }

    pub fn text(self, text: &str) -> Self {
        self.push(Paragraph::new().add_run(Run::new().add_text(text)))
    }

    pub fn bold(self, text: &str) -> Self {
        self.push(Paragraph::new().add_run(Run::new().add_text(text).bold()))
    }

    pub fn italic(self, text: &str) -> Self {
        self.push(Paragraph::new().add_run(Run::new().add_text(text).italic()))
    }

    /// `label: value` with the label in bold.
    pub fn labelled(self, label: &str, value: &str) -> Self {
        self.push(
            Paragraph::new()
                .add_run(Run::new().add_text(format!("{label}: ")).bold())
                .add_run(Run::new().add_text(value)),
        )
    }

    pub fn bullets<S: AsRef<str>>(self, items: &[S]) -> Self {
        items.iter().fold(self, |doc, item| {
            doc.push(Paragraph::new().add_run(Run::new().add_text(format!("\u{2022} {}", item.as_ref()))))
        })
    }

    pub fn blank(self) -> Self {
        self.push(Paragraph::new())
    }

    /// Two-column label/value table.
    pub fn key_values(self, rows: &[(&str, String)]) -> Self {
        let rows = rows
            .iter()
            .map(|(label, value)| TableRow::new(vec![bold_cell(label), cell(value)]))
            .collect();
        self.table(Table::new(rows))
    }

    /// Table with a bold header row.
    pub fn grid(self, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        let mut table_rows = vec![TableRow::new(headers.iter().map(|h| bold_cell(h)).collect())];
        table_rows.extend(
            rows.iter()
                .map(|row| TableRow::new(row.iter().map(|v| cell(v)).collect())),
        );
        self.table(Table::new(table_rows))
    }

    /// Org header lines followed by the generation timestamp.
    pub fn letterhead(self, lines: &[&str], generated: &str) -> Self {
        lines
            .iter()
            .fold(self, |doc, line| doc.text(line))
            .text(&format!("Generated: {generated}"))
            .blank()
    }

    pub fn finish(self) -> Result<Vec<u8>, ReportError> {
        let mut buf = Cursor::new(Vec::new());
        self.docx
            .build()
            .pack(&mut buf)
            .map_err(|e| ReportError::Docx(e.to_string()))?;
        Ok(buf.into_inner())
    }

    fn push(mut self, paragraph: Paragraph) -> Self {
        self.docx = self.docx.add_paragraph(paragraph);
        self
    }

    fn table(mut self, table: Table) -> Self {
        self.docx = self.docx.add_table(table);
        self.blank()
    }
}

impl Default for ReportDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_style(style_id: &str, name: &str, size_pt: usize) -> Style {
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size(size_pt * 2) // half-points
        .bold()
}

fn cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
}

fn bold_cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text).bold()))
}
